// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `lanewise convert`: convert-scale a BMP image to `f32` and summarise it.

use anyhow::Context;
use cpu_dispatch::{cpu_convert_scale, Dispatcher};
use std::path::Path;
use tensor_core::Matrix;

pub fn execute(input: &Path, scale: f32) -> anyhow::Result<()> {
    super::banner("Convert-Scale");

    let image = bitmap::read_bmp(input).with_context(|| format!("reading {}", input.display()))?;
    let mut values: Matrix<f32> = Matrix::with_shape(image.rows(), image.columns(), image.dimension())?;
    cpu_convert_scale(&image, scale, &mut values)?;

    let tier = Dispatcher::global().capabilities().best();
    println!("  Input:  {} {}", input.display(), super::describe(&image));
    println!("  Scale:  {scale}");
    println!("  Tier:   {tier}");
    println!();

    let stats = ChannelStats::collect(&values);
    println!("  {:<8} {:>12} {:>12} {:>12}", "Channel", "Min", "Max", "Mean");
    println!("  {}", "-".repeat(47));
    for (ch, s) in stats.iter().enumerate() {
        println!("  {:<8} {:>12.4} {:>12.4} {:>12.4}", ch, s.min, s.max, s.mean());
    }
    println!();
    Ok(())
}

struct ChannelStats {
    min: f32,
    max: f32,
    sum: f64,
    count: usize,
}

impl ChannelStats {
    fn collect(values: &Matrix<'_, f32>) -> Vec<Self> {
        let mut stats: Vec<Self> = (0..values.dimension())
            .map(|_| Self {
                min: f32::INFINITY,
                max: f32::NEG_INFINITY,
                sum: 0.0,
                count: 0,
            })
            .collect();
        for pixel in values.as_slice().chunks_exact(values.dimension()) {
            for (s, &v) in stats.iter_mut().zip(pixel) {
                s.min = s.min.min(v);
                s.max = s.max.max(v);
                s.sum += f64::from(v);
                s.count += 1;
            }
        }
        stats
    }

    fn mean(&self) -> f64 {
        self.sum / self.count.max(1) as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_stats() {
        let m: Matrix<f32> = Matrix::from_slice(1, 3, 2, &[1.0, 10.0, 3.0, 20.0, 2.0, 30.0]).unwrap();
        let stats = ChannelStats::collect(&m);
        assert_eq!(stats.len(), 2);
        assert_eq!((stats[0].min, stats[0].max), (1.0, 3.0));
        assert_eq!(stats[0].mean(), 2.0);
        assert_eq!(stats[1].mean(), 20.0);
    }
}
