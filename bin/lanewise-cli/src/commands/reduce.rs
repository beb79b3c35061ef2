// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `lanewise reduce`: per-row and per-column sums of a BMP image.
//!
//! Channels are summed together: a row sum covers every byte of the row,
//! a column sum every byte of one pixel column.

use anyhow::Context;
use cpu_dispatch::{cpu_column_sums, cpu_row_sums};
use std::path::Path;
use tensor_core::Vector;

/// Sums beyond this many are elided from the listing.
const SHOWN: usize = 8;

pub fn execute(input: &Path) -> anyhow::Result<()> {
    super::banner("Row / Column Sums");

    let image = bitmap::read_bmp(input).with_context(|| format!("reading {}", input.display()))?;
    println!("  Input:  {} {}", input.display(), super::describe(&image));
    println!();

    let mut row_sums: Vector<f32> = Vector::filled(image.rows(), 1, 0.0)?;
    let mut element_sums: Vector<f32> = Vector::filled(image.row_size(), 1, 0.0)?;
    cpu_row_sums(&image, &mut row_sums)?;
    cpu_column_sums(&image, &mut element_sums)?;

    let column_sums: Vec<f32> = element_sums
        .as_slice()
        .chunks_exact(image.dimension())
        .map(|pixel| pixel.iter().sum())
        .collect();

    print_sums("Rows", row_sums.as_slice());
    print_sums("Columns", &column_sums);

    let total: f64 = row_sums.as_slice().iter().map(|&s| f64::from(s)).sum();
    println!("  Total:  {total}");
    println!();
    Ok(())
}

fn print_sums(label: &str, sums: &[f32]) {
    println!("  {label} ({})", sums.len());
    for (i, s) in sums.iter().take(SHOWN).enumerate() {
        println!("   {i:>6}  {s:>14.1}");
    }
    if sums.len() > SHOWN {
        println!("   {:>6}  ({} more)", "...", sums.len() - SHOWN);
    }
    println!();
}
