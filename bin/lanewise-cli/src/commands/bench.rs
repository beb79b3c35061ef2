// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `lanewise bench`: quick per-tier timings.
//!
//! Each operation runs once to warm up, then `iters` timed times, on a
//! dispatcher capped at each tier the configuration allows. For careful
//! measurements use the criterion benches in `cpu-dispatch`.

use cpu_dispatch::Dispatcher;
use cpu_features::{CpuCapabilities, SimdTier};
use std::time::{Duration, Instant};
use tensor_core::{Matrix, TensorError, Vector};

/// Row length of the matrix used for row sums.
const ROW_LEN: usize = 256;

pub fn execute(len: usize, iters: u32) -> anyhow::Result<()> {
    super::banner("Kernel Benchmark");
    anyhow::ensure!(len > 0, "--len must be positive");
    anyhow::ensure!(iters > 0, "--iters must be positive");

    let allowed = *Dispatcher::global().capabilities();
    let tiers = allowed.tiers();
    println!("  Elements:   {len}");
    println!("  Iterations: {iters}");
    println!("  Tiers:      {allowed}");
    println!();

    let bytes: Vec<u8> = (0..len).map(|i| (i * 7) as u8).collect();
    let ints: Vec<i32> = (0..len).map(|i| i as i32 - (len / 2) as i32).collect();
    let floats: Vec<f32> = (0..len).map(|i| (i % 1000) as f32 * 0.25).collect();

    let a8: Vector<u8> = Vector::from_slice(len, 1, &bytes)?;
    let b8: Vector<u8> = Vector::filled(len, 1, 100)?;
    let mut c8: Vector<u8> = Vector::with_shape(len, 1)?;
    let a32: Vector<i32> = Vector::from_slice(len, 1, &ints)?;
    let b32: Vector<i32> = Vector::filled(len, 1, i32::MAX / 2)?;
    let mut c32: Vector<i32> = Vector::with_shape(len, 1)?;
    let mut scaled: Vector<f32> = Vector::with_shape(len, 1)?;

    let rows = (len / ROW_LEN).max(1);
    let columns = len.min(ROW_LEN);
    let fm: Matrix<f32> = Matrix::from_slice(rows, columns, 1, &floats[..rows * columns])?;
    let mut acc: Vector<f32> = Vector::filled(rows, 1, 0.0)?;

    let side = (len as f64).sqrt() as usize;
    let square: Matrix<u8> = Matrix::from_slice(side, side, 1, &bytes[..side * side])?;
    let mut flipped: Matrix<u8> = Matrix::with_shape(side, side, 1)?;

    println!(
        "  {:<24} {:<8} {:>12} {:>10} {:>9}",
        "Operation", "Tier", "Mean", "GB/s", "Speedup",
    );
    println!("  {}", "-".repeat(67));

    let run = Series {
        allowed: &allowed,
        iters,
    };
    run.report("add u8", 3 * len, &mut |d| d.add(&a8, &b8, &mut c8).map(drop))?;
    run.report("add i32", 12 * len, &mut |d| d.add(&a32, &b32, &mut c32).map(drop))?;
    run.report("convert-scale i32->f32", 8 * len, &mut |d| {
        d.convert_scale(&a32, 0.5f32, &mut scaled).map(drop)
    })?;
    run.report("row sums f32", 4 * rows * columns, &mut |d| {
        d.row_sums(&fm, &mut acc).map(drop)
    })?;
    run.report("transpose u8", 2 * side * side, &mut |d| {
        d.transpose(&square, &mut flipped).map(drop)
    })?;

    if tiers == [SimdTier::None] {
        println!("  Only the portable tier is available; no speedups to report.");
    }
    Ok(())
}

/// One timing row per allowed tier, portable first.
struct Series<'a> {
    allowed: &'a CpuCapabilities,
    iters: u32,
}

impl Series<'_> {
    fn report(
        &self,
        name: &str,
        bytes_moved: usize,
        op: &mut dyn FnMut(&Dispatcher) -> Result<(), TensorError>,
    ) -> anyhow::Result<()> {
        let mut portable = None;
        for tier in self.allowed.tiers().into_iter().rev() {
            let d = Dispatcher::with_capabilities(self.allowed.capped(tier));
            let mean = time(self.iters, || op(&d))?;
            let seconds = mean.as_secs_f64().max(1e-12);
            let base = *portable.get_or_insert(seconds);
            println!(
                "  {:<24} {:<8} {:>10.1}us {:>10.2} {:>8.2}x",
                name,
                tier.as_str(),
                seconds * 1e6,
                bytes_moved as f64 / seconds / 1e9,
                base / seconds,
            );
            tracing::debug!(op = name, %tier, ?mean, "timed");
        }
        println!();
        Ok(())
    }
}

/// Mean wall time of `iters` calls after one warm-up call.
fn time(iters: u32, mut run: impl FnMut() -> Result<(), TensorError>) -> anyhow::Result<Duration> {
    run()?;
    let start = Instant::now();
    for _ in 0..iters {
        run()?;
    }
    Ok(start.elapsed() / iters)
}
