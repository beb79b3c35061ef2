// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! `lanewise transpose`: mirror a BMP image across its main diagonal.
//!
//! With `memory_budget` set in the config, the output image is allocated
//! from a pool of that size instead of the heap.

use anyhow::Context;
use cpu_dispatch::{cpu_transpose, DispatchConfig};
use memory_manager::PoolAllocator;
use std::path::Path;
use tensor_core::Matrix;

pub fn execute(config: &DispatchConfig, input: &Path, output: &Path) -> anyhow::Result<()> {
    super::banner("Transpose");

    let image = bitmap::read_bmp(input).with_context(|| format!("reading {}", input.display()))?;
    println!("  Input:  {} {}", input.display(), super::describe(&image));

    let (rows, columns, dimension) = (image.columns(), image.rows(), image.dimension());
    match config.parse_budget()? {
        Some(budget) => {
            let pool = PoolAllocator::new(budget);
            let mut flipped = Matrix::with_shape_in(rows, columns, dimension, pool.clone())
                .with_context(|| format!("allocating {rows}x{columns} from a {budget} pool"))?;
            cpu_transpose(&image, &mut flipped)?;
            bitmap::write_bmp(output, &flipped)
                .with_context(|| format!("writing {}", output.display()))?;
            println!("  Pool:   {} of {budget} in use", pool.allocated_bytes());
        }
        None => {
            let mut flipped: Matrix<u8> = Matrix::with_shape(rows, columns, dimension)?;
            cpu_transpose(&image, &mut flipped)?;
            bitmap::write_bmp(output, &flipped)
                .with_context(|| format!("writing {}", output.display()))?;
        }
    }

    println!("  Output: {} {rows} x {columns} x {dimension}", output.display());
    println!();
    Ok(())
}
