// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Matrix transpose keyed by pixel width.
//!
//! A pixel of 1, 2, 4 or 8 bytes is moved as one `u8`/`u16`/`u32`/`u64`
//! word, so a 4-channel `u8` matrix and a 1-channel `f32` matrix share the
//! same kernel. The full square tiles go through the tier's block kernel
//! and the ragged right and bottom strips through [`common_transpose`].
//! Other pixel widths use [`transpose_pixels`].

use crate::table::{kernel_table, KernelTable, TransposeFn};
use std::ptr;

/// Drives a square block kernel over the full tiles of a matrix, then
/// handles the right and bottom strips with [`common_transpose`].
macro_rules! tiled_transpose {
    ($tile:expr, $block:path; $rows:expr, $columns:expr, $a:expr, $lda:expr, $b:expr, $ldb:expr) => {{
        let (rows, columns, a, lda, b, ldb) = ($rows, $columns, $a, $lda, $b, $ldb);
        let full_r = rows - rows % $tile;
        let full_c = columns - columns % $tile;
        let mut i = 0;
        while i < full_r {
            let mut j = 0;
            while j < full_c {
                $block(a.add(i * lda + j), lda, b.add(j * ldb + i), ldb);
                j += $tile;
            }
            i += $tile;
        }
        if full_c < columns {
            $crate::transpose::common_transpose(
                full_r,
                columns - full_c,
                a.add(full_c),
                lda,
                b.add(full_c * ldb),
                ldb,
            );
        }
        if full_r < rows {
            $crate::transpose::common_transpose(
                rows - full_r,
                columns,
                a.add(full_r * lda),
                lda,
                b.add(full_r),
                ldb,
            );
        }
    }};
}

#[cfg(target_arch = "x86_64")]
mod x86;

/// A word a pixel is moved as.
pub trait TransposeKernels: Copy + Default + 'static {
    fn transpose_kernels() -> KernelTable<TransposeFn<Self>>;
}

/// Element-by-element transpose of a `rows × columns` block.
///
/// # Safety
/// `a` must be readable for `rows` rows of `columns` words spaced `lda`
/// apart, `b` writable for `columns` rows of `rows` words spaced `ldb`
/// apart, and the two regions must not overlap.
pub unsafe fn common_transpose<W: Copy>(
    rows: usize,
    columns: usize,
    a: *const W,
    lda: usize,
    b: *mut W,
    ldb: usize,
) {
    for i in 0..rows {
        let row = a.add(i * lda);
        for j in 0..columns {
            *b.add(j * ldb + i) = *row.add(j);
        }
    }
}

#[inline(always)]
unsafe fn block4<W: Copy + Default>(a: *const W, lda: usize, b: *mut W, ldb: usize) {
    let mut tile = [[W::default(); 4]; 4];
    for (r, row) in tile.iter_mut().enumerate() {
        ptr::copy_nonoverlapping(a.add(r * lda), row.as_mut_ptr(), 4);
    }
    for c in 0..4 {
        let out = b.add(c * ldb);
        for (r, row) in tile.iter().enumerate() {
            *out.add(r) = row[c];
        }
    }
}

/// Portable transpose in 4×4 tiles.
///
/// # Safety
/// As [`common_transpose`].
pub unsafe fn transpose_portable<W: Copy + Default>(
    rows: usize,
    columns: usize,
    a: *const W,
    lda: usize,
    b: *mut W,
    ldb: usize,
) {
    tiled_transpose!(4, block4; rows, columns, a, lda, b, ldb);
}

/// Transpose for pixels of any byte width. Strides are in bytes.
///
/// # Safety
/// As [`common_transpose`], with every pixel `pixel` bytes long.
pub unsafe fn transpose_pixels(
    rows: usize,
    columns: usize,
    pixel: usize,
    a: *const u8,
    lda: usize,
    b: *mut u8,
    ldb: usize,
) {
    for i in 0..rows {
        for j in 0..columns {
            ptr::copy_nonoverlapping(a.add(i * lda + j * pixel), b.add(j * ldb + i * pixel), pixel);
        }
    }
}

impl TransposeKernels for u8 {
    fn transpose_kernels() -> KernelTable<TransposeFn<u8>> {
        kernel_table!(TransposeFn<u8>, transpose_portable::<u8>, [Sse2 => x86::transpose_u8_sse2])
    }
}

impl TransposeKernels for u16 {
    fn transpose_kernels() -> KernelTable<TransposeFn<u16>> {
        kernel_table!(TransposeFn<u16>, transpose_portable::<u16>, [Sse2 => x86::transpose_u16_sse2])
    }
}

impl TransposeKernels for u32 {
    fn transpose_kernels() -> KernelTable<TransposeFn<u32>> {
        kernel_table!(TransposeFn<u32>, transpose_portable::<u32>, [
            Avx => x86::transpose_u32_avx,
            Sse2 => x86::transpose_u32_sse2,
        ])
    }
}

impl TransposeKernels for u64 {
    fn transpose_kernels() -> KernelTable<TransposeFn<u64>> {
        kernel_table!(TransposeFn<u64>, transpose_portable::<u64>, [
            Avx => x86::transpose_u64_avx,
            Sse2 => x86::transpose_u64_sse2,
        ])
    }
}
