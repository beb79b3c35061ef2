// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Row and column sums accumulated in `f32`.
//!
//! Both kernels add into an existing accumulator, so a caller can sum a
//! matrix in several blocks. Every tier uses the same summation order,
//! which keeps the float results identical across tiers:
//!
//! - column sums add rows in order;
//! - row sums spread element `k` into lane `k % 8`, fold the lanes as
//!   `((l0+l4)+(l1+l5)) + ((l2+l6)+(l3+l7))`, then add the remaining
//!   `columns % 8` elements in order.

#[cfg(target_arch = "x86_64")]
mod x86;

use crate::lanes::ToFloat;
use crate::table::{kernel_table, KernelTable, SumFn};

/// Kernel tables for the reductions of one element type.
pub trait ReduceKernels: ToFloat {
    /// `acc[j] += Σ_r a[r][j]` for `j < columns`.
    fn column_sum_kernels() -> KernelTable<SumFn<Self>>;
    /// `acc[r] += Σ_j a[r][j]` for `r < rows`.
    fn row_sum_kernels() -> KernelTable<SumFn<Self>>;
}

/// # Safety
/// Rows `0..rows` of `columns` elements starting `stride` apart must be
/// readable from `a`; `acc` must be writable for `columns` entries.
pub unsafe fn column_sum_portable<T: ToFloat>(
    rows: usize,
    columns: usize,
    a: *const T,
    stride: usize,
    acc: *mut f32,
) {
    for r in 0..rows {
        let row = a.add(r * stride);
        for j in 0..columns {
            *acc.add(j) += (*row.add(j)).to_f32();
        }
    }
}

/// # Safety
/// As [`column_sum_portable`], with `acc` writable for `rows` entries.
pub unsafe fn row_sum_portable<T: ToFloat>(
    rows: usize,
    columns: usize,
    a: *const T,
    stride: usize,
    acc: *mut f32,
) {
    let full = columns - columns % 8;
    for r in 0..rows {
        let row = a.add(r * stride);
        let mut lanes = [0.0f32; 8];
        for k in 0..full {
            lanes[k % 8] += (*row.add(k)).to_f32();
        }
        let total = ((lanes[0] + lanes[4]) + (lanes[1] + lanes[5]))
            + ((lanes[2] + lanes[6]) + (lanes[3] + lanes[7]));
        *acc.add(r) += finish_row(total, row, full, columns);
    }
}

/// Adds `row[from..columns]` to `total`, in order.
#[inline]
pub(crate) unsafe fn finish_row<T: ToFloat>(
    mut total: f32,
    row: *const T,
    from: usize,
    columns: usize,
) -> f32 {
    for k in from..columns {
        total += (*row.add(k)).to_f32();
    }
    total
}

macro_rules! impl_reduce {
    ($($t:ty: columns [$($ct:ident => $ck:ident),+], rows [$($rt:ident => $rk:ident),+];)+) => {$(
        impl ReduceKernels for $t {
            fn column_sum_kernels() -> KernelTable<SumFn<$t>> {
                kernel_table!(SumFn<$t>, column_sum_portable::<$t>, [$($ct => x86::$ck),+])
            }

            fn row_sum_kernels() -> KernelTable<SumFn<$t>> {
                kernel_table!(SumFn<$t>, row_sum_portable::<$t>, [$($rt => x86::$rk),+])
            }
        }
    )+};
}

impl_reduce! {
    i8: columns [Avx2 => column_sum_i8_avx2, Sse41 => column_sum_i8_sse41],
        rows [Avx2 => row_sum_i8_avx2, Sse41 => row_sum_i8_sse41];
    u8: columns [Avx2 => column_sum_u8_avx2, Sse41 => column_sum_u8_sse41],
        rows [Avx2 => row_sum_u8_avx2, Sse41 => row_sum_u8_sse41];
    i16: columns [Avx2 => column_sum_i16_avx2, Sse41 => column_sum_i16_sse41],
        rows [Avx2 => row_sum_i16_avx2, Sse41 => row_sum_i16_sse41];
    u16: columns [Avx2 => column_sum_u16_avx2, Sse41 => column_sum_u16_sse41],
        rows [Avx2 => row_sum_u16_avx2, Sse41 => row_sum_u16_sse41];
    i32: columns [Avx => column_sum_i32_avx, Sse2 => column_sum_i32_sse2],
        rows [Avx => row_sum_i32_avx, Sse3 => row_sum_i32_sse3];
    u32: columns [Avx2 => column_sum_u32_avx2, Sse2 => column_sum_u32_sse2],
        rows [Avx2 => row_sum_u32_avx2, Sse3 => row_sum_u32_sse3];
    f32: columns [Avx => column_sum_f32_avx, Sse => column_sum_f32_sse],
        rows [Avx => row_sum_f32_avx, Sse3 => row_sum_f32_sse3];
    f64: columns [Avx => column_sum_f64_avx, Sse2 => column_sum_f64_sse2],
        rows [Avx => row_sum_f64_avx, Sse3 => row_sum_f64_sse3];
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpu_features::SimdTier;

    fn check<T: ReduceKernels>(table: KernelTable<SumFn<T>>, rows: usize, columns: usize, data: &[T]) {
        let caps = cpu_features::capabilities();
        // Wide enough for either reduction.
        let outputs = columns.max(rows);
        let mut expected = vec![1.0f32; outputs];
        unsafe { (table.portable())(rows, columns, data.as_ptr(), columns, expected.as_mut_ptr()) };
        for tier in table.tiers() {
            if caps.supports(tier) {
                let mut out = vec![1.0f32; outputs];
                unsafe {
                    (table.for_tier(tier).unwrap())(rows, columns, data.as_ptr(), columns, out.as_mut_ptr())
                };
                assert_eq!(out, expected, "tier {tier}, {rows}x{columns}");
            }
        }
    }

    #[test]
    fn test_column_sums_small_matrix() {
        let a: [u8; 6] = [1, 2, 3, 4, 5, 6];
        let mut acc = [0.0f32; 3];
        unsafe { column_sum_portable(2, 3, a.as_ptr(), 3, acc.as_mut_ptr()) };
        assert_eq!(acc, [5.0, 7.0, 9.0]);
    }

    #[test]
    fn test_row_sums_accumulate() {
        let a: Vec<i16> = (0..30).collect();
        let mut acc = [10.0f32, 20.0, 30.0];
        unsafe { row_sum_portable(3, 10, a.as_ptr(), 10, acc.as_mut_ptr()) };
        assert_eq!(acc, [10.0 + 45.0, 20.0 + 145.0, 30.0 + 245.0]);
    }

    #[test]
    fn test_stride_skips_padding() {
        // 2 rows of 3 columns, rows 5 apart.
        let a: [i32; 8] = [1, 1, 1, -99, -99, 2, 2, 2];
        let mut rows = [0.0f32; 2];
        let mut columns = [0.0f32; 3];
        let caps = cpu_features::capabilities();
        let (_, row_sum) = i32::row_sum_kernels().select(caps);
        let (_, column_sum) = i32::column_sum_kernels().select(caps);
        unsafe {
            row_sum(2, 3, a.as_ptr(), 5, rows.as_mut_ptr());
            column_sum(2, 3, a.as_ptr(), 5, columns.as_mut_ptr());
        }
        assert_eq!(rows, [3.0, 6.0]);
        assert_eq!(columns, [3.0, 3.0, 3.0]);
    }

    #[test]
    fn test_tiers_agree_on_float_rounding() {
        for (rows, columns) in [(1, 1), (3, 8), (4, 17), (5, 40), (9, 3), (7, 33)] {
            let data: Vec<f32> = (0..rows * columns)
                .map(|i| (i as f32 * 0.37).sin() * 1e3 + 1e-3 * i as f32)
                .collect();
            check(f32::row_sum_kernels(), rows, columns, &data);
            check(f32::column_sum_kernels(), rows, columns, &data);

            let data: Vec<u32> = (0..rows * columns)
                .map(|i| (i as u32).wrapping_mul(0x9e37_79b9))
                .collect();
            check(u32::row_sum_kernels(), rows, columns, &data);
            check(u32::column_sum_kernels(), rows, columns, &data);

            let data: Vec<i8> = (0..rows * columns).map(|i| (i * 29) as u8 as i8).collect();
            check(i8::row_sum_kernels(), rows, columns, &data);
            check(i8::column_sum_kernels(), rows, columns, &data);

            let data: Vec<f64> = (0..rows * columns).map(|i| 1.0 / (i as f64 + 0.5)).collect();
            check(f64::row_sum_kernels(), rows, columns, &data);
        }
    }

    #[test]
    fn test_tier_lists() {
        #[cfg(target_arch = "x86_64")]
        {
            assert_eq!(
                i32::row_sum_kernels().tiers(),
                vec![SimdTier::Avx, SimdTier::Sse3, SimdTier::None]
            );
            assert_eq!(
                u16::column_sum_kernels().tiers(),
                vec![SimdTier::Avx2, SimdTier::Sse41, SimdTier::None]
            );
        }
        assert_eq!(f32::row_sum_kernels().tiers().last(), Some(&SimdTier::None));
    }
}
