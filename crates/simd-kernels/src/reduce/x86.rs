// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! SSE/AVX row and column sums.

use super::{column_sum_portable, finish_row};
use crate::convert::{
    ps4_f32, ps4_f64, ps4_i16, ps4_i32, ps4_i8, ps4_u16, ps4_u32, ps4_u8, ps8_f32, ps8_f64,
    ps8_i16, ps8_i32, ps8_i8, ps8_u16, ps8_u32, ps8_u8,
};
use std::arch::x86_64::*;

macro_rules! column_sum_kernels {
    (
        lanes = $lanes:expr, load_acc = $load_acc:path, add = $add:path, store = $store:path;
        $($name:ident [$feature:literal]: $s:ty => $load:path;)+
    ) => {$(
        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn $name(
            rows: usize,
            columns: usize,
            a: *const $s,
            stride: usize,
            acc: *mut f32,
        ) {
            let full = columns - columns % $lanes;
            for r in 0..rows {
                let row = a.add(r * stride);
                let mut j = 0;
                while j < full {
                    $store(acc.add(j), $add($load_acc(acc.add(j)), $load(row.add(j))));
                    j += $lanes;
                }
            }
            if full < columns {
                column_sum_portable(rows, columns - full, a.add(full), stride, acc.add(full));
            }
        }
    )+};
}

column_sum_kernels! {
    lanes = 4, load_acc = _mm_loadu_ps, add = _mm_add_ps, store = _mm_storeu_ps;
    column_sum_i8_sse41 ["sse4.1"]: i8 => ps4_i8;
    column_sum_u8_sse41 ["sse4.1"]: u8 => ps4_u8;
    column_sum_i16_sse41 ["sse4.1"]: i16 => ps4_i16;
    column_sum_u16_sse41 ["sse4.1"]: u16 => ps4_u16;
    column_sum_i32_sse2 ["sse2"]: i32 => ps4_i32;
    column_sum_u32_sse2 ["sse2"]: u32 => ps4_u32;
    column_sum_f32_sse ["sse"]: f32 => ps4_f32;
    column_sum_f64_sse2 ["sse2"]: f64 => ps4_f64;
}

column_sum_kernels! {
    lanes = 8, load_acc = _mm256_loadu_ps, add = _mm256_add_ps, store = _mm256_storeu_ps;
    column_sum_i8_avx2 ["avx2"]: i8 => ps8_i8;
    column_sum_u8_avx2 ["avx2"]: u8 => ps8_u8;
    column_sum_i16_avx2 ["avx2"]: i16 => ps8_i16;
    column_sum_u16_avx2 ["avx2"]: u16 => ps8_u16;
    column_sum_i32_avx ["avx"]: i32 => ps8_i32;
    column_sum_u32_avx2 ["avx2"]: u32 => ps8_u32;
    column_sum_f32_avx ["avx"]: f32 => ps8_f32;
    column_sum_f64_avx ["avx"]: f64 => ps8_f64;
}

/// Totals of four rows given their folded lanes `[l0+l4, l1+l5, l2+l6, l3+l7]`.
#[inline]
#[target_feature(enable = "sse3")]
unsafe fn fold4(t0: __m128, t1: __m128, t2: __m128, t3: __m128) -> [f32; 4] {
    let v = _mm_hadd_ps(_mm_hadd_ps(t0, t1), _mm_hadd_ps(t2, t3));
    let mut out = [0.0f32; 4];
    _mm_storeu_ps(out.as_mut_ptr(), v);
    out
}

#[inline]
#[target_feature(enable = "sse3")]
unsafe fn fold1(t: __m128) -> f32 {
    let h = _mm_hadd_ps(t, t);
    _mm_cvtss_f32(_mm_hadd_ps(h, h))
}

macro_rules! row_sum_kernels {
    (@lanes sse, $feature:literal, $s:ty, $load:path) => {
        #[inline]
        #[target_feature(enable = $feature)]
        unsafe fn lanes(row: *const $s, full: usize) -> __m128 {
            let mut lo = _mm_setzero_ps();
            let mut hi = _mm_setzero_ps();
            let mut k = 0;
            while k < full {
                lo = _mm_add_ps(lo, $load(row.add(k)));
                hi = _mm_add_ps(hi, $load(row.add(k + 4)));
                k += 8;
            }
            _mm_add_ps(lo, hi)
        }
    };
    (@lanes avx, $feature:literal, $s:ty, $load:path) => {
        #[inline]
        #[target_feature(enable = $feature)]
        unsafe fn lanes(row: *const $s, full: usize) -> __m128 {
            let mut v = _mm256_setzero_ps();
            let mut k = 0;
            while k < full {
                v = _mm256_add_ps(v, $load(row.add(k)));
                k += 8;
            }
            _mm_add_ps(_mm256_castps256_ps128(v), _mm256_extractf128_ps(v, 1))
        }
    };
    ($kind:ident; $($name:ident [$feature:literal]: $s:ty => $load:path;)+) => {$(
        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn $name(
            rows: usize,
            columns: usize,
            a: *const $s,
            stride: usize,
            acc: *mut f32,
        ) {
            row_sum_kernels!(@lanes $kind, $feature, $s, $load);

            let full = columns - columns % 8;
            let mut r = 0;
            while r + 4 <= rows {
                let row = a.add(r * stride);
                let totals = fold4(
                    lanes(row, full),
                    lanes(row.add(stride), full),
                    lanes(row.add(2 * stride), full),
                    lanes(row.add(3 * stride), full),
                );
                for (i, &total) in totals.iter().enumerate() {
                    *acc.add(r + i) += finish_row(total, row.add(i * stride), full, columns);
                }
                r += 4;
            }
            while r < rows {
                let row = a.add(r * stride);
                *acc.add(r) += finish_row(fold1(lanes(row, full)), row, full, columns);
                r += 1;
            }
        }
    )+};
}

row_sum_kernels! {
    sse;
    row_sum_i8_sse41 ["sse4.1"]: i8 => ps4_i8;
    row_sum_u8_sse41 ["sse4.1"]: u8 => ps4_u8;
    row_sum_i16_sse41 ["sse4.1"]: i16 => ps4_i16;
    row_sum_u16_sse41 ["sse4.1"]: u16 => ps4_u16;
    row_sum_i32_sse3 ["sse3"]: i32 => ps4_i32;
    row_sum_u32_sse3 ["sse3"]: u32 => ps4_u32;
    row_sum_f32_sse3 ["sse3"]: f32 => ps4_f32;
    row_sum_f64_sse3 ["sse3"]: f64 => ps4_f64;
}

row_sum_kernels! {
    avx;
    row_sum_i8_avx2 ["avx2"]: i8 => ps8_i8;
    row_sum_u8_avx2 ["avx2"]: u8 => ps8_u8;
    row_sum_i16_avx2 ["avx2"]: i16 => ps8_i16;
    row_sum_u16_avx2 ["avx2"]: u16 => ps8_u16;
    row_sum_i32_avx ["avx"]: i32 => ps8_i32;
    row_sum_u32_avx2 ["avx2"]: u32 => ps8_u32;
    row_sum_f32_avx ["avx"]: f32 => ps8_f32;
    row_sum_f64_avx ["avx"]: f64 => ps8_f64;
}
