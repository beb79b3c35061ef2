// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! SSE2/AVX tile transposes.
//!
//! The SSE2 blocks are square `N × N` tiles of one register per row. Each
//! unpack stage interleaves row `k` with row `k + N/2`, which rotates the
//! (row, lane) index bits by one; `log2 N` stages swap rows and lanes.

use crate::x86::{load128, store128};
use std::arch::x86_64::*;

macro_rules! sse2_block {
    ($name:ident, $w:ty, n = $n:expr, stages = $stages:expr, lo = $lo:path, hi = $hi:path) => {
        #[inline]
        #[target_feature(enable = "sse2")]
        unsafe fn $name(a: *const $w, lda: usize, b: *mut $w, ldb: usize) {
            let mut v = [_mm_setzero_si128(); $n];
            for (r, x) in v.iter_mut().enumerate() {
                *x = load128(a.add(r * lda));
            }
            for _ in 0..$stages {
                let src = v;
                for k in 0..$n / 2 {
                    v[2 * k] = $lo(src[k], src[k + $n / 2]);
                    v[2 * k + 1] = $hi(src[k], src[k + $n / 2]);
                }
            }
            for (r, x) in v.iter().enumerate() {
                store128(b.add(r * ldb), *x);
            }
        }
    };
}

sse2_block!(block_u8_sse2, u8, n = 16, stages = 4, lo = _mm_unpacklo_epi8, hi = _mm_unpackhi_epi8);
sse2_block!(block_u16_sse2, u16, n = 8, stages = 3, lo = _mm_unpacklo_epi16, hi = _mm_unpackhi_epi16);
sse2_block!(block_u32_sse2, u32, n = 4, stages = 2, lo = _mm_unpacklo_epi32, hi = _mm_unpackhi_epi32);
sse2_block!(block_u64_sse2, u64, n = 2, stages = 1, lo = _mm_unpacklo_epi64, hi = _mm_unpackhi_epi64);

/// 8×8 tile of 32-bit words. Float shuffles move bits unchanged.
#[inline]
#[target_feature(enable = "avx")]
unsafe fn block_u32_avx(a: *const u32, lda: usize, b: *mut u32, ldb: usize) {
    let mut r = [_mm256_setzero_ps(); 8];
    for (i, x) in r.iter_mut().enumerate() {
        *x = _mm256_loadu_ps(a.add(i * lda) as *const f32);
    }

    let t0 = _mm256_unpacklo_ps(r[0], r[1]);
    let t1 = _mm256_unpackhi_ps(r[0], r[1]);
    let t2 = _mm256_unpacklo_ps(r[2], r[3]);
    let t3 = _mm256_unpackhi_ps(r[2], r[3]);
    let t4 = _mm256_unpacklo_ps(r[4], r[5]);
    let t5 = _mm256_unpackhi_ps(r[4], r[5]);
    let t6 = _mm256_unpacklo_ps(r[6], r[7]);
    let t7 = _mm256_unpackhi_ps(r[6], r[7]);

    let s0 = _mm256_shuffle_ps(t0, t2, 0x44);
    let s1 = _mm256_shuffle_ps(t0, t2, 0xEE);
    let s2 = _mm256_shuffle_ps(t1, t3, 0x44);
    let s3 = _mm256_shuffle_ps(t1, t3, 0xEE);
    let s4 = _mm256_shuffle_ps(t4, t6, 0x44);
    let s5 = _mm256_shuffle_ps(t4, t6, 0xEE);
    let s6 = _mm256_shuffle_ps(t5, t7, 0x44);
    let s7 = _mm256_shuffle_ps(t5, t7, 0xEE);

    let out = [
        _mm256_permute2f128_ps(s0, s4, 0x20),
        _mm256_permute2f128_ps(s1, s5, 0x20),
        _mm256_permute2f128_ps(s2, s6, 0x20),
        _mm256_permute2f128_ps(s3, s7, 0x20),
        _mm256_permute2f128_ps(s0, s4, 0x31),
        _mm256_permute2f128_ps(s1, s5, 0x31),
        _mm256_permute2f128_ps(s2, s6, 0x31),
        _mm256_permute2f128_ps(s3, s7, 0x31),
    ];
    for (i, x) in out.iter().enumerate() {
        _mm256_storeu_ps(b.add(i * ldb) as *mut f32, *x);
    }
}

/// 4×4 tile of 64-bit words.
#[inline]
#[target_feature(enable = "avx")]
unsafe fn block_u64_avx(a: *const u64, lda: usize, b: *mut u64, ldb: usize) {
    let r0 = _mm256_loadu_pd(a as *const f64);
    let r1 = _mm256_loadu_pd(a.add(lda) as *const f64);
    let r2 = _mm256_loadu_pd(a.add(2 * lda) as *const f64);
    let r3 = _mm256_loadu_pd(a.add(3 * lda) as *const f64);

    let t0 = _mm256_unpacklo_pd(r0, r1);
    let t1 = _mm256_unpackhi_pd(r0, r1);
    let t2 = _mm256_unpacklo_pd(r2, r3);
    let t3 = _mm256_unpackhi_pd(r2, r3);

    _mm256_storeu_pd(b as *mut f64, _mm256_permute2f128_pd(t0, t2, 0x20));
    _mm256_storeu_pd(b.add(ldb) as *mut f64, _mm256_permute2f128_pd(t1, t3, 0x20));
    _mm256_storeu_pd(b.add(2 * ldb) as *mut f64, _mm256_permute2f128_pd(t0, t2, 0x31));
    _mm256_storeu_pd(b.add(3 * ldb) as *mut f64, _mm256_permute2f128_pd(t1, t3, 0x31));
}

macro_rules! tiled_kernels {
    ($($name:ident [$feature:literal]: $w:ty, tile = $tile:expr, block = $block:path;)+) => {$(
        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn $name(
            rows: usize,
            columns: usize,
            a: *const $w,
            lda: usize,
            b: *mut $w,
            ldb: usize,
        ) {
            tiled_transpose!($tile, $block; rows, columns, a, lda, b, ldb);
        }
    )+};
}

tiled_kernels! {
    transpose_u8_sse2 ["sse2"]: u8, tile = 16, block = block_u8_sse2;
    transpose_u16_sse2 ["sse2"]: u16, tile = 8, block = block_u16_sse2;
    transpose_u32_sse2 ["sse2"]: u32, tile = 4, block = block_u32_sse2;
    transpose_u64_sse2 ["sse2"]: u64, tile = 2, block = block_u64_sse2;
    transpose_u32_avx ["avx"]: u32, tile = 8, block = block_u32_avx;
    transpose_u64_avx ["avx"]: u64, tile = 4, block = block_u64_avx;
}
