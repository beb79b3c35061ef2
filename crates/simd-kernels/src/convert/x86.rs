// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! SSE/AVX conversions, plus the float loaders the reductions share.
//!
//! Loader naming: `ps4_<src>` loads 4 source elements as `f32` lanes,
//! `ps8_` 8 lanes, `pd2_`/`pd4_` 2/4 `f64` lanes. Each carries the target
//! feature its source type needs.

use super::{scale_portable, widen_portable};
use crate::lanes::{U32_BIAS_F32, U32_BIAS_F64};
use crate::x86::{load128, load256, load_lo16, load_lo32, load_lo64, store128, store256};
use std::arch::x86_64::*;

// ---- integer widening -------------------------------------------------

macro_rules! widen_kernels {
    ($feature:literal, store = $store:path; $($name:ident: $s:ty => $d:ty, lanes = $lanes:expr, load = $load:path, cvt = $cvt:path;)+) => {$(
        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn $name(n: usize, a: *const $s, c: *mut $d) {
            let mut i = 0;
            while i + $lanes <= n {
                $store(c.add(i), $cvt($load(a.add(i))));
                i += $lanes;
            }
            widen_portable::<$s, $d>(n - i, a.add(i), c.add(i));
        }
    )+};
}

widen_kernels! {
    "sse4.1", store = store128;
    widen_i8_i16_sse41: i8 => i16, lanes = 8, load = load_lo64, cvt = _mm_cvtepi8_epi16;
    widen_i8_i32_sse41: i8 => i32, lanes = 4, load = load_lo32, cvt = _mm_cvtepi8_epi32;
    widen_u8_u16_sse41: u8 => u16, lanes = 8, load = load_lo64, cvt = _mm_cvtepu8_epi16;
    widen_u8_i16_sse41: u8 => i16, lanes = 8, load = load_lo64, cvt = _mm_cvtepu8_epi16;
    widen_u8_u32_sse41: u8 => u32, lanes = 4, load = load_lo32, cvt = _mm_cvtepu8_epi32;
    widen_u8_i32_sse41: u8 => i32, lanes = 4, load = load_lo32, cvt = _mm_cvtepu8_epi32;
    widen_i16_i32_sse41: i16 => i32, lanes = 4, load = load_lo64, cvt = _mm_cvtepi16_epi32;
    widen_u16_u32_sse41: u16 => u32, lanes = 4, load = load_lo64, cvt = _mm_cvtepu16_epi32;
    widen_u16_i32_sse41: u16 => i32, lanes = 4, load = load_lo64, cvt = _mm_cvtepu16_epi32;
}

widen_kernels! {
    "avx2", store = store256;
    widen_i8_i16_avx2: i8 => i16, lanes = 16, load = load128, cvt = _mm256_cvtepi8_epi16;
    widen_i8_i32_avx2: i8 => i32, lanes = 8, load = load_lo64, cvt = _mm256_cvtepi8_epi32;
    widen_u8_u16_avx2: u8 => u16, lanes = 16, load = load128, cvt = _mm256_cvtepu8_epi16;
    widen_u8_i16_avx2: u8 => i16, lanes = 16, load = load128, cvt = _mm256_cvtepu8_epi16;
    widen_u8_u32_avx2: u8 => u32, lanes = 8, load = load_lo64, cvt = _mm256_cvtepu8_epi32;
    widen_u8_i32_avx2: u8 => i32, lanes = 8, load = load_lo64, cvt = _mm256_cvtepu8_epi32;
    widen_i16_i32_avx2: i16 => i32, lanes = 8, load = load128, cvt = _mm256_cvtepi16_epi32;
    widen_u16_u32_avx2: u16 => u32, lanes = 8, load = load128, cvt = _mm256_cvtepu16_epi32;
    widen_u16_i32_avx2: u16 => i32, lanes = 8, load = load128, cvt = _mm256_cvtepu16_epi32;
}

// ---- float loaders ----------------------------------------------------

#[inline]
#[target_feature(enable = "sse4.1")]
pub(crate) unsafe fn ps4_i8(p: *const i8) -> __m128 {
    _mm_cvtepi32_ps(_mm_cvtepi8_epi32(load_lo32(p)))
}

#[inline]
#[target_feature(enable = "sse4.1")]
pub(crate) unsafe fn ps4_u8(p: *const u8) -> __m128 {
    _mm_cvtepi32_ps(_mm_cvtepu8_epi32(load_lo32(p)))
}

#[inline]
#[target_feature(enable = "sse4.1")]
pub(crate) unsafe fn ps4_i16(p: *const i16) -> __m128 {
    _mm_cvtepi32_ps(_mm_cvtepi16_epi32(load_lo64(p)))
}

#[inline]
#[target_feature(enable = "sse4.1")]
pub(crate) unsafe fn ps4_u16(p: *const u16) -> __m128 {
    _mm_cvtepi32_ps(_mm_cvtepu16_epi32(load_lo64(p)))
}

#[inline]
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn ps4_i32(p: *const i32) -> __m128 {
    _mm_cvtepi32_ps(load128(p))
}

/// `u32` lanes via the bias split: convert the low 31 bits, then add 2^31
/// where the top bit was set.
#[inline]
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn ps4_u32(p: *const u32) -> __m128 {
    let x = load128(p);
    let high = _mm_srai_epi32(x, 31);
    let low = _mm_and_si128(x, _mm_set1_epi32(i32::MAX));
    let bias = _mm_and_ps(_mm_castsi128_ps(high), _mm_set1_ps(f32::from_bits(U32_BIAS_F32)));
    _mm_add_ps(_mm_cvtepi32_ps(low), bias)
}

#[inline]
#[target_feature(enable = "sse")]
pub(crate) unsafe fn ps4_f32(p: *const f32) -> __m128 {
    _mm_loadu_ps(p)
}

#[inline]
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn ps4_f64(p: *const f64) -> __m128 {
    let lo = _mm_cvtpd_ps(_mm_loadu_pd(p));
    let hi = _mm_cvtpd_ps(_mm_loadu_pd(p.add(2)));
    _mm_movelh_ps(lo, hi)
}

#[inline]
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn ps8_i8(p: *const i8) -> __m256 {
    _mm256_cvtepi32_ps(_mm256_cvtepi8_epi32(load_lo64(p)))
}

#[inline]
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn ps8_u8(p: *const u8) -> __m256 {
    _mm256_cvtepi32_ps(_mm256_cvtepu8_epi32(load_lo64(p)))
}

#[inline]
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn ps8_i16(p: *const i16) -> __m256 {
    _mm256_cvtepi32_ps(_mm256_cvtepi16_epi32(load128(p)))
}

#[inline]
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn ps8_u16(p: *const u16) -> __m256 {
    _mm256_cvtepi32_ps(_mm256_cvtepu16_epi32(load128(p)))
}

#[inline]
#[target_feature(enable = "avx")]
pub(crate) unsafe fn ps8_i32(p: *const i32) -> __m256 {
    _mm256_cvtepi32_ps(load256(p))
}

#[inline]
#[target_feature(enable = "avx2")]
pub(crate) unsafe fn ps8_u32(p: *const u32) -> __m256 {
    let x = load256(p);
    let high = _mm256_srai_epi32(x, 31);
    let low = _mm256_and_si256(x, _mm256_set1_epi32(i32::MAX));
    let bias = _mm256_and_ps(
        _mm256_castsi256_ps(high),
        _mm256_set1_ps(f32::from_bits(U32_BIAS_F32)),
    );
    _mm256_add_ps(_mm256_cvtepi32_ps(low), bias)
}

#[inline]
#[target_feature(enable = "avx")]
pub(crate) unsafe fn ps8_f32(p: *const f32) -> __m256 {
    _mm256_loadu_ps(p)
}

#[inline]
#[target_feature(enable = "avx")]
pub(crate) unsafe fn ps8_f64(p: *const f64) -> __m256 {
    let lo = _mm256_cvtpd_ps(_mm256_loadu_pd(p));
    let hi = _mm256_cvtpd_ps(_mm256_loadu_pd(p.add(4)));
    _mm256_insertf128_ps(_mm256_castps128_ps256(lo), hi, 1)
}

#[inline]
#[target_feature(enable = "sse4.1")]
unsafe fn pd2_i8(p: *const i8) -> __m128d {
    _mm_cvtepi32_pd(_mm_cvtepi8_epi32(load_lo16(p)))
}

#[inline]
#[target_feature(enable = "sse4.1")]
unsafe fn pd2_u8(p: *const u8) -> __m128d {
    _mm_cvtepi32_pd(_mm_cvtepu8_epi32(load_lo16(p)))
}

#[inline]
#[target_feature(enable = "sse4.1")]
unsafe fn pd2_i16(p: *const i16) -> __m128d {
    _mm_cvtepi32_pd(_mm_cvtepi16_epi32(load_lo32(p)))
}

#[inline]
#[target_feature(enable = "sse4.1")]
unsafe fn pd2_u16(p: *const u16) -> __m128d {
    _mm_cvtepi32_pd(_mm_cvtepu16_epi32(load_lo32(p)))
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn pd2_i32(p: *const i32) -> __m128d {
    _mm_cvtepi32_pd(load_lo64(p))
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn pd2_u32(p: *const u32) -> __m128d {
    let x = load_lo64(p);
    let high32 = _mm_srai_epi32(x, 31);
    let high = _mm_unpacklo_epi32(high32, high32);
    let low = _mm_and_si128(x, _mm_set1_epi32(i32::MAX));
    let bias = _mm_and_pd(_mm_castsi128_pd(high), _mm_set1_pd(f64::from_bits(U32_BIAS_F64)));
    _mm_add_pd(_mm_cvtepi32_pd(low), bias)
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn pd2_f32(p: *const f32) -> __m128d {
    _mm_cvtps_pd(_mm_castsi128_ps(load_lo64(p)))
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn pd2_f64(p: *const f64) -> __m128d {
    _mm_loadu_pd(p)
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn pd4_i8(p: *const i8) -> __m256d {
    _mm256_cvtepi32_pd(_mm_cvtepi8_epi32(load_lo32(p)))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn pd4_u8(p: *const u8) -> __m256d {
    _mm256_cvtepi32_pd(_mm_cvtepu8_epi32(load_lo32(p)))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn pd4_i16(p: *const i16) -> __m256d {
    _mm256_cvtepi32_pd(_mm_cvtepi16_epi32(load_lo64(p)))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn pd4_u16(p: *const u16) -> __m256d {
    _mm256_cvtepi32_pd(_mm_cvtepu16_epi32(load_lo64(p)))
}

#[inline]
#[target_feature(enable = "avx")]
unsafe fn pd4_i32(p: *const i32) -> __m256d {
    _mm256_cvtepi32_pd(load128(p))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn pd4_u32(p: *const u32) -> __m256d {
    let x = load128(p);
    let high = _mm256_cvtepi32_epi64(_mm_srai_epi32(x, 31));
    let low = _mm_and_si128(x, _mm_set1_epi32(i32::MAX));
    let bias = _mm256_and_pd(
        _mm256_castsi256_pd(high),
        _mm256_set1_pd(f64::from_bits(U32_BIAS_F64)),
    );
    _mm256_add_pd(_mm256_cvtepi32_pd(low), bias)
}

#[inline]
#[target_feature(enable = "avx")]
unsafe fn pd4_f32(p: *const f32) -> __m256d {
    _mm256_cvtps_pd(_mm_loadu_ps(p))
}

#[inline]
#[target_feature(enable = "avx")]
unsafe fn pd4_f64(p: *const f64) -> __m256d {
    _mm256_loadu_pd(p)
}

// ---- convert with scale -----------------------------------------------

macro_rules! scale_kernels {
    (
        $f:ty, lanes = $lanes:expr, splat = $splat:path, mul = $mul:path, store = $store:path;
        $($name:ident [$feature:literal]: $s:ty => $load:path;)+
    ) => {$(
        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn $name(n: usize, a: *const $s, c: *mut $f, scale: $f) {
            let vs = $splat(scale);
            let mut i = 0;
            while i + $lanes <= n {
                $store(c.add(i), $mul($load(a.add(i)), vs));
                i += $lanes;
            }
            scale_portable::<$s, $f>(n - i, a.add(i), c.add(i), scale);
        }
    )+};
}

scale_kernels! {
    f32, lanes = 4, splat = _mm_set1_ps, mul = _mm_mul_ps, store = _mm_storeu_ps;
    scale_i8_f32_sse41 ["sse4.1"]: i8 => ps4_i8;
    scale_u8_f32_sse41 ["sse4.1"]: u8 => ps4_u8;
    scale_i16_f32_sse41 ["sse4.1"]: i16 => ps4_i16;
    scale_u16_f32_sse41 ["sse4.1"]: u16 => ps4_u16;
    scale_i32_f32_sse2 ["sse2"]: i32 => ps4_i32;
    scale_u32_f32_sse2 ["sse2"]: u32 => ps4_u32;
    scale_f32_f32_sse ["sse"]: f32 => ps4_f32;
    scale_f64_f32_sse2 ["sse2"]: f64 => ps4_f64;
}

scale_kernels! {
    f32, lanes = 8, splat = _mm256_set1_ps, mul = _mm256_mul_ps, store = _mm256_storeu_ps;
    scale_i8_f32_avx2 ["avx2"]: i8 => ps8_i8;
    scale_u8_f32_avx2 ["avx2"]: u8 => ps8_u8;
    scale_i16_f32_avx2 ["avx2"]: i16 => ps8_i16;
    scale_u16_f32_avx2 ["avx2"]: u16 => ps8_u16;
    scale_i32_f32_avx ["avx"]: i32 => ps8_i32;
    scale_u32_f32_avx2 ["avx2"]: u32 => ps8_u32;
    scale_f32_f32_avx ["avx"]: f32 => ps8_f32;
    scale_f64_f32_avx ["avx"]: f64 => ps8_f64;
}

scale_kernels! {
    f64, lanes = 2, splat = _mm_set1_pd, mul = _mm_mul_pd, store = _mm_storeu_pd;
    scale_i8_f64_sse41 ["sse4.1"]: i8 => pd2_i8;
    scale_u8_f64_sse41 ["sse4.1"]: u8 => pd2_u8;
    scale_i16_f64_sse41 ["sse4.1"]: i16 => pd2_i16;
    scale_u16_f64_sse41 ["sse4.1"]: u16 => pd2_u16;
    scale_i32_f64_sse2 ["sse2"]: i32 => pd2_i32;
    scale_u32_f64_sse2 ["sse2"]: u32 => pd2_u32;
    scale_f32_f64_sse2 ["sse2"]: f32 => pd2_f32;
    scale_f64_f64_sse2 ["sse2"]: f64 => pd2_f64;
}

scale_kernels! {
    f64, lanes = 4, splat = _mm256_set1_pd, mul = _mm256_mul_pd, store = _mm256_storeu_pd;
    scale_i8_f64_avx2 ["avx2"]: i8 => pd4_i8;
    scale_u8_f64_avx2 ["avx2"]: u8 => pd4_u8;
    scale_i16_f64_avx2 ["avx2"]: i16 => pd4_i16;
    scale_u16_f64_avx2 ["avx2"]: u16 => pd4_u16;
    scale_i32_f64_avx ["avx"]: i32 => pd4_i32;
    scale_u32_f64_avx2 ["avx2"]: u32 => pd4_u32;
    scale_f32_f64_avx ["avx"]: f32 => pd4_f32;
    scale_f64_f64_avx ["avx"]: f64 => pd4_f64;
}
