// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! SSE/AVX saturating arithmetic.

use super::{add_portable, add_value_portable, sub_portable, sub_value_portable};
use crate::x86::{load128, load256, store128, store256};
use std::arch::x86_64::*;

/// Emits a same-length kernel and a constant-operand kernel for each
/// `binary, value => lane_op, portable_binary, portable_value` entry.
macro_rules! arith_kernels {
    (
        $feature:literal, $t:ty, lanes = $lanes:expr, load = $load:path, store = $store:path,
        splat = |$x:ident| $splat:expr;
        $($binary:ident, $value:ident => $op:path, $pb:path, $pv:path;)+
    ) => {$(
        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn $binary(n: usize, a: *const $t, b: *const $t, c: *mut $t) {
            let mut i = 0;
            while i + $lanes <= n {
                let r = $op($load(a.add(i)), $load(b.add(i)));
                $store(c.add(i), r);
                i += $lanes;
            }
            $pb(n - i, a.add(i), b.add(i), c.add(i));
        }

        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn $value(n: usize, a: $t, b: *const $t, c: *mut $t) {
            let va = {
                let $x = a;
                $splat
            };
            let mut i = 0;
            while i + $lanes <= n {
                let r = $op(va, $load(b.add(i)));
                $store(c.add(i), r);
                i += $lanes;
            }
            $pv(n - i, a, b.add(i), c.add(i));
        }
    )+};
}

// 32-bit lane operations. Signed overflow: both operands share a sign the
// result lost (add), or the operands differ in sign and the result left
// `a`'s sign (sub); the saturated value is `MAX` or `MIN` by `a`'s sign.
// Unsigned overflow is an ordering compare on sign-flipped lanes.

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn adds_epi32_sse2(a: __m128i, b: __m128i) -> __m128i {
    let r = _mm_add_epi32(a, b);
    let overflow = _mm_srai_epi32(_mm_and_si128(_mm_xor_si128(a, r), _mm_xor_si128(b, r)), 31);
    let saturated = _mm_xor_si128(_mm_srai_epi32(a, 31), _mm_set1_epi32(i32::MAX));
    _mm_or_si128(_mm_and_si128(overflow, saturated), _mm_andnot_si128(overflow, r))
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn subs_epi32_sse2(a: __m128i, b: __m128i) -> __m128i {
    let r = _mm_sub_epi32(a, b);
    let overflow = _mm_srai_epi32(_mm_and_si128(_mm_xor_si128(a, b), _mm_xor_si128(a, r)), 31);
    let saturated = _mm_xor_si128(_mm_srai_epi32(a, 31), _mm_set1_epi32(i32::MAX));
    _mm_or_si128(_mm_and_si128(overflow, saturated), _mm_andnot_si128(overflow, r))
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn adds_epu32_sse2(a: __m128i, b: __m128i) -> __m128i {
    let bias = _mm_set1_epi32(i32::MIN);
    let r = _mm_add_epi32(a, b);
    let wrapped = _mm_cmpgt_epi32(_mm_xor_si128(a, bias), _mm_xor_si128(r, bias));
    _mm_or_si128(r, wrapped)
}

#[inline]
#[target_feature(enable = "sse2")]
unsafe fn subs_epu32_sse2(a: __m128i, b: __m128i) -> __m128i {
    let bias = _mm_set1_epi32(i32::MIN);
    let r = _mm_sub_epi32(a, b);
    let wrapped = _mm_cmpgt_epi32(_mm_xor_si128(r, bias), _mm_xor_si128(a, bias));
    _mm_andnot_si128(wrapped, r)
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn adds_epi32_avx2(a: __m256i, b: __m256i) -> __m256i {
    let r = _mm256_add_epi32(a, b);
    let overflow =
        _mm256_srai_epi32(_mm256_and_si256(_mm256_xor_si256(a, r), _mm256_xor_si256(b, r)), 31);
    let saturated = _mm256_xor_si256(_mm256_srai_epi32(a, 31), _mm256_set1_epi32(i32::MAX));
    _mm256_or_si256(_mm256_and_si256(overflow, saturated), _mm256_andnot_si256(overflow, r))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn subs_epi32_avx2(a: __m256i, b: __m256i) -> __m256i {
    let r = _mm256_sub_epi32(a, b);
    let overflow =
        _mm256_srai_epi32(_mm256_and_si256(_mm256_xor_si256(a, b), _mm256_xor_si256(a, r)), 31);
    let saturated = _mm256_xor_si256(_mm256_srai_epi32(a, 31), _mm256_set1_epi32(i32::MAX));
    _mm256_or_si256(_mm256_and_si256(overflow, saturated), _mm256_andnot_si256(overflow, r))
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn adds_epu32_avx2(a: __m256i, b: __m256i) -> __m256i {
    let bias = _mm256_set1_epi32(i32::MIN);
    let r = _mm256_add_epi32(a, b);
    let wrapped = _mm256_cmpgt_epi32(_mm256_xor_si256(a, bias), _mm256_xor_si256(r, bias));
    _mm256_or_si256(r, wrapped)
}

#[inline]
#[target_feature(enable = "avx2")]
unsafe fn subs_epu32_avx2(a: __m256i, b: __m256i) -> __m256i {
    let bias = _mm256_set1_epi32(i32::MIN);
    let r = _mm256_sub_epi32(a, b);
    let wrapped = _mm256_cmpgt_epi32(_mm256_xor_si256(r, bias), _mm256_xor_si256(a, bias));
    _mm256_andnot_si256(wrapped, r)
}

// SSE / SSE2, 128-bit.

arith_kernels! {
    "sse2", i8, lanes = 16, load = load128, store = store128, splat = |x| _mm_set1_epi8(x);
    add_i8_sse2, add_value_i8_sse2 => _mm_adds_epi8, add_portable::<i8>, add_value_portable::<i8>;
    sub_i8_sse2, sub_value_i8_sse2 => _mm_subs_epi8, sub_portable::<i8>, sub_value_portable::<i8>;
}

arith_kernels! {
    "sse2", u8, lanes = 16, load = load128, store = store128, splat = |x| _mm_set1_epi8(x as i8);
    add_u8_sse2, add_value_u8_sse2 => _mm_adds_epu8, add_portable::<u8>, add_value_portable::<u8>;
    sub_u8_sse2, sub_value_u8_sse2 => _mm_subs_epu8, sub_portable::<u8>, sub_value_portable::<u8>;
}

arith_kernels! {
    "sse2", i16, lanes = 8, load = load128, store = store128, splat = |x| _mm_set1_epi16(x);
    add_i16_sse2, add_value_i16_sse2 => _mm_adds_epi16, add_portable::<i16>, add_value_portable::<i16>;
    sub_i16_sse2, sub_value_i16_sse2 => _mm_subs_epi16, sub_portable::<i16>, sub_value_portable::<i16>;
}

arith_kernels! {
    "sse2", u16, lanes = 8, load = load128, store = store128, splat = |x| _mm_set1_epi16(x as i16);
    add_u16_sse2, add_value_u16_sse2 => _mm_adds_epu16, add_portable::<u16>, add_value_portable::<u16>;
    sub_u16_sse2, sub_value_u16_sse2 => _mm_subs_epu16, sub_portable::<u16>, sub_value_portable::<u16>;
}

arith_kernels! {
    "sse2", i32, lanes = 4, load = load128, store = store128, splat = |x| _mm_set1_epi32(x);
    add_i32_sse2, add_value_i32_sse2 => adds_epi32_sse2, add_portable::<i32>, add_value_portable::<i32>;
    sub_i32_sse2, sub_value_i32_sse2 => subs_epi32_sse2, sub_portable::<i32>, sub_value_portable::<i32>;
}

arith_kernels! {
    "sse2", u32, lanes = 4, load = load128, store = store128, splat = |x| _mm_set1_epi32(x as i32);
    add_u32_sse2, add_value_u32_sse2 => adds_epu32_sse2, add_portable::<u32>, add_value_portable::<u32>;
    sub_u32_sse2, sub_value_u32_sse2 => subs_epu32_sse2, sub_portable::<u32>, sub_value_portable::<u32>;
}

arith_kernels! {
    "sse", f32, lanes = 4, load = _mm_loadu_ps, store = _mm_storeu_ps, splat = |x| _mm_set1_ps(x);
    add_f32_sse, add_value_f32_sse => _mm_add_ps, add_portable::<f32>, add_value_portable::<f32>;
    sub_f32_sse, sub_value_f32_sse => _mm_sub_ps, sub_portable::<f32>, sub_value_portable::<f32>;
}

arith_kernels! {
    "sse2", f64, lanes = 2, load = _mm_loadu_pd, store = _mm_storeu_pd, splat = |x| _mm_set1_pd(x);
    add_f64_sse2, add_value_f64_sse2 => _mm_add_pd, add_portable::<f64>, add_value_portable::<f64>;
    sub_f64_sse2, sub_value_f64_sse2 => _mm_sub_pd, sub_portable::<f64>, sub_value_portable::<f64>;
}

// AVX / AVX2, 256-bit.

arith_kernels! {
    "avx2", i8, lanes = 32, load = load256, store = store256, splat = |x| _mm256_set1_epi8(x);
    add_i8_avx2, add_value_i8_avx2 => _mm256_adds_epi8, add_portable::<i8>, add_value_portable::<i8>;
    sub_i8_avx2, sub_value_i8_avx2 => _mm256_subs_epi8, sub_portable::<i8>, sub_value_portable::<i8>;
}

arith_kernels! {
    "avx2", u8, lanes = 32, load = load256, store = store256, splat = |x| _mm256_set1_epi8(x as i8);
    add_u8_avx2, add_value_u8_avx2 => _mm256_adds_epu8, add_portable::<u8>, add_value_portable::<u8>;
    sub_u8_avx2, sub_value_u8_avx2 => _mm256_subs_epu8, sub_portable::<u8>, sub_value_portable::<u8>;
}

arith_kernels! {
    "avx2", i16, lanes = 16, load = load256, store = store256, splat = |x| _mm256_set1_epi16(x);
    add_i16_avx2, add_value_i16_avx2 => _mm256_adds_epi16, add_portable::<i16>, add_value_portable::<i16>;
    sub_i16_avx2, sub_value_i16_avx2 => _mm256_subs_epi16, sub_portable::<i16>, sub_value_portable::<i16>;
}

arith_kernels! {
    "avx2", u16, lanes = 16, load = load256, store = store256, splat = |x| _mm256_set1_epi16(x as i16);
    add_u16_avx2, add_value_u16_avx2 => _mm256_adds_epu16, add_portable::<u16>, add_value_portable::<u16>;
    sub_u16_avx2, sub_value_u16_avx2 => _mm256_subs_epu16, sub_portable::<u16>, sub_value_portable::<u16>;
}

arith_kernels! {
    "avx2", i32, lanes = 8, load = load256, store = store256, splat = |x| _mm256_set1_epi32(x);
    add_i32_avx2, add_value_i32_avx2 => adds_epi32_avx2, add_portable::<i32>, add_value_portable::<i32>;
    sub_i32_avx2, sub_value_i32_avx2 => subs_epi32_avx2, sub_portable::<i32>, sub_value_portable::<i32>;
}

arith_kernels! {
    "avx2", u32, lanes = 8, load = load256, store = store256, splat = |x| _mm256_set1_epi32(x as i32);
    add_u32_avx2, add_value_u32_avx2 => adds_epu32_avx2, add_portable::<u32>, add_value_portable::<u32>;
    sub_u32_avx2, sub_value_u32_avx2 => subs_epu32_avx2, sub_portable::<u32>, sub_value_portable::<u32>;
}

arith_kernels! {
    "avx", f32, lanes = 8, load = _mm256_loadu_ps, store = _mm256_storeu_ps, splat = |x| _mm256_set1_ps(x);
    add_f32_avx, add_value_f32_avx => _mm256_add_ps, add_portable::<f32>, add_value_portable::<f32>;
    sub_f32_avx, sub_value_f32_avx => _mm256_sub_ps, sub_portable::<f32>, sub_value_portable::<f32>;
}

arith_kernels! {
    "avx", f64, lanes = 4, load = _mm256_loadu_pd, store = _mm256_storeu_pd, splat = |x| _mm256_set1_pd(x);
    add_f64_avx, add_value_f64_avx => _mm256_add_pd, add_portable::<f64>, add_value_portable::<f64>;
    sub_f64_avx, sub_value_f64_avx => _mm256_sub_pd, sub_portable::<f64>, sub_value_portable::<f64>;
}
