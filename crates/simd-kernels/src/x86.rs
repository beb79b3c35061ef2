// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Unaligned load/store helpers shared by the x86_64 kernels.
//!
//! All helpers are generic over the element pointer type so the kernels
//! can pass their `*const T` straight through.

use std::arch::x86_64::*;

#[inline]
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn load128<T>(p: *const T) -> __m128i {
    _mm_loadu_si128(p as *const __m128i)
}

#[inline]
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn store128<T>(p: *mut T, v: __m128i) {
    _mm_storeu_si128(p as *mut __m128i, v)
}

#[inline]
#[target_feature(enable = "avx")]
pub(crate) unsafe fn load256<T>(p: *const T) -> __m256i {
    _mm256_loadu_si256(p as *const __m256i)
}

#[inline]
#[target_feature(enable = "avx")]
pub(crate) unsafe fn store256<T>(p: *mut T, v: __m256i) {
    _mm256_storeu_si256(p as *mut __m256i, v)
}

/// Loads 8 bytes into the low half of a register.
#[inline]
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn load_lo64<T>(p: *const T) -> __m128i {
    _mm_loadl_epi64(p as *const __m128i)
}

/// Loads 4 bytes into the lowest lane.
#[inline]
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn load_lo32<T>(p: *const T) -> __m128i {
    _mm_cvtsi32_si128((p as *const i32).read_unaligned())
}

/// Loads 2 bytes into the lowest lane.
#[inline]
#[target_feature(enable = "sse2")]
pub(crate) unsafe fn load_lo16<T>(p: *const T) -> __m128i {
    _mm_cvtsi32_si128((p as *const u16).read_unaligned() as i32)
}
