// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! SSE2/AVX2 bitwise kernels, generic over the element type.

use super::{
    and_portable, and_value_portable, not_portable, or_portable, or_value_portable, xor_portable,
    xor_value_portable,
};
use crate::x86::{load128, load256, store128, store256};
use std::arch::x86_64::*;
use std::mem::size_of;

macro_rules! bitwise_kernels {
    (
        $feature:literal, bytes = $bytes:expr, load = $load:path, store = $store:path;
        $($binary:ident, $value:ident => $op:path, $pb:ident, $pv:ident;)+
    ) => {$(
        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn $binary<T: Copy>(n: usize, a: *const T, b: *const T, c: *mut T) {
            let per_vector = $bytes / size_of::<T>();
            let mut i = 0;
            while i + per_vector <= n {
                $store(c.add(i), $op($load(a.add(i)), $load(b.add(i))));
                i += per_vector;
            }
            $pb(n - i, a.add(i), b.add(i), c.add(i));
        }

        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn $value<T: Copy>(n: usize, a: T, b: *const T, c: *mut T) {
            // 32 copies cover a full register for every element width.
            let pattern = [a; 32];
            let va = $load(pattern.as_ptr());
            let per_vector = $bytes / size_of::<T>();
            let mut i = 0;
            while i + per_vector <= n {
                $store(c.add(i), $op(va, $load(b.add(i))));
                i += per_vector;
            }
            $pv(n - i, a, b.add(i), c.add(i));
        }
    )+};
}

bitwise_kernels! {
    "sse2", bytes = 16, load = load128, store = store128;
    and_sse2, and_value_sse2 => _mm_and_si128, and_portable, and_value_portable;
    or_sse2, or_value_sse2 => _mm_or_si128, or_portable, or_value_portable;
    xor_sse2, xor_value_sse2 => _mm_xor_si128, xor_portable, xor_value_portable;
}

bitwise_kernels! {
    "avx2", bytes = 32, load = load256, store = store256;
    and_avx2, and_value_avx2 => _mm256_and_si256, and_portable, and_value_portable;
    or_avx2, or_value_avx2 => _mm256_or_si256, or_portable, or_value_portable;
    xor_avx2, xor_value_avx2 => _mm256_xor_si256, xor_portable, xor_value_portable;
}

#[target_feature(enable = "sse2")]
pub(crate) unsafe fn not_sse2<T: Copy>(n: usize, a: *const T, c: *mut T) {
    let ones = _mm_set1_epi32(-1);
    let per_vector = 16 / size_of::<T>();
    let mut i = 0;
    while i + per_vector <= n {
        store128(c.add(i), _mm_xor_si128(load128(a.add(i)), ones));
        i += per_vector;
    }
    not_portable(n - i, a.add(i), c.add(i));
}

#[target_feature(enable = "avx2")]
pub(crate) unsafe fn not_avx2<T: Copy>(n: usize, a: *const T, c: *mut T) {
    let ones = _mm256_set1_epi32(-1);
    let per_vector = 32 / size_of::<T>();
    let mut i = 0;
    while i + per_vector <= n {
        store256(c.add(i), _mm256_xor_si256(load256(a.add(i)), ones));
        i += per_vector;
    }
    not_portable(n - i, a.add(i), c.add(i));
}
