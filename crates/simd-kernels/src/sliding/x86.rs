// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! SSE2/AVX2 offset-add kernels.

use super::offset_portable;
use crate::x86::{load128, load256, store128, store256};
use std::arch::x86_64::*;

macro_rules! offset_kernels {
    ($($name:ident [$feature:literal]: $t:ty, lanes = $lanes:expr, load = $load:path, store = $store:path, splat = |$x:ident| $splat:expr, add = $add:path;)+) => {$(
        #[target_feature(enable = $feature)]
        pub(crate) unsafe fn $name(n: usize, a: *const $t, c: *mut $t, offset: $t) {
            let vo = {
                let $x = offset;
                $splat
            };
            let mut i = 0;
            while i + $lanes <= n {
                $store(c.add(i), $add($load(a.add(i)), vo));
                i += $lanes;
            }
            offset_portable::<$t>(n - i, a.add(i), c.add(i), offset);
        }
    )+};
}

offset_kernels! {
    offset_u32_sse2 ["sse2"]: u32, lanes = 4, load = load128, store = store128,
        splat = |x| _mm_set1_epi32(x as i32), add = _mm_add_epi32;
    offset_u32_avx2 ["avx2"]: u32, lanes = 8, load = load256, store = store256,
        splat = |x| _mm256_set1_epi32(x as i32), add = _mm256_add_epi32;
    offset_u64_sse2 ["sse2"]: u64, lanes = 2, load = load128, store = store128,
        splat = |x| _mm_set1_epi64x(x as i64), add = _mm_add_epi64;
    offset_u64_avx2 ["avx2"]: u64, lanes = 4, load = load256, store = store256,
        splat = |x| _mm256_set1_epi64x(x as i64), add = _mm256_add_epi64;
    offset_usize_sse2 ["sse2"]: usize, lanes = 2, load = load128, store = store128,
        splat = |x| _mm_set1_epi64x(x as i64), add = _mm_add_epi64;
    offset_usize_avx2 ["avx2"]: usize, lanes = 4, load = load256, store = store256,
        splat = |x| _mm256_set1_epi64x(x as i64), add = _mm256_add_epi64;
}
