// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Offset-add kernels used to replicate sliding-window index blocks.
//!
//! A window's offsets are built once and then copied to the next channel,
//! the next window position and the next row of windows, each copy shifted
//! by a constant: `c[i] = a[i] + offset`.

#[cfg(target_arch = "x86_64")]
mod x86;

use crate::table::{kernel_table, KernelTable, OffsetFn};
use tensor_core::Element;

/// An index type a sliding-window map can be stored in.
pub trait SlidingKernels: Element {
    /// `None` when `value` does not fit the index type.
    fn from_offset(value: usize) -> Option<Self>;

    fn wrapping_offset(self, offset: Self) -> Self;

    fn offset_kernels() -> KernelTable<OffsetFn<Self>>;
}

/// # Safety
/// `a` must be readable and `c` writable for `n` elements.
pub unsafe fn offset_portable<I: SlidingKernels>(n: usize, a: *const I, c: *mut I, offset: I) {
    for i in 0..n {
        *c.add(i) = (*a.add(i)).wrapping_offset(offset);
    }
}

macro_rules! impl_sliding {
    ($($t:ty: [$($tier:ident => $k:ident),+];)+) => {$(
        impl SlidingKernels for $t {
            #[inline]
            fn from_offset(value: usize) -> Option<Self> {
                <$t>::try_from(value).ok()
            }

            #[inline]
            fn wrapping_offset(self, offset: Self) -> Self {
                self.wrapping_add(offset)
            }

            fn offset_kernels() -> KernelTable<OffsetFn<$t>> {
                kernel_table!(OffsetFn<$t>, offset_portable::<$t>, [$($tier => x86::$k),+])
            }
        }
    )+};
}

impl_sliding! {
    u32: [Avx2 => offset_u32_avx2, Sse2 => offset_u32_sse2];
    u64: [Avx2 => offset_u64_avx2, Sse2 => offset_u64_sse2];
    usize: [Avx2 => offset_usize_avx2, Sse2 => offset_usize_sse2];
}
