// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Bitwise and, or, xor and not on raw bit patterns.
//!
//! The kernels are generic over the element type: container operands are
//! processed as `n * size_of::<T>()` bytes, and a constant operand is
//! expanded into a byte pattern that repeats with the element width.
//! Floats are operated on bit for bit.

#[cfg(target_arch = "x86_64")]
mod x86;

use crate::table::{kernel_table, BinaryFn, KernelTable, UnaryFn, ValueFn};
use std::mem::size_of;
use tensor_core::Numeric;

/// Kernel tables for the bitwise operations of one element type.
pub trait BitwiseKernels: Numeric {
    fn and_kernels() -> KernelTable<BinaryFn<Self>>;
    fn or_kernels() -> KernelTable<BinaryFn<Self>>;
    fn xor_kernels() -> KernelTable<BinaryFn<Self>>;
    fn and_value_kernels() -> KernelTable<ValueFn<Self>>;
    fn or_value_kernels() -> KernelTable<ValueFn<Self>>;
    fn xor_value_kernels() -> KernelTable<ValueFn<Self>>;
    fn not_kernels() -> KernelTable<UnaryFn<Self>>;
}

macro_rules! portable_bitwise {
    ($($binary:ident, $value:ident => $op:tt;)+) => {$(
        /// # Safety
        /// `a`, `b` must be readable and `c` writable for `n` elements.
        pub unsafe fn $binary<T: Copy>(n: usize, a: *const T, b: *const T, c: *mut T) {
            let (a, b, c) = (a as *const u8, b as *const u8, c as *mut u8);
            for k in 0..n * size_of::<T>() {
                *c.add(k) = *a.add(k) $op *b.add(k);
            }
        }

        /// # Safety
        /// `b` must be readable and `c` writable for `n` elements.
        pub unsafe fn $value<T: Copy>(n: usize, a: T, b: *const T, c: *mut T) {
            let width = size_of::<T>();
            let pattern = &a as *const T as *const u8;
            let (b, c) = (b as *const u8, c as *mut u8);
            for k in 0..n * width {
                *c.add(k) = *pattern.add(k % width) $op *b.add(k);
            }
        }
    )+};
}

portable_bitwise! {
    and_portable, and_value_portable => &;
    or_portable, or_value_portable => |;
    xor_portable, xor_value_portable => ^;
}

/// # Safety
/// `a` must be readable and `c` writable for `n` elements.
pub unsafe fn not_portable<T: Copy>(n: usize, a: *const T, c: *mut T) {
    let (a, c) = (a as *const u8, c as *mut u8);
    for k in 0..n * size_of::<T>() {
        *c.add(k) = !*a.add(k);
    }
}

macro_rules! impl_bitwise {
    ($($t:ty),*) => {$(
        impl BitwiseKernels for $t {
            fn and_kernels() -> KernelTable<BinaryFn<$t>> {
                kernel_table!(BinaryFn<$t>, and_portable::<$t>, [
                    Avx2 => x86::and_avx2::<$t>,
                    Sse2 => x86::and_sse2::<$t>,
                ])
            }

            fn or_kernels() -> KernelTable<BinaryFn<$t>> {
                kernel_table!(BinaryFn<$t>, or_portable::<$t>, [
                    Avx2 => x86::or_avx2::<$t>,
                    Sse2 => x86::or_sse2::<$t>,
                ])
            }

            fn xor_kernels() -> KernelTable<BinaryFn<$t>> {
                kernel_table!(BinaryFn<$t>, xor_portable::<$t>, [
                    Avx2 => x86::xor_avx2::<$t>,
                    Sse2 => x86::xor_sse2::<$t>,
                ])
            }

            fn and_value_kernels() -> KernelTable<ValueFn<$t>> {
                kernel_table!(ValueFn<$t>, and_value_portable::<$t>, [
                    Avx2 => x86::and_value_avx2::<$t>,
                    Sse2 => x86::and_value_sse2::<$t>,
                ])
            }

            fn or_value_kernels() -> KernelTable<ValueFn<$t>> {
                kernel_table!(ValueFn<$t>, or_value_portable::<$t>, [
                    Avx2 => x86::or_value_avx2::<$t>,
                    Sse2 => x86::or_value_sse2::<$t>,
                ])
            }

            fn xor_value_kernels() -> KernelTable<ValueFn<$t>> {
                kernel_table!(ValueFn<$t>, xor_value_portable::<$t>, [
                    Avx2 => x86::xor_value_avx2::<$t>,
                    Sse2 => x86::xor_value_sse2::<$t>,
                ])
            }

            fn not_kernels() -> KernelTable<UnaryFn<$t>> {
                kernel_table!(UnaryFn<$t>, not_portable::<$t>, [
                    Avx2 => x86::not_avx2::<$t>,
                    Sse2 => x86::not_sse2::<$t>,
                ])
            }
        }
    )*};
}

impl_bitwise!(i8, u8, i16, u16, i32, u32, f32, f64);

#[cfg(test)]
mod tests {
    use super::*;

    fn supported<F: Copy>(table: &KernelTable<F>) -> Vec<F> {
        let caps = cpu_features::capabilities();
        table
            .tiers()
            .into_iter()
            .filter(|&t| caps.supports(t))
            .filter_map(|t| table.for_tier(t))
            .collect()
    }

    #[test]
    fn test_u16_ops_every_tier() {
        let a: Vec<u16> = (0..45).map(|i| (i * 0x1357) as u16).collect();
        let b: Vec<u16> = (0..45).map(|i| (i * 0x2468 + 0xf0f0) as u16).collect();
        let cases: [(KernelTable<BinaryFn<u16>>, fn(u16, u16) -> u16); 3] = [
            (u16::and_kernels(), |x, y| x & y),
            (u16::or_kernels(), |x, y| x | y),
            (u16::xor_kernels(), |x, y| x ^ y),
        ];
        for (table, op) in cases {
            let expected: Vec<u16> = a.iter().zip(&b).map(|(&x, &y)| op(x, y)).collect();
            for kernel in supported(&table) {
                let mut out = vec![0u16; a.len()];
                unsafe { kernel(a.len(), a.as_ptr(), b.as_ptr(), out.as_mut_ptr()) };
                assert_eq!(out, expected);
            }
        }
    }

    #[test]
    fn test_value_pattern_respects_element_width() {
        let b: Vec<u32> = (0..21).map(|i| i * 0x0101_0101).collect();
        let a = 0x00ff_ff00u32;
        let expected: Vec<u32> = b.iter().map(|&x| a & x).collect();
        for kernel in supported(&u32::and_value_kernels()) {
            let mut out = vec![0u32; b.len()];
            unsafe { kernel(b.len(), a, b.as_ptr(), out.as_mut_ptr()) };
            assert_eq!(out, expected);
        }

        let b: Vec<i8> = (0..37).map(|i| i as i8).collect();
        let expected: Vec<i8> = b.iter().map(|&x| 0x55 ^ x).collect();
        for kernel in supported(&i8::xor_value_kernels()) {
            let mut out = vec![0i8; b.len()];
            unsafe { kernel(b.len(), 0x55, b.as_ptr(), out.as_mut_ptr()) };
            assert_eq!(out, expected);
        }
    }

    #[test]
    fn test_float_bits() {
        let a: Vec<f64> = vec![1.5, -2.0, 0.0, f64::INFINITY, 3.25];
        let mask = f64::from_bits(0x7fff_ffff_ffff_ffff);
        for kernel in supported(&f64::and_value_kernels()) {
            let mut out = vec![0.0f64; a.len()];
            unsafe { kernel(a.len(), mask, a.as_ptr(), out.as_mut_ptr()) };
            assert_eq!(out, vec![1.5, 2.0, 0.0, f64::INFINITY, 3.25]);
        }
    }

    #[test]
    fn test_not_every_tier() {
        let a: Vec<i32> = (-20..20).collect();
        let expected: Vec<i32> = a.iter().map(|&x| !x).collect();
        for kernel in supported(&i32::not_kernels()) {
            let mut out = vec![0i32; a.len()];
            unsafe { kernel(a.len(), a.as_ptr(), out.as_mut_ptr()) };
            assert_eq!(out, expected);
        }
    }
}
