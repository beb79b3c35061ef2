// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Saturating add and subtract.
//!
//! Integers clamp to the type's range instead of wrapping; floats follow
//! IEEE arithmetic. 8- and 16-bit vector paths use the native saturating
//! instructions, 32-bit paths detect overflow with sign-bit (signed) or
//! biased-compare (unsigned) tricks.

#[cfg(target_arch = "x86_64")]
mod x86;

use crate::lanes::Saturating;
use crate::table::{kernel_table, BinaryFn, KernelTable, ValueFn};

/// Kernel tables for the arithmetic operations of one element type.
pub trait ArithKernels: Saturating {
    fn add_kernels() -> KernelTable<BinaryFn<Self>>;
    fn sub_kernels() -> KernelTable<BinaryFn<Self>>;
    fn add_value_kernels() -> KernelTable<ValueFn<Self>>;
    fn sub_value_kernels() -> KernelTable<ValueFn<Self>>;
}

/// # Safety
/// `a`, `b` must be readable and `c` writable for `n` elements.
pub unsafe fn add_portable<T: Saturating>(n: usize, a: *const T, b: *const T, c: *mut T) {
    for i in 0..n {
        *c.add(i) = (*a.add(i)).lane_add(*b.add(i));
    }
}

/// # Safety
/// As [`add_portable`].
pub unsafe fn sub_portable<T: Saturating>(n: usize, a: *const T, b: *const T, c: *mut T) {
    for i in 0..n {
        *c.add(i) = (*a.add(i)).lane_sub(*b.add(i));
    }
}

/// # Safety
/// `b` must be readable and `c` writable for `n` elements.
pub unsafe fn add_value_portable<T: Saturating>(n: usize, a: T, b: *const T, c: *mut T) {
    for i in 0..n {
        *c.add(i) = a.lane_add(*b.add(i));
    }
}

/// # Safety
/// As [`add_value_portable`].
pub unsafe fn sub_value_portable<T: Saturating>(n: usize, a: T, b: *const T, c: *mut T) {
    for i in 0..n {
        *c.add(i) = a.lane_sub(*b.add(i));
    }
}

macro_rules! impl_arith {
    ($t:ty, [$($tier:ident => $add:ident, $sub:ident, $add_v:ident, $sub_v:ident);* $(;)?]) => {
        impl ArithKernels for $t {
            fn add_kernels() -> KernelTable<BinaryFn<$t>> {
                kernel_table!(BinaryFn<$t>, add_portable::<$t>, [$($tier => x86::$add),*])
            }

            fn sub_kernels() -> KernelTable<BinaryFn<$t>> {
                kernel_table!(BinaryFn<$t>, sub_portable::<$t>, [$($tier => x86::$sub),*])
            }

            fn add_value_kernels() -> KernelTable<ValueFn<$t>> {
                kernel_table!(ValueFn<$t>, add_value_portable::<$t>, [$($tier => x86::$add_v),*])
            }

            fn sub_value_kernels() -> KernelTable<ValueFn<$t>> {
                kernel_table!(ValueFn<$t>, sub_value_portable::<$t>, [$($tier => x86::$sub_v),*])
            }
        }
    };
}

impl_arith!(i8, [
    Avx2 => add_i8_avx2, sub_i8_avx2, add_value_i8_avx2, sub_value_i8_avx2;
    Sse2 => add_i8_sse2, sub_i8_sse2, add_value_i8_sse2, sub_value_i8_sse2;
]);
impl_arith!(u8, [
    Avx2 => add_u8_avx2, sub_u8_avx2, add_value_u8_avx2, sub_value_u8_avx2;
    Sse2 => add_u8_sse2, sub_u8_sse2, add_value_u8_sse2, sub_value_u8_sse2;
]);
impl_arith!(i16, [
    Avx2 => add_i16_avx2, sub_i16_avx2, add_value_i16_avx2, sub_value_i16_avx2;
    Sse2 => add_i16_sse2, sub_i16_sse2, add_value_i16_sse2, sub_value_i16_sse2;
]);
impl_arith!(u16, [
    Avx2 => add_u16_avx2, sub_u16_avx2, add_value_u16_avx2, sub_value_u16_avx2;
    Sse2 => add_u16_sse2, sub_u16_sse2, add_value_u16_sse2, sub_value_u16_sse2;
]);
impl_arith!(i32, [
    Avx2 => add_i32_avx2, sub_i32_avx2, add_value_i32_avx2, sub_value_i32_avx2;
    Sse2 => add_i32_sse2, sub_i32_sse2, add_value_i32_sse2, sub_value_i32_sse2;
]);
impl_arith!(u32, [
    Avx2 => add_u32_avx2, sub_u32_avx2, add_value_u32_avx2, sub_value_u32_avx2;
    Sse2 => add_u32_sse2, sub_u32_sse2, add_value_u32_sse2, sub_value_u32_sse2;
]);
impl_arith!(f32, [
    Avx => add_f32_avx, sub_f32_avx, add_value_f32_avx, sub_value_f32_avx;
    Sse => add_f32_sse, sub_f32_sse, add_value_f32_sse, sub_value_f32_sse;
]);
impl_arith!(f64, [
    Avx => add_f64_avx, sub_f64_avx, add_value_f64_avx, sub_value_f64_avx;
    Sse2 => add_f64_sse2, sub_f64_sse2, add_value_f64_sse2, sub_value_f64_sse2;
]);

#[cfg(test)]
mod tests {
    use super::*;
    use cpu_features::SimdTier;

    /// Runs every variant the processor supports against the portable one.
    fn check_binary<T: ArithKernels>(table: KernelTable<BinaryFn<T>>, a: &[T], b: &[T]) {
        let caps = cpu_features::capabilities();
        let mut expected = vec![T::default(); a.len()];
        unsafe { (table.portable())(a.len(), a.as_ptr(), b.as_ptr(), expected.as_mut_ptr()) };
        for tier in table.tiers() {
            if !caps.supports(tier) {
                continue;
            }
            let kernel = table.for_tier(tier).unwrap();
            for n in 0..=a.len() {
                let mut out = vec![T::default(); n];
                unsafe { kernel(n, a.as_ptr(), b.as_ptr(), out.as_mut_ptr()) };
                assert_eq!(out, expected[..n], "tier {tier}, n {n}");
            }
        }
    }

    fn check_value<T: ArithKernels>(table: KernelTable<ValueFn<T>>, a: T, b: &[T]) {
        let caps = cpu_features::capabilities();
        let mut expected = vec![T::default(); b.len()];
        unsafe { (table.portable())(b.len(), a, b.as_ptr(), expected.as_mut_ptr()) };
        for tier in table.tiers() {
            if caps.supports(tier) {
                let mut out = vec![T::default(); b.len()];
                unsafe { (table.for_tier(tier).unwrap())(b.len(), a, b.as_ptr(), out.as_mut_ptr()) };
                assert_eq!(out, expected, "tier {tier}");
            }
        }
    }

    #[test]
    fn test_i8_saturates_on_every_tier() {
        let a: Vec<i8> = (0..70).map(|i| (i * 37 % 256) as u8 as i8).collect();
        let b: Vec<i8> = (0..70).map(|i| (i * 91 % 256) as u8 as i8).collect();
        check_binary(i8::add_kernels(), &a, &b);
        check_binary(i8::sub_kernels(), &a, &b);
        check_value(i8::add_value_kernels(), 100, &b);
        check_value(i8::sub_value_kernels(), -100, &b);
    }

    #[test]
    fn test_u16_and_u32_saturate_on_every_tier() {
        let a: Vec<u16> = (0..40).map(|i| (i * 4099) as u16).collect();
        let b: Vec<u16> = (0..40).map(|i| (65535 - i * 3001) as u16).collect();
        check_binary(u16::add_kernels(), &a, &b);
        check_binary(u16::sub_kernels(), &a, &b);

        let a: Vec<u32> = (0..40u32).map(|i| u32::MAX - i.wrapping_mul(0x1000_0000)).collect();
        let b: Vec<u32> = (0..40u32).map(|i| i.wrapping_mul(0x0800_0001)).collect();
        check_binary(u32::add_kernels(), &a, &b);
        check_binary(u32::sub_kernels(), &a, &b);
        check_value(u32::sub_value_kernels(), 5, &b);
    }

    #[test]
    fn test_i32_overflow_edges_on_every_tier() {
        let a = [i32::MAX, i32::MIN, -1, 0, 1, i32::MAX, i32::MIN, 12345, -7, 8, 9, 10];
        let b = [1, -1, i32::MIN, i32::MIN, i32::MAX, i32::MIN, i32::MAX, -12345, 7, -8, 9, 10];
        check_binary(i32::add_kernels(), &a, &b);
        check_binary(i32::sub_kernels(), &a, &b);
        check_value(i32::add_value_kernels(), i32::MAX, &b);
        check_value(i32::sub_value_kernels(), i32::MIN, &b);

        let mut out = [0i32; 2];
        unsafe { add_portable(2, a.as_ptr(), b.as_ptr(), out.as_mut_ptr()) };
        assert_eq!(out, [i32::MAX, i32::MIN]);
    }

    #[test]
    fn test_float_tiers_match() {
        let a: Vec<f32> = (0..19).map(|i| i as f32 * 0.25 - 2.0).collect();
        let b: Vec<f32> = (0..19).map(|i| 1.0 / (i as f32 + 1.0)).collect();
        check_binary(f32::add_kernels(), &a, &b);
        check_binary(f32::sub_kernels(), &a, &b);
        let a: Vec<f64> = a.iter().map(|&x| x as f64).collect();
        let b: Vec<f64> = b.iter().map(|&x| x as f64).collect();
        check_binary(f64::add_kernels(), &a, &b);
        check_value(f64::sub_value_kernels(), 3.5, &b);
    }

    #[test]
    fn test_output_may_alias_input() {
        let mut a: Vec<u8> = (0..50).map(|i| (i * 11) as u8).collect();
        let b: Vec<u8> = vec![200; 50];
        let expected: Vec<u8> = a.iter().map(|&x| x.saturating_add(200)).collect();
        let (tier, kernel) = u8::add_kernels().select(cpu_features::capabilities());
        let p = a.as_mut_ptr();
        unsafe { kernel(50, p, b.as_ptr(), p) };
        assert_eq!(a, expected, "tier {tier}");
    }

    #[test]
    fn test_tables_list_expected_tiers() {
        #[cfg(target_arch = "x86_64")]
        {
            assert_eq!(
                i16::add_kernels().tiers(),
                vec![SimdTier::Avx2, SimdTier::Sse2, SimdTier::None]
            );
            assert_eq!(
                f32::sub_kernels().tiers(),
                vec![SimdTier::Avx, SimdTier::Sse, SimdTier::None]
            );
        }
        assert_eq!(f64::add_kernels().tiers().last(), Some(&SimdTier::None));
    }
}
