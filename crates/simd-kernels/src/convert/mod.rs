// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Element type conversions.
//!
//! Two families:
//! - widening integer conversions, which are exact;
//! - conversion to `f32`/`f64` followed by a multiply, `c = F(a) * scale`.
//!   A plain float conversion is the same kernel with `scale = 1`.

#[cfg(target_arch = "x86_64")]
mod x86;

#[cfg(target_arch = "x86_64")]
pub(crate) use x86::{
    ps4_f32, ps4_f64, ps4_i16, ps4_i32, ps4_i8, ps4_u16, ps4_u32, ps4_u8, ps8_f32, ps8_f64,
    ps8_i16, ps8_i32, ps8_i8, ps8_u16, ps8_u32, ps8_u8,
};

use crate::lanes::{FloatLane, ToFloat};
use crate::table::{kernel_table, ConvertFn, KernelTable, ScaleFn};
use tensor_core::Numeric;

/// Widening conversion from `Self` to `D`.
pub trait WidenKernels<D: Numeric>: Numeric {
    fn widen_kernels() -> KernelTable<ConvertFn<Self, D>>;
}

/// Conversion from `Self` to the float type `F`, scaled.
pub trait ScaleKernels<F: FloatLane>: ToFloat {
    fn scale_kernels() -> KernelTable<ScaleFn<Self, F>>;
}

/// # Safety
/// `a` must be readable and `c` writable for `n` elements.
pub unsafe fn widen_portable<S: Copy + Into<D>, D>(n: usize, a: *const S, c: *mut D) {
    for i in 0..n {
        *c.add(i) = (*a.add(i)).into();
    }
}

/// # Safety
/// `a` must be readable and `c` writable for `n` elements.
pub unsafe fn scale_portable<S: ToFloat, F: FloatLane>(n: usize, a: *const S, c: *mut F, scale: F) {
    for i in 0..n {
        *c.add(i) = F::from_lane(*a.add(i)) * scale;
    }
}

macro_rules! impl_widen {
    ($($s:ty => $d:ty: $avx2:ident, $sse41:ident;)+) => {$(
        impl WidenKernels<$d> for $s {
            fn widen_kernels() -> KernelTable<ConvertFn<$s, $d>> {
                kernel_table!(ConvertFn<$s, $d>, widen_portable::<$s, $d>, [
                    Avx2 => x86::$avx2,
                    Sse41 => x86::$sse41,
                ])
            }
        }
    )+};
}

impl_widen! {
    i8 => i16: widen_i8_i16_avx2, widen_i8_i16_sse41;
    i8 => i32: widen_i8_i32_avx2, widen_i8_i32_sse41;
    u8 => u16: widen_u8_u16_avx2, widen_u8_u16_sse41;
    u8 => i16: widen_u8_i16_avx2, widen_u8_i16_sse41;
    u8 => u32: widen_u8_u32_avx2, widen_u8_u32_sse41;
    u8 => i32: widen_u8_i32_avx2, widen_u8_i32_sse41;
    i16 => i32: widen_i16_i32_avx2, widen_i16_i32_sse41;
    u16 => u32: widen_u16_u32_avx2, widen_u16_u32_sse41;
    u16 => i32: widen_u16_i32_avx2, widen_u16_i32_sse41;
}

macro_rules! impl_scale {
    ($($s:ty => $f:ty: [$($tier:ident => $k:ident),+];)+) => {$(
        impl ScaleKernels<$f> for $s {
            fn scale_kernels() -> KernelTable<ScaleFn<$s, $f>> {
                kernel_table!(ScaleFn<$s, $f>, scale_portable::<$s, $f>, [$($tier => x86::$k),+])
            }
        }
    )+};
}

impl_scale! {
    i8 => f32: [Avx2 => scale_i8_f32_avx2, Sse41 => scale_i8_f32_sse41];
    u8 => f32: [Avx2 => scale_u8_f32_avx2, Sse41 => scale_u8_f32_sse41];
    i16 => f32: [Avx2 => scale_i16_f32_avx2, Sse41 => scale_i16_f32_sse41];
    u16 => f32: [Avx2 => scale_u16_f32_avx2, Sse41 => scale_u16_f32_sse41];
    i32 => f32: [Avx => scale_i32_f32_avx, Sse2 => scale_i32_f32_sse2];
    u32 => f32: [Avx2 => scale_u32_f32_avx2, Sse2 => scale_u32_f32_sse2];
    f32 => f32: [Avx => scale_f32_f32_avx, Sse => scale_f32_f32_sse];
    f64 => f32: [Avx => scale_f64_f32_avx, Sse2 => scale_f64_f32_sse2];
    i8 => f64: [Avx2 => scale_i8_f64_avx2, Sse41 => scale_i8_f64_sse41];
    u8 => f64: [Avx2 => scale_u8_f64_avx2, Sse41 => scale_u8_f64_sse41];
    i16 => f64: [Avx2 => scale_i16_f64_avx2, Sse41 => scale_i16_f64_sse41];
    u16 => f64: [Avx2 => scale_u16_f64_avx2, Sse41 => scale_u16_f64_sse41];
    i32 => f64: [Avx => scale_i32_f64_avx, Sse2 => scale_i32_f64_sse2];
    u32 => f64: [Avx2 => scale_u32_f64_avx2, Sse2 => scale_u32_f64_sse2];
    f32 => f64: [Avx => scale_f32_f64_avx, Sse2 => scale_f32_f64_sse2];
    f64 => f64: [Avx => scale_f64_f64_avx, Sse2 => scale_f64_f64_sse2];
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpu_features::SimdTier;

    fn each_supported<F: Copy>(table: &KernelTable<F>, mut check: impl FnMut(SimdTier, F)) {
        let caps = cpu_features::capabilities();
        for tier in table.tiers() {
            if caps.supports(tier) {
                check(tier, table.for_tier(tier).unwrap());
            }
        }
    }

    #[test]
    fn test_widen_sign_and_zero_extension() {
        let a: Vec<i8> = (0..40).map(|i| (i * 13) as u8 as i8).collect();
        each_supported(&<i8 as WidenKernels<i32>>::widen_kernels(), |tier, k| {
            let mut out = vec![0i32; a.len()];
            unsafe { k(a.len(), a.as_ptr(), out.as_mut_ptr()) };
            let expected: Vec<i32> = a.iter().map(|&x| x as i32).collect();
            assert_eq!(out, expected, "tier {tier}");
        });

        let a: Vec<u8> = (0..35).map(|i| 255 - i as u8 * 7).collect();
        each_supported(&<u8 as WidenKernels<i16>>::widen_kernels(), |tier, k| {
            let mut out = vec![0i16; a.len()];
            unsafe { k(a.len(), a.as_ptr(), out.as_mut_ptr()) };
            assert!(out.iter().all(|&x| x >= 0), "tier {tier}");
            let expected: Vec<i16> = a.iter().map(|&x| x as i16).collect();
            assert_eq!(out, expected, "tier {tier}");
        });
    }

    #[test]
    fn test_widen_every_length() {
        let a: Vec<u16> = (0..20).map(|i| 65535 - i * 1000).collect();
        each_supported(&<u16 as WidenKernels<u32>>::widen_kernels(), |tier, k| {
            for n in 0..=a.len() {
                let mut out = vec![7u32; a.len()];
                unsafe { k(n, a.as_ptr(), out.as_mut_ptr()) };
                for (i, &x) in out.iter().enumerate() {
                    let expected = if i < n { a[i] as u32 } else { 7 };
                    assert_eq!(x, expected, "tier {tier}, n {n}, i {i}");
                }
            }
        });
    }

    #[test]
    fn test_u32_to_float_uses_full_range() {
        let a = [0u32, 1, 0x7fff_ffff, 0x8000_0000, 0x8000_0001, u32::MAX, 12345, 0xdead_beef, 3, 4];
        each_supported(&<u32 as ScaleKernels<f64>>::scale_kernels(), |tier, k| {
            let mut out = vec![0.0f64; a.len()];
            unsafe { k(a.len(), a.as_ptr(), out.as_mut_ptr(), 1.0) };
            let expected: Vec<f64> = a.iter().map(|&x| x as f64).collect();
            assert_eq!(out, expected, "tier {tier}");
        });
        each_supported(&<u32 as ScaleKernels<f32>>::scale_kernels(), |tier, k| {
            let mut out = vec![0.0f32; a.len()];
            unsafe { k(a.len(), a.as_ptr(), out.as_mut_ptr(), 0.5) };
            let expected: Vec<f32> = a.iter().map(|&x| x.to_f32() * 0.5).collect();
            assert_eq!(out, expected, "tier {tier}");
            assert!(out.iter().all(|&x| x >= 0.0));
        });
    }

    #[test]
    fn test_scale_tiers_match_portable() {
        let a: Vec<i16> = (0..27).map(|i| (i * 2731 - 30000) as i16).collect();
        let mut expected = vec![0.0f32; a.len()];
        unsafe { scale_portable(a.len(), a.as_ptr(), expected.as_mut_ptr(), 0.125f32) };
        each_supported(&<i16 as ScaleKernels<f32>>::scale_kernels(), |tier, k| {
            let mut out = vec![0.0f32; a.len()];
            unsafe { k(a.len(), a.as_ptr(), out.as_mut_ptr(), 0.125) };
            assert_eq!(out, expected, "tier {tier}");
        });

        let a: Vec<f64> = (0..13).map(|i| i as f64 / 3.0).collect();
        each_supported(&<f64 as ScaleKernels<f32>>::scale_kernels(), |tier, k| {
            let mut out = vec![0.0f32; a.len()];
            unsafe { k(a.len(), a.as_ptr(), out.as_mut_ptr(), 2.0) };
            let expected: Vec<f32> = a.iter().map(|&x| x as f32 * 2.0).collect();
            assert_eq!(out, expected, "tier {tier}");
        });
    }

    #[test]
    fn test_tier_lists() {
        #[cfg(target_arch = "x86_64")]
        {
            assert_eq!(
                <u8 as ScaleKernels<f32>>::scale_kernels().tiers(),
                vec![SimdTier::Avx2, SimdTier::Sse41, SimdTier::None]
            );
            assert_eq!(
                <f32 as ScaleKernels<f32>>::scale_kernels().tiers(),
                vec![SimdTier::Avx, SimdTier::Sse, SimdTier::None]
            );
        }
        assert_eq!(<i8 as WidenKernels<i16>>::widen_kernels().tiers().last(), Some(&SimdTier::None));
    }
}
