// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Single-lane semantics shared by the portable kernels.
//!
//! The accelerated variants compute exactly these functions, lane by lane;
//! the portable kernels call them directly.

use tensor_core::Numeric;

/// `true` if `a + b` overflowed, given the wrapped result `r`.
///
/// Overflow happened iff both operands share a sign that the result lost.
/// Narrow values are passed sign-extended.
#[inline]
pub const fn signed_add_overflowed(a: i64, b: i64, r: i64) -> bool {
    ((a ^ r) & (b ^ r)) < 0
}

/// `true` if `a - b` overflowed, given the wrapped result `r`.
///
/// Overflow happened iff the operands differ in sign and the result's sign
/// differs from `a`.
#[inline]
pub const fn signed_sub_overflowed(a: i64, b: i64, r: i64) -> bool {
    ((a ^ b) & (a ^ r)) < 0
}

/// Saturating add/sub for one lane. Floats use plain IEEE arithmetic.
pub trait Saturating: Numeric {
    fn lane_add(self, rhs: Self) -> Self;
    fn lane_sub(self, rhs: Self) -> Self;
}

macro_rules! impl_signed {
    ($($t:ty),*) => {$(
        impl Saturating for $t {
            #[inline]
            fn lane_add(self, rhs: Self) -> Self {
                let r = self.wrapping_add(rhs);
                if signed_add_overflowed(self as i64, rhs as i64, r as i64) {
                    if self < 0 { <$t>::MIN } else { <$t>::MAX }
                } else {
                    r
                }
            }

            #[inline]
            fn lane_sub(self, rhs: Self) -> Self {
                let r = self.wrapping_sub(rhs);
                if signed_sub_overflowed(self as i64, rhs as i64, r as i64) {
                    if self < 0 { <$t>::MIN } else { <$t>::MAX }
                } else {
                    r
                }
            }
        }
    )*};
}

macro_rules! impl_unsigned {
    ($($t:ty),*) => {$(
        impl Saturating for $t {
            #[inline]
            fn lane_add(self, rhs: Self) -> Self {
                let r = self.wrapping_add(rhs);
                if r < self { <$t>::MAX } else { r }
            }

            #[inline]
            fn lane_sub(self, rhs: Self) -> Self {
                let r = self.wrapping_sub(rhs);
                if r > self { 0 } else { r }
            }
        }
    )*};
}

macro_rules! impl_float {
    ($($t:ty),*) => {$(
        impl Saturating for $t {
            #[inline]
            fn lane_add(self, rhs: Self) -> Self {
                self + rhs
            }

            #[inline]
            fn lane_sub(self, rhs: Self) -> Self {
                self - rhs
            }
        }
    )*};
}

impl_signed!(i8, i16, i32);
impl_unsigned!(u8, u16, u32);
impl_float!(f32, f64);

/// 2^31 as an `f32` bit pattern.
pub const U32_BIAS_F32: u32 = 0x4f00_0000;
/// 2^31 as an `f64` bit pattern.
pub const U32_BIAS_F64: u64 = 0x41e0_0000_0000_0000;

/// Conversion of one lane to a float.
///
/// `u32` is converted as `(x & 0x7fff_ffff) + (x >> 31) * 2^31`, the same
/// split the vector paths use since the hardware only converts signed
/// 32-bit integers.
pub trait ToFloat: Numeric {
    fn to_f32(self) -> f32;
    fn to_f64(self) -> f64;
}

macro_rules! impl_to_float {
    ($($t:ty),*) => {$(
        impl ToFloat for $t {
            #[inline]
            fn to_f32(self) -> f32 {
                self as f32
            }

            #[inline]
            fn to_f64(self) -> f64 {
                self as f64
            }
        }
    )*};
}

impl_to_float!(i8, u8, i16, u16, i32, f32, f64);

impl ToFloat for u32 {
    #[inline]
    fn to_f32(self) -> f32 {
        let low = (self & 0x7fff_ffff) as i32 as f32;
        if self & 0x8000_0000 != 0 {
            low + f32::from_bits(U32_BIAS_F32)
        } else {
            low
        }
    }

    #[inline]
    fn to_f64(self) -> f64 {
        let low = (self & 0x7fff_ffff) as i32 as f64;
        if self & 0x8000_0000 != 0 {
            low + f64::from_bits(U32_BIAS_F64)
        } else {
            low
        }
    }
}

/// A float target of a conversion.
pub trait FloatLane: Numeric + std::ops::Mul<Output = Self> {
    fn from_lane<S: ToFloat>(value: S) -> Self;
}

impl FloatLane for f32 {
    #[inline]
    fn from_lane<S: ToFloat>(value: S) -> Self {
        value.to_f32()
    }
}

impl FloatLane for f64 {
    #[inline]
    fn from_lane<S: ToFloat>(value: S) -> Self {
        value.to_f64()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signed_saturation() {
        assert_eq!(100i8.lane_add(100), i8::MAX);
        assert_eq!((-100i8).lane_add(-100), i8::MIN);
        assert_eq!((-100i8).lane_sub(100), i8::MIN);
        assert_eq!(100i8.lane_sub(-100), i8::MAX);
        assert_eq!(i32::MAX.lane_add(1), i32::MAX);
        assert_eq!(i32::MIN.lane_sub(1), i32::MIN);
        assert_eq!(5i16.lane_sub(7), -2);
    }

    #[test]
    fn test_unsigned_saturation() {
        assert_eq!(200u8.lane_add(100), u8::MAX);
        assert_eq!(3u8.lane_sub(5), 0);
        assert_eq!(u32::MAX.lane_add(u32::MAX), u32::MAX);
        assert_eq!(10u32.lane_sub(4), 6);
        assert_eq!(0u16.lane_sub(1), 0);
    }

    #[test]
    fn test_overflow_predicates() {
        let (a, b) = (i32::MAX as i64, 1i64);
        let r = (i32::MAX.wrapping_add(1)) as i64;
        assert!(signed_add_overflowed(a, b, r));
        assert!(!signed_add_overflowed(1, 2, 3));
        let r = (i32::MIN.wrapping_sub(1)) as i64;
        assert!(signed_sub_overflowed(i32::MIN as i64, 1, r));
        assert!(!signed_sub_overflowed(-1, -1, 0));
    }

    #[test]
    fn test_u32_bias_split() {
        assert_eq!(f32::from_bits(U32_BIAS_F32), 2_147_483_648.0);
        assert_eq!(f64::from_bits(U32_BIAS_F64), 2_147_483_648.0);
        assert_eq!(u32::MAX.to_f64(), 4_294_967_295.0);
        assert_eq!(0x8000_0000u32.to_f32(), 2_147_483_648.0);
        assert_eq!(7u32.to_f32(), 7.0);
    }

    #[test]
    fn test_float_lane() {
        assert_eq!(f32::from_lane(-3i8), -3.0);
        assert_eq!(f64::from_lane(1.5f32), 1.5);
        assert_eq!(f32::from_lane(0.1f64), 0.1f32);
    }
}
