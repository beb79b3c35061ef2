// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Kernel signatures and per-tier kernel tables.
//!
//! Every kernel works on raw pointers and element counts. Callers must
//! guarantee that each pointer is valid for the number of elements the
//! kernel reads or writes; the output may alias an input of the same type.

use cpu_features::{CpuCapabilities, SimdTier};
use std::fmt;

/// `c[i] = a[i] OP b[i]` for `i < n`.
pub type BinaryFn<T> = unsafe fn(n: usize, a: *const T, b: *const T, c: *mut T);

/// `c[i] = a OP b[i]` for `i < n`, with a constant left operand.
pub type ValueFn<T> = unsafe fn(n: usize, a: T, b: *const T, c: *mut T);

/// `c[i] = OP a[i]` for `i < n`.
pub type UnaryFn<T> = unsafe fn(n: usize, a: *const T, c: *mut T);

/// `c[i] = D::from(a[i])` for `i < n`.
pub type ConvertFn<S, D> = unsafe fn(n: usize, a: *const S, c: *mut D);

/// `c[i] = F(a[i]) * scale` for `i < n`.
pub type ScaleFn<S, F> = unsafe fn(n: usize, a: *const S, c: *mut F, scale: F);

/// Reduction over a `rows × columns` block whose rows start `stride`
/// elements apart, accumulating into `acc`.
pub type SumFn<T> =
    unsafe fn(rows: usize, columns: usize, a: *const T, stride: usize, acc: *mut f32);

/// `b[j * ldb + i] = a[i * lda + j]` for `i < rows`, `j < columns`.
/// `a` and `b` must not overlap.
pub type TransposeFn<W> =
    unsafe fn(rows: usize, columns: usize, a: *const W, lda: usize, b: *mut W, ldb: usize);

/// `c[i] = a[i] + offset` for `i < n`.
pub type OffsetFn<I> = unsafe fn(n: usize, a: *const I, c: *mut I, offset: I);

/// The variants of one kernel: a portable fallback plus the accelerated
/// variants compiled for this target, each tagged with the tier it needs.
#[derive(Clone, Copy)]
pub struct KernelTable<F: Copy + 'static> {
    portable: F,
    accelerated: &'static [(SimdTier, F)],
}

impl<F: Copy + 'static> KernelTable<F> {
    pub const fn new(portable: F, accelerated: &'static [(SimdTier, F)]) -> Self {
        Self {
            portable,
            accelerated,
        }
    }

    /// Picks the variant for the widest tier in `caps`, walking
    /// [`SimdTier::PRIORITY`]. Falls back to the portable variant.
    pub fn select(&self, caps: &CpuCapabilities) -> (SimdTier, F) {
        for tier in SimdTier::PRIORITY {
            if !caps.supports(tier) {
                continue;
            }
            if let Some(f) = self.for_tier(tier) {
                return (tier, f);
            }
        }
        (SimdTier::None, self.portable)
    }

    /// The variant compiled for exactly `tier`, if any.
    pub fn for_tier(&self, tier: SimdTier) -> Option<F> {
        if tier == SimdTier::None {
            return Some(self.portable);
        }
        self.accelerated
            .iter()
            .find(|(t, _)| *t == tier)
            .map(|&(_, f)| f)
    }

    pub fn portable(&self) -> F {
        self.portable
    }

    /// Tiers with a variant, widest first, ending with `None`.
    pub fn tiers(&self) -> Vec<SimdTier> {
        SimdTier::PRIORITY
            .into_iter()
            .filter(|&t| self.for_tier(t).is_some())
            .collect()
    }
}

impl<F: Copy + 'static> fmt::Debug for KernelTable<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KernelTable")
            .field("tiers", &self.tiers())
            .finish()
    }
}

/// Builds a [`KernelTable`] of fn-pointer type `$ty`; the accelerated
/// entries only exist on x86_64.
macro_rules! kernel_table {
    ($ty:ty, $portable:expr, [$($tier:ident => $f:path),* $(,)?]) => {{
        #[cfg(target_arch = "x86_64")]
        const ACCELERATED: &[(::cpu_features::SimdTier, $ty)] =
            &[$((::cpu_features::SimdTier::$tier, $f as $ty)),*];
        #[cfg(not(target_arch = "x86_64"))]
        const ACCELERATED: &[(::cpu_features::SimdTier, $ty)] = &[];
        $crate::table::KernelTable::new($portable as $ty, ACCELERATED)
    }};
}

pub(crate) use kernel_table;

#[cfg(test)]
mod tests {
    use super::*;

    unsafe fn portable(_n: usize, _a: *const u8, _c: *mut u8) {}
    unsafe fn sse2(_n: usize, _a: *const u8, _c: *mut u8) {}
    unsafe fn avx2(_n: usize, _a: *const u8, _c: *mut u8) {}

    const TABLE: KernelTable<UnaryFn<u8>> = KernelTable::new(
        portable,
        &[(SimdTier::Sse2, sse2 as UnaryFn<u8>), (SimdTier::Avx2, avx2 as UnaryFn<u8>)],
    );

    #[test]
    fn test_select_prefers_widest() {
        let all = CpuCapabilities::from_tiers(&SimdTier::PRIORITY);
        assert_eq!(TABLE.select(&all).0, SimdTier::Avx2);
        assert_eq!(TABLE.select(&all.without(SimdTier::Avx2)).0, SimdTier::Sse2);
        assert_eq!(TABLE.select(&all.capped(SimdTier::Sse)).0, SimdTier::None);
        assert_eq!(TABLE.select(&CpuCapabilities::none()).0, SimdTier::None);
    }

    #[test]
    fn test_tiers() {
        assert_eq!(
            TABLE.tiers(),
            vec![SimdTier::Avx2, SimdTier::Sse2, SimdTier::None]
        );
        assert!(TABLE.for_tier(SimdTier::Avx).is_none());
        assert!(TABLE.for_tier(SimdTier::None).is_some());
    }

    #[test]
    fn test_debug_lists_tiers() {
        let s = format!("{TABLE:?}");
        assert!(s.contains("Avx2"));
    }
}
