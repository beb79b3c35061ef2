// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Runtime SIMD capability flags.
//!
//! [`CpuCapabilities::detect`] asks the processor directly (CPUID via
//! `is_x86_feature_detected!`). On non-x86_64 targets every SIMD flag is
//! `false` and only the portable tier is usable.

use crate::SimdTier;
use std::fmt;

/// The set of SIMD tiers usable on the current processor.
///
/// Instances are plain data: they can be probed from hardware, capped for
/// testing or benchmarking, or built synthetically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct CpuCapabilities {
    pub sse: bool,
    pub sse2: bool,
    pub sse3: bool,
    pub sse41: bool,
    pub avx: bool,
    pub avx2: bool,
}

impl CpuCapabilities {
    /// Probes the running processor.
    ///
    /// Each call re-executes CPUID; use [`crate::capabilities`] for the
    /// cached process-wide answer.
    pub fn detect() -> Self {
        #[cfg(target_arch = "x86_64")]
        {
            Self {
                sse: is_x86_feature_detected!("sse"),
                sse2: is_x86_feature_detected!("sse2"),
                sse3: is_x86_feature_detected!("sse3"),
                sse41: is_x86_feature_detected!("sse4.1"),
                avx: is_x86_feature_detected!("avx"),
                avx2: is_x86_feature_detected!("avx2"),
            }
        }
        #[cfg(not(target_arch = "x86_64"))]
        {
            Self::none()
        }
    }

    /// Capabilities with every SIMD tier disabled (portable code only).
    pub fn none() -> Self {
        Self::default()
    }

    /// Builds capabilities with exactly the listed tiers enabled.
    ///
    /// Tiers are not implied by one another here: listing `Avx2` alone
    /// does not enable `Sse2`.
    pub fn from_tiers(tiers: &[SimdTier]) -> Self {
        let mut caps = Self::none();
        for &tier in tiers {
            caps.set(tier, true);
        }
        caps
    }

    /// Returns `true` if kernels of `tier` can run.
    ///
    /// `SimdTier::None` is always supported.
    pub fn supports(&self, tier: SimdTier) -> bool {
        match tier {
            SimdTier::None => true,
            SimdTier::Sse => self.sse,
            SimdTier::Sse2 => self.sse2,
            SimdTier::Sse3 => self.sse3,
            SimdTier::Sse41 => self.sse41,
            SimdTier::Avx => self.avx,
            SimdTier::Avx2 => self.avx2,
        }
    }

    /// Returns the widest supported tier.
    pub fn best(&self) -> SimdTier {
        SimdTier::PRIORITY
            .into_iter()
            .find(|&t| self.supports(t))
            .unwrap_or(SimdTier::None)
    }

    /// Returns all supported tiers, widest first. Always ends with `None`.
    pub fn tiers(&self) -> Vec<SimdTier> {
        SimdTier::PRIORITY
            .into_iter()
            .filter(|&t| self.supports(t))
            .collect()
    }

    /// Returns a copy with every tier above `max` disabled.
    ///
    /// # Examples
    /// ```
    /// use cpu_features::{CpuCapabilities, SimdTier};
    ///
    /// let all = CpuCapabilities::from_tiers(&SimdTier::PRIORITY);
    /// let capped = all.capped(SimdTier::Sse2);
    /// assert!(capped.supports(SimdTier::Sse2));
    /// assert!(!capped.supports(SimdTier::Avx));
    /// assert_eq!(capped.best(), SimdTier::Sse2);
    /// ```
    pub fn capped(&self, max: SimdTier) -> Self {
        let mut caps = *self;
        for tier in SimdTier::PRIORITY {
            if tier > max {
                caps.set(tier, false);
            }
        }
        caps
    }

    /// Returns a copy with `tier` disabled. Disabling `None` has no effect.
    pub fn without(&self, tier: SimdTier) -> Self {
        let mut caps = *self;
        caps.set(tier, false);
        caps
    }

    /// Returns the tiers present in both `self` and `other`.
    ///
    /// Synthetic capabilities are intersected with the probed ones before
    /// kernels are selected from them.
    pub fn intersection(&self, other: &Self) -> Self {
        Self {
            sse: self.sse && other.sse,
            sse2: self.sse2 && other.sse2,
            sse3: self.sse3 && other.sse3,
            sse41: self.sse41 && other.sse41,
            avx: self.avx && other.avx,
            avx2: self.avx2 && other.avx2,
        }
    }

    fn set(&mut self, tier: SimdTier, enabled: bool) {
        match tier {
            SimdTier::None => {}
            SimdTier::Sse => self.sse = enabled,
            SimdTier::Sse2 => self.sse2 = enabled,
            SimdTier::Sse3 => self.sse3 = enabled,
            SimdTier::Sse41 => self.sse41 = enabled,
            SimdTier::Avx => self.avx = enabled,
            SimdTier::Avx2 => self.avx2 = enabled,
        }
    }
}

impl fmt::Display for CpuCapabilities {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.tiers().into_iter().map(SimdTier::as_str).collect();
        write!(f, "[{}]", names.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_supports_only_portable() {
        let caps = CpuCapabilities::none();
        assert!(caps.supports(SimdTier::None));
        for tier in &SimdTier::PRIORITY[..6] {
            assert!(!caps.supports(*tier));
        }
        assert_eq!(caps.best(), SimdTier::None);
        assert_eq!(caps.tiers(), vec![SimdTier::None]);
    }

    #[test]
    fn test_from_tiers() {
        let caps = CpuCapabilities::from_tiers(&[SimdTier::Sse2, SimdTier::Avx]);
        assert!(caps.sse2);
        assert!(caps.avx);
        assert!(!caps.sse);
        assert_eq!(caps.best(), SimdTier::Avx);
    }

    #[test]
    fn test_capped() {
        let all = CpuCapabilities::from_tiers(&SimdTier::PRIORITY);
        let capped = all.capped(SimdTier::Sse3);
        assert_eq!(capped.best(), SimdTier::Sse3);
        assert!(capped.sse && capped.sse2 && capped.sse3);
        assert!(!capped.sse41 && !capped.avx && !capped.avx2);

        let scalar = all.capped(SimdTier::None);
        assert_eq!(scalar, CpuCapabilities::none());
    }

    #[test]
    fn test_without() {
        let all = CpuCapabilities::from_tiers(&SimdTier::PRIORITY);
        let no_avx2 = all.without(SimdTier::Avx2);
        assert_eq!(no_avx2.best(), SimdTier::Avx);
        assert_eq!(all.without(SimdTier::None), all);
    }

    #[test]
    fn test_intersection() {
        let a = CpuCapabilities::from_tiers(&[SimdTier::Sse, SimdTier::Sse2, SimdTier::Avx]);
        let b = CpuCapabilities::from_tiers(&[SimdTier::Sse2, SimdTier::Avx2]);
        let both = a.intersection(&b);
        assert_eq!(both.tiers(), vec![SimdTier::Sse2, SimdTier::None]);
        assert_eq!(a.intersection(&CpuCapabilities::none()), CpuCapabilities::none());
    }

    #[test]
    fn test_detect_is_stable() {
        assert_eq!(CpuCapabilities::detect(), CpuCapabilities::detect());
    }

    #[cfg(target_arch = "x86_64")]
    #[test]
    fn test_detect_x86_64_baseline() {
        // SSE and SSE2 are part of the x86_64 baseline.
        let caps = CpuCapabilities::detect();
        assert!(caps.sse);
        assert!(caps.sse2);
    }

    #[test]
    fn test_display() {
        let caps = CpuCapabilities::from_tiers(&[SimdTier::Sse, SimdTier::Sse2]);
        assert_eq!(caps.to_string(), "[sse2, sse, none]");
    }
}
