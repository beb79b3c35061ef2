// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! SIMD instruction-set tiers.
//!
//! A [`SimdTier`] names one x86 capability level that a kernel variant may
//! require. Tiers are totally ordered from the portable fallback up to
//! AVX2; the ordering is also the dispatch priority (widest first).

use crate::ProbeError;
use std::fmt;
use std::str::FromStr;

/// One SIMD capability level a kernel variant can be compiled for.
///
/// The derived ordering follows register width and instruction richness:
/// `None < Sse < Sse2 < Sse3 < Sse41 < Avx < Avx2`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SimdTier {
    /// Portable scalar code, always available.
    None,
    /// SSE: 128-bit single-precision float lanes.
    Sse,
    /// SSE2: 128-bit integer and double-precision lanes.
    Sse2,
    /// SSE3: horizontal adds.
    Sse3,
    /// SSE4.1: integer sign/zero-extension and blends.
    Sse41,
    /// AVX: 256-bit float and double lanes.
    Avx,
    /// AVX2: 256-bit integer lanes.
    Avx2,
}

impl SimdTier {
    /// All tiers in dispatch priority order, widest first.
    pub const PRIORITY: [SimdTier; 7] = [
        SimdTier::Avx2,
        SimdTier::Avx,
        SimdTier::Sse41,
        SimdTier::Sse3,
        SimdTier::Sse2,
        SimdTier::Sse,
        SimdTier::None,
    ];

    /// Returns a short lowercase label for this tier.
    pub fn as_str(self) -> &'static str {
        match self {
            SimdTier::None => "none",
            SimdTier::Sse => "sse",
            SimdTier::Sse2 => "sse2",
            SimdTier::Sse3 => "sse3",
            SimdTier::Sse41 => "sse41",
            SimdTier::Avx => "avx",
            SimdTier::Avx2 => "avx2",
        }
    }

    /// Returns the register width in bits used by kernels of this tier.
    pub fn register_bits(self) -> usize {
        match self {
            SimdTier::None => 64,
            SimdTier::Sse | SimdTier::Sse2 | SimdTier::Sse3 | SimdTier::Sse41 => 128,
            SimdTier::Avx | SimdTier::Avx2 => 256,
        }
    }

    /// Returns the `/proc/cpuinfo` flag that advertises this tier, if any.
    pub fn cpuinfo_flag(self) -> Option<&'static str> {
        match self {
            SimdTier::None => None,
            SimdTier::Sse => Some("sse"),
            SimdTier::Sse2 => Some("sse2"),
            // The kernel reports SSE3 as "pni" (Prescott New Instructions).
            SimdTier::Sse3 => Some("pni"),
            SimdTier::Sse41 => Some("sse4_1"),
            SimdTier::Avx => Some("avx"),
            SimdTier::Avx2 => Some("avx2"),
        }
    }
}

impl fmt::Display for SimdTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SimdTier {
    type Err = ProbeError;

    /// Parses a tier name. Case-insensitive; accepts `sse4.1` and `sse4_1`
    /// as aliases of `sse41`, and `scalar` as an alias of `none`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "none" | "scalar" => Ok(SimdTier::None),
            "sse" => Ok(SimdTier::Sse),
            "sse2" => Ok(SimdTier::Sse2),
            "sse3" => Ok(SimdTier::Sse3),
            "sse41" | "sse4.1" | "sse4_1" => Ok(SimdTier::Sse41),
            "avx" => Ok(SimdTier::Avx),
            "avx2" => Ok(SimdTier::Avx2),
            other => Err(ProbeError::UnknownTier(other.to_string())),
        }
    }
}
