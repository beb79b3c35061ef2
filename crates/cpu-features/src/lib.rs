// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # cpu-features
//!
//! Reports which SIMD instruction-set tiers the running processor can
//! execute, so that kernel dispatch can pick the widest usable variant.
//!
//! # Tiers
//! `none` (portable) < `sse` < `sse2` < `sse3` < `sse41` < `avx` < `avx2`.
//! See [`SimdTier`].
//!
//! # Stability
//! The answer is probed once per process and cached: [`capabilities`]
//! returns the same value on every call. Callers that need a reduced view
//! (benchmarks, cross-tier tests) derive one with
//! [`CpuCapabilities::capped`] instead of re-probing.
//!
//! # Graceful Degradation
//! On non-x86_64 targets every SIMD flag reads `false`. The
//! [`CpuInfo`] cross-check reads `/proc/cpuinfo` and fails with
//! [`ProbeError::NotAvailable`] where procfs does not exist; nothing in
//! dispatch depends on it.
//!
//! # Example
//! ```
//! use cpu_features::SimdTier;
//!
//! let caps = cpu_features::capabilities();
//! assert!(caps.supports(SimdTier::None));
//! println!("widest tier: {}", caps.best());
//! ```

mod caps;
mod cpuinfo;
mod error;
mod tier;

pub use caps::CpuCapabilities;
pub use cpuinfo::CpuInfo;
pub use error::ProbeError;
pub use tier::SimdTier;

use std::sync::OnceLock;

static CAPABILITIES: OnceLock<CpuCapabilities> = OnceLock::new();

/// Returns the process-wide capability flags, probing on first use.
pub fn capabilities() -> &'static CpuCapabilities {
    CAPABILITIES.get_or_init(|| {
        let caps = CpuCapabilities::detect();
        tracing::info!(best = %caps.best(), tiers = %caps, "probed SIMD capabilities");
        caps
    })
}
