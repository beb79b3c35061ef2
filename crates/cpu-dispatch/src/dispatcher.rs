// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Kernel selection against a fixed set of capabilities.
//!
//! A [`Dispatcher`] holds the capabilities kernels may be chosen from and
//! the broadcast tiling length. The process-wide instance behind the
//! `cpu_*` free functions is built once, from [`DispatchConfig::default`]
//! unless [`Dispatcher::install`] ran first.

use crate::DispatchConfig;
use cpu_features::{CpuCapabilities, SimdTier};
use simd_kernels::KernelTable;
use std::fmt;
use std::sync::OnceLock;

static GLOBAL: OnceLock<Dispatcher> = OnceLock::new();

/// Selects and runs the widest kernel variant its capabilities allow.
#[derive(Clone, PartialEq)]
pub struct Dispatcher {
    caps: CpuCapabilities,
    broadcast_tile: usize,
}

impl Dispatcher {
    /// Creates a dispatcher for the running processor, restricted by `config`.
    pub fn new(config: &DispatchConfig) -> Self {
        let caps = config.effective_capabilities(cpu_features::capabilities());
        tracing::info!(
            best = %caps.best(),
            tiers = %caps,
            broadcast_tile = config.broadcast_tile,
            "dispatcher configured"
        );
        Self {
            caps,
            broadcast_tile: config.broadcast_tile,
        }
    }

    /// Creates a dispatcher limited to `caps`.
    ///
    /// Tiers the running processor lacks are removed, so a dispatcher can
    /// never select a kernel the hardware cannot execute.
    pub fn with_capabilities(caps: CpuCapabilities) -> Self {
        let effective = caps.intersection(cpu_features::capabilities());
        if effective != caps {
            tracing::debug!(
                requested = %caps,
                effective = %effective,
                "dropped tiers the processor does not support"
            );
        }
        Self {
            caps: effective,
            broadcast_tile: DispatchConfig::default().broadcast_tile,
        }
    }

    /// Same dispatcher with a different broadcast tiling length.
    pub fn with_broadcast_tile(mut self, tile: usize) -> Self {
        self.broadcast_tile = tile;
        self
    }

    /// The process-wide dispatcher, created with the default configuration
    /// on first use.
    pub fn global() -> &'static Dispatcher {
        GLOBAL.get_or_init(|| Dispatcher::new(&DispatchConfig::default()))
    }

    /// Makes `config` the process-wide configuration.
    ///
    /// Only the first call (or a [`Dispatcher::global`] call) has an
    /// effect; later calls log a warning and return the existing instance.
    pub fn install(config: &DispatchConfig) -> &'static Dispatcher {
        let mut installed = false;
        let dispatcher = GLOBAL.get_or_init(|| {
            installed = true;
            Dispatcher::new(config)
        });
        if !installed {
            let caps = config.effective_capabilities(cpu_features::capabilities());
            if dispatcher.caps != caps || dispatcher.broadcast_tile != config.broadcast_tile {
                tracing::warn!("global dispatcher already initialised; configuration ignored");
            }
        }
        dispatcher
    }

    pub fn capabilities(&self) -> &CpuCapabilities {
        &self.caps
    }

    pub fn broadcast_tile(&self) -> usize {
        self.broadcast_tile
    }

    /// Tier `table` would run at.
    pub fn tier_for<F: Copy + 'static>(&self, table: &KernelTable<F>) -> SimdTier {
        table.select(&self.caps).0
    }

    /// Picks the kernel for `op` from `table`.
    pub(crate) fn select<F: Copy + 'static>(&self, op: &'static str, table: &KernelTable<F>) -> F {
        let (tier, kernel) = table.select(&self.caps);
        tracing::trace!(op, tier = %tier, "kernel selected");
        kernel
    }
}

impl Default for Dispatcher {
    fn default() -> Self {
        Self::new(&DispatchConfig::default())
    }
}

impl fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Dispatcher")
            .field("best", &self.caps.best())
            .field("tiers", &self.caps.tiers())
            .field("broadcast_tile", &self.broadcast_tile)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use simd_kernels::ArithKernels;

    #[test]
    fn test_global_is_shared() {
        let a = Dispatcher::global();
        let b = Dispatcher::global();
        assert!(std::ptr::eq(a, b));
    }

    #[test]
    fn test_with_capabilities_never_exceeds_hardware() {
        let all = CpuCapabilities::from_tiers(&SimdTier::PRIORITY);
        let d = Dispatcher::with_capabilities(all);
        assert_eq!(*d.capabilities(), *cpu_features::capabilities());
        assert_eq!(
            Dispatcher::with_capabilities(CpuCapabilities::none()).capabilities().best(),
            SimdTier::None
        );
    }

    #[test]
    fn test_tier_for_respects_config() {
        let d = Dispatcher::new(&DispatchConfig {
            max_tier: Some(SimdTier::None),
            ..Default::default()
        });
        assert_eq!(d.tier_for(&i32::add_kernels()), SimdTier::None);

        let d = Dispatcher::default();
        let tier = d.tier_for(&i32::add_kernels());
        assert!(d.capabilities().supports(tier));
    }

    #[test]
    fn test_broadcast_tile_override() {
        let d = Dispatcher::default().with_broadcast_tile(8);
        assert_eq!(d.broadcast_tile(), 8);
    }
}
