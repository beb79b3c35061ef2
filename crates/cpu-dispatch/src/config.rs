// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Dispatch configuration loaded from TOML files or constructed programmatically.
//!
//! # TOML Format
//! ```toml
//! max_tier = "avx2"
//! disabled_tiers = ["sse3"]
//! broadcast_tile = 64
//! memory_budget = "256M"
//! ```
//!
//! Every key is optional; a missing key keeps the default.

use crate::ConfigError;
use cpu_features::{CpuCapabilities, SimdTier};
use memory_manager::MemoryBudget;
use std::path::Path;

/// Configuration for a [`Dispatcher`](crate::Dispatcher).
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct DispatchConfig {
    /// Highest tier kernels may be selected from (`None` = no cap).
    pub max_tier: Option<SimdTier>,
    /// Tiers never used, even if the processor supports them.
    pub disabled_tiers: Vec<SimdTier>,
    /// Minimum pattern length when a short broadcast unit is repeated.
    pub broadcast_tile: usize,
    /// Budget for pool-allocated containers (human-readable, e.g. `"512M"`).
    pub memory_budget: Option<String>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_tier: None,
            disabled_tiers: Vec::new(),
            broadcast_tile: 64,
            memory_budget: None,
        }
    }
}

impl DispatchConfig {
    /// Loads configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialises configuration to TOML.
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Restricts `detected` to the tiers this configuration allows.
    pub fn effective_capabilities(&self, detected: &CpuCapabilities) -> CpuCapabilities {
        let mut caps = match self.max_tier {
            Some(max) => detected.capped(max),
            None => *detected,
        };
        for &tier in &self.disabled_tiers {
            caps = caps.without(tier);
        }
        caps
    }

    /// Parses the memory budget, if one is configured.
    pub fn parse_budget(&self) -> Result<Option<MemoryBudget>, ConfigError> {
        self.memory_budget
            .as_deref()
            .map(|text| {
                MemoryBudget::parse(text)
                    .map_err(|e| ConfigError::Invalid(format!("invalid budget: {e}")))
            })
            .transpose()
    }
}
