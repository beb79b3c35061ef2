// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for dispatch configuration.
//!
//! Operations on containers report [`tensor_core::TensorError`]; this
//! module only covers loading and saving a [`DispatchConfig`](crate::DispatchConfig).

use std::path::PathBuf;

/// Errors that can occur while loading or saving a dispatch configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML text is malformed or names an unknown tier.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration could not be rendered as TOML.
    #[error("TOML serialise error: {0}")]
    Serialize(#[from] toml::ser::Error),

    /// A value is syntactically valid but unusable.
    #[error("invalid configuration: {0}")]
    Invalid(String),
}
