// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for capability probing.

/// Errors that can occur while probing or describing CPU capabilities.
#[derive(Debug, thiserror::Error)]
pub enum ProbeError {
    /// Failed to read a procfs or sysfs file.
    #[error("failed to read {path}: {source}")]
    ReadError {
        path: String,
        source: std::io::Error,
    },

    /// A system file did not have the expected format.
    #[error("failed to parse value from {path}: {detail}")]
    ParseError { path: String, detail: String },

    /// The expected procfs path does not exist (e.g., not running on Linux).
    #[error("procfs path not found: {path}")]
    NotAvailable { path: String },

    /// A tier name could not be recognised.
    #[error("unknown SIMD tier '{0}'; expected one of none, sse, sse2, sse3, sse41, avx, avx2")]
    UnknownTier(String),
}
