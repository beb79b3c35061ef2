// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for BMP encoding and decoding.

use tensor_core::TensorError;

/// Errors raised while reading or writing a bitmap.
#[derive(Debug, thiserror::Error)]
pub enum BitmapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The file is not a well-formed BMP.
    #[error("invalid BMP header: {0}")]
    InvalidHeader(String),

    /// A well-formed BMP variant this codec does not handle.
    #[error("unsupported BMP: {0}")]
    Unsupported(String),

    #[error("image buffer: {0}")]
    Tensor(#[from] TensorError),
}
