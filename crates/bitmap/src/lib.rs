// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # bitmap
//!
//! Minimal BMP codec over [`Matrix<u8>`](tensor_core::Matrix).
//!
//! Supports uncompressed images with a 40-byte (or larger) info header:
//! - 8-bit with a grayscale palette (`dimension = 1`),
//! - 24-bit (`dimension = 3`, channels B, G, R),
//! - 32-bit (`dimension = 4`, channels B, G, R, A).
//!
//! Both bottom-up and top-down files are read; files are always written
//! bottom-up. Channel order is kept as stored.
//!
//! ```
//! use tensor_core::Matrix;
//!
//! let image: Matrix<u8> = Matrix::from_slice(1, 2, 3, &[255, 0, 0, 0, 0, 255]).unwrap();
//! let bytes = bitmap::encode(&image).unwrap();
//! assert_eq!(&bytes[..2], b"BM");
//! assert_eq!(bitmap::decode(&bytes).unwrap(), image);
//! ```

mod codec;
mod error;
pub mod header;

pub use codec::{decode, encode, read_bmp, write_bmp};
pub use error::BitmapError;
pub use header::BmpHeader;
