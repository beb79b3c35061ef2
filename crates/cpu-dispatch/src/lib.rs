// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # cpu-dispatch
//!
//! Checked operations on `tensor-core` containers, each running the widest
//! `simd-kernels` variant the processor supports.
//!
//! Every operation:
//! - validates its operands before touching the destination,
//! - picks the kernel for the best tier the [`Dispatcher`]'s capabilities
//!   allow,
//! - returns the destination on success, so calls can be chained.
//!
//! The `cpu_*` free functions use the process-wide dispatcher; the same
//! operations are methods on [`Dispatcher`] for callers that need a capped
//! tier set (tests, benchmarks, [`DispatchConfig`] files).
//!
//! # Operations
//! | Family | Functions |
//! |--------|-----------|
//! | Saturating arithmetic | `cpu_add`, `cpu_sub` (+ `_assign`, `_value`, `_broadcast` forms) |
//! | Bitwise | `cpu_and`, `cpu_or`, `cpu_xor` (same forms), `cpu_not` |
//! | Conversion | `cpu_convert`, `cpu_convert_float`, `cpu_convert_scale` |
//! | Reduction | `cpu_row_sums`, `cpu_column_sums` |
//! | Transpose | `cpu_transpose`, `cpu_transpose_tensor` |
//! | Indexing | `cpu_sliding_window` |
//!
//! # Example
//! ```
//! use cpu_dispatch::{cpu_add_broadcast, cpu_convert_scale};
//! use tensor_core::{Matrix, Vector};
//!
//! let image: Matrix<u8> = Matrix::from_slice(2, 2, 1, &[10, 20, 250, 40]).unwrap();
//! let bias: Vector<u8> = Vector::from_slice(2, 1, &[10, 10]).unwrap();
//! let mut biased: Matrix<u8> = Matrix::with_shape(2, 2, 1).unwrap();
//! cpu_add_broadcast(&image, &bias, &mut biased).unwrap();
//! assert_eq!(biased.as_slice(), &[20, 30, 255, 50]);
//!
//! let mut scaled: Matrix<f32> = Matrix::with_shape(2, 2, 1).unwrap();
//! cpu_convert_scale(&biased, 0.5, &mut scaled).unwrap();
//! assert_eq!(scaled[(1, 0)], [127.5]);
//! ```

mod config;
mod dispatcher;
mod error;
pub mod ops;
mod sliding;

pub use config::DispatchConfig;
pub use dispatcher::Dispatcher;
pub use error::ConfigError;
pub use ops::convert::{cpu_convert, cpu_convert_float, cpu_convert_scale};
pub use ops::elementwise::{
    cpu_add, cpu_add_assign, cpu_add_broadcast, cpu_add_broadcast_assign, cpu_add_value,
    cpu_add_value_assign, cpu_and, cpu_and_assign, cpu_and_broadcast, cpu_and_broadcast_assign,
    cpu_and_value, cpu_and_value_assign, cpu_not, cpu_not_assign, cpu_or, cpu_or_assign,
    cpu_or_broadcast, cpu_or_broadcast_assign, cpu_or_value, cpu_or_value_assign, cpu_sub,
    cpu_sub_assign, cpu_sub_broadcast, cpu_sub_broadcast_assign, cpu_sub_value,
    cpu_sub_value_assign, cpu_xor, cpu_xor_assign, cpu_xor_broadcast, cpu_xor_broadcast_assign,
    cpu_xor_value, cpu_xor_value_assign,
};
pub use ops::reduce::{cpu_column_sums, cpu_row_sums};
pub use ops::transpose::{cpu_transpose, cpu_transpose_tensor};
pub use sliding::{cpu_sliding_window, SlidingWindow};
