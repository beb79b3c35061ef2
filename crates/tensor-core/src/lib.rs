// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # tensor-core
//!
//! Dense, row-major containers of "pixels" for the lanewise kernels.
//!
//! This crate provides:
//! - [`Scalar`], [`Vector`], [`Matrix`] and [`Tensor`]: ranks 0 to 3, each
//!   pixel holding `dimension` channels.
//! - [`Element`] / [`Numeric`]: the element types containers may hold and
//!   the subset the arithmetic kernels support.
//! - [`Shape`]: runtime extents, channel count last.
//! - [`Dense`]: the shape-generic view the dispatch layer works through.
//! - [`TensorError`]: every failure, tagged with the failing operation.
//!
//! # Ownership
//!
//! A container either owns its buffer (obtained from its
//! [`memory_manager::Allocator`] and released exactly once on `clear` or
//! drop) or is a view aliasing a buffer owned elsewhere. Views borrow their
//! source through the container lifetime `'a`, so they cannot outlive it:
//!
//! ```text
//!   Matrix<'static, u8>  (owner) ──row_mut(2)──▶  Vector<'_, u8>  (view)
//!           ▲                                          │
//!           └──────────── writes land here ◀───────────┘
//! ```
//!
//! Read-only views come wrapped in [`ReadOnly`].
//!
//! # Example
//! ```
//! use tensor_core::{Matrix, Vector};
//!
//! let mut m: Matrix<'_, i32> = Matrix::with_shape(2, 3, 1).unwrap();
//! let v: Vector<'_, i32> = Vector::from_slice(3, 1, &[1, 2, 3]).unwrap();
//! m.fill_vector(&v).unwrap();
//! assert_eq!(&m[1], &[1, 2, 3]);
//! ```

mod check;
mod dense;
mod element;
mod error;
mod macros;
mod matrix;
mod scalar;
mod shape;
mod storage;
mod tensor;
mod vector;

pub use dense::{Dense, ReadOnly};
pub use element::{Element, ElementType, Numeric};
pub use error::TensorError;
pub use matrix::Matrix;
pub use memory_manager::{Allocator, HeapAllocator};
pub use scalar::Scalar;
pub use shape::Shape;
pub use storage::CopyMode;
pub use tensor::Tensor;
pub use vector::Vector;
