// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # simd-kernels
//!
//! Elementwise kernels in one portable and several SSE/AVX variants.
//!
//! Each operation and element type has a [`KernelTable`]: the portable
//! variant plus the accelerated ones compiled for this target, tagged with
//! the [`SimdTier`](cpu_features::SimdTier) they need. Tables are reached
//! through per-family traits implemented on the element types:
//!
//! | Trait | Operations |
//! |-------|------------|
//! | [`ArithKernels`] | saturating add/sub, constant-operand forms |
//! | [`BitwiseKernels`] | and/or/xor/not, constant-operand forms |
//! | [`WidenKernels`] | exact integer widening |
//! | [`ScaleKernels`] | conversion to `f32`/`f64` times a scale |
//! | [`ReduceKernels`] | row and column sums into `f32` |
//! | [`TransposeKernels`] | transpose by pixel word |
//! | [`SlidingKernels`] | offset-add for sliding-window indices |
//!
//! Every accelerated variant produces the same bits as the portable one;
//! the tests in each module check this on the running processor.
//!
//! ```
//! use cpu_features::capabilities;
//! use simd_kernels::ArithKernels;
//!
//! let a = [250u8, 10, 20];
//! let b = [10u8, 10, 10];
//! let mut c = [0u8; 3];
//! let (_tier, add) = u8::add_kernels().select(capabilities());
//! unsafe { add(3, a.as_ptr(), b.as_ptr(), c.as_mut_ptr()) };
//! assert_eq!(c, [255, 20, 30]);
//! ```
//!
//! The kernels are `unsafe fn`s over raw pointers; `cpu-dispatch` wraps
//! them in checked operations on the `tensor-core` containers.

pub mod arith;
pub mod bitwise;
pub mod broadcast;
pub mod convert;
pub mod lanes;
pub mod reduce;
pub mod sliding;
pub mod table;
pub mod transpose;

#[cfg(target_arch = "x86_64")]
mod x86;

pub use arith::ArithKernels;
pub use bitwise::BitwiseKernels;
pub use broadcast::broadcast_rows;
pub use convert::{ScaleKernels, WidenKernels};
pub use lanes::{FloatLane, Saturating, ToFloat};
pub use reduce::ReduceKernels;
pub use sliding::SlidingKernels;
pub use table::{
    BinaryFn, ConvertFn, KernelTable, OffsetFn, ScaleFn, SumFn, TransposeFn, UnaryFn, ValueFn,
};
pub use transpose::{transpose_pixels, TransposeKernels};
