// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for container and dispatch operations.
//!
//! Every variant carries the name of the operation that failed. A failed
//! call never leaves its destination partially modified.

use crate::Shape;
use memory_manager::MemoryError;

/// Errors raised by containers and by the `cpu_*` operations.
#[derive(Debug, thiserror::Error)]
pub enum TensorError {
    /// An operand expected to hold data is empty.
    #[error("{op}: container is not initialized")]
    NotInitialized { op: &'static str },

    /// `assign` was called on a non-empty container.
    #[error("{op}: container is already initialized (use reassign)")]
    AlreadyInitialized { op: &'static str },

    /// Element counts disagree, or a shape has a zero extent.
    #[error("{op}: invalid size: {detail}")]
    InvalidSize { op: &'static str, detail: String },

    /// Broadcast operands disagree on the broadcast unit, or ranks differ.
    #[error("{op}: incompatible shapes {lhs} and {rhs}")]
    InvalidShape {
        op: &'static str,
        lhs: Shape,
        rhs: Shape,
    },

    /// A channel count is zero, or a channel-broadcast source does not
    /// match the pixel dimension.
    #[error("{op}: invalid dimension: expected {expected}, got {actual}")]
    InvalidDimension {
        op: &'static str,
        expected: usize,
        actual: usize,
    },

    /// A sliding window does not fit its source.
    #[error("{op}: window {window_h}x{window_w} does not fit a {rows}x{columns} source")]
    InvalidWindowSize {
        op: &'static str,
        window_h: usize,
        window_w: usize,
        rows: usize,
        columns: usize,
    },

    /// A sliding stride is zero.
    #[error("{op}: sliding strides must be at least 1, got {stride_h}x{stride_w}")]
    InvalidSlidingStride {
        op: &'static str,
        stride_h: usize,
        stride_w: usize,
    },

    /// A shallow copy was requested from an immutable source.
    #[error("{op}: shallow copy requires a mutable source")]
    InvalidCopyMode { op: &'static str },

    /// A checked access was outside the container.
    #[error("{op}: index {index} out of range for extent {extent}")]
    OutOfRange {
        op: &'static str,
        index: usize,
        extent: usize,
    },

    /// The allocator could not provide a buffer.
    #[error("allocation failed: {0}")]
    Alloc(#[from] MemoryError),
}

impl TensorError {
    /// Two element counts that should have been equal.
    pub fn size_mismatch(op: &'static str, expected: usize, actual: usize) -> Self {
        TensorError::InvalidSize {
            op,
            detail: format!("expected {expected} elements, got {actual}"),
        }
    }

    /// A requested shape with a zero extent.
    pub fn zero_extent(op: &'static str, extents: &[usize]) -> Self {
        TensorError::InvalidSize {
            op,
            detail: format!("every extent must be non-zero, got {}", Shape::from(extents)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_name_the_operation() {
        let e = TensorError::size_mismatch("cpu_add", 12, 10);
        assert_eq!(
            e.to_string(),
            "cpu_add: invalid size: expected 12 elements, got 10"
        );

        let e = TensorError::zero_extent("Matrix::assign", &[3, 0, 1]);
        assert!(e.to_string().contains("[3, 0, 1]"));

        let e = TensorError::InvalidShape {
            op: "cpu_add_broadcast",
            lhs: Shape::matrix(3, 4, 1),
            rhs: Shape::vector(3, 1),
        };
        assert_eq!(
            e.to_string(),
            "cpu_add_broadcast: incompatible shapes [3, 4, 1] and [3, 1]"
        );
    }

    #[test]
    fn test_from_memory_error() {
        let e: TensorError = MemoryError::ZeroSizedAllocation.into();
        assert!(matches!(e, TensorError::Alloc(MemoryError::ZeroSizedAllocation)));
    }
}
