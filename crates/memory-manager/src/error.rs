// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Error types for memory management.

/// Errors that can occur during buffer allocation.
#[derive(Debug, thiserror::Error)]
pub enum MemoryError {
    /// The requested allocation would exceed the pool's memory budget.
    #[error("out of memory: requested {requested_bytes} bytes, but only {available_bytes} available (budget: {budget_bytes})")]
    OutOfMemory {
        requested_bytes: usize,
        available_bytes: usize,
        budget_bytes: usize,
    },

    /// The system allocator returned a null pointer.
    #[error("system allocator failed to provide {size} bytes aligned to {align}")]
    AllocationFailed { size: usize, align: usize },

    /// Attempted to allocate a zero-sized buffer.
    #[error("cannot allocate zero-sized buffer")]
    ZeroSizedAllocation,

    /// `count * size_of::<T>()` does not fit in a valid layout.
    #[error("layout overflow: {count} elements of {elem_size} bytes")]
    LayoutOverflow { count: usize, elem_size: usize },

    /// The requested alignment exceeds what the allocator can honour.
    #[error("unsupported alignment {align} (maximum {max})")]
    UnsupportedAlignment { align: usize, max: usize },

    /// A budget string could not be parsed.
    #[error("invalid budget: {0}")]
    InvalidBudget(String),
}
