// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The allocator interface consumed by the dense containers.
//!
//! An [`Allocator`] hands out raw, uninitialised blocks described by a
//! [`Layout`]. It is element-type agnostic: the typed helpers
//! ([`Allocator::allocate_array`], [`Allocator::deallocate_array`]) compute
//! layouts per call, so retargeting an allocator to another element type
//! ([`Allocator::rebind`]) keeps the same strategy and shared state.

use crate::MemoryError;
use std::alloc::Layout;
use std::fmt;
use std::ptr::NonNull;

/// Minimum alignment of every array allocation, in bytes.
///
/// One AVX register; keeps aligned loads possible for any element type.
pub const SIMD_ALIGNMENT: usize = 32;

/// A source of raw memory blocks for container buffers.
///
/// Implementations must be cheap to clone; clones share state, so a block
/// allocated through one clone may be released through another.
pub trait Allocator: Clone + fmt::Debug {
    /// Allocates a block satisfying `layout`.
    ///
    /// # Errors
    /// [`MemoryError::ZeroSizedAllocation`] for empty layouts, and an
    /// implementation-specific error when memory is unavailable.
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, MemoryError>;

    /// Releases a block previously returned by [`Allocator::allocate`].
    ///
    /// # Safety
    /// `ptr` must have been returned by `allocate` on this allocator (or a
    /// clone or rebind of it) with the same `layout`, and must not be
    /// released twice.
    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout);

    /// Allocates uninitialised storage for `count` values of `T`, aligned
    /// to at least [`SIMD_ALIGNMENT`].
    fn allocate_array<T>(&self, count: usize) -> Result<NonNull<T>, MemoryError> {
        let layout = array_layout::<T>(count)?;
        self.allocate(layout).map(NonNull::cast)
    }

    /// Releases storage obtained from [`Allocator::allocate_array`].
    ///
    /// # Safety
    /// Same contract as [`Allocator::deallocate`], with `count` equal to
    /// the count passed at allocation.
    unsafe fn deallocate_array<T>(&self, ptr: NonNull<T>, count: usize) {
        if let Ok(layout) = array_layout::<T>(count) {
            self.deallocate(ptr.cast(), layout);
        }
    }

    /// Returns an allocator with the same strategy and shared state, for
    /// use with another element type.
    fn rebind(&self) -> Self {
        self.clone()
    }
}

/// Computes the layout of `count` values of `T` with SIMD alignment.
///
/// # Errors
/// [`MemoryError::ZeroSizedAllocation`] if `count` or `size_of::<T>()` is
/// zero; [`MemoryError::LayoutOverflow`] if the byte size overflows.
pub fn array_layout<T>(count: usize) -> Result<Layout, MemoryError> {
    let elem_size = std::mem::size_of::<T>();
    if count == 0 || elem_size == 0 {
        return Err(MemoryError::ZeroSizedAllocation);
    }
    let overflow = || MemoryError::LayoutOverflow { count, elem_size };
    let size = elem_size.checked_mul(count).ok_or_else(overflow)?;
    let align = std::mem::align_of::<T>().max(SIMD_ALIGNMENT);
    Layout::from_size_align(size, align).map_err(|_| overflow())
}

/// The global heap, with SIMD alignment for array allocations.
///
/// Zero-sized and stateless: every instance is interchangeable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HeapAllocator;

impl Allocator for HeapAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, MemoryError> {
        if layout.size() == 0 {
            return Err(MemoryError::ZeroSizedAllocation);
        }
        // SAFETY: the layout has a non-zero size.
        let ptr = unsafe { std::alloc::alloc(layout) };
        NonNull::new(ptr).ok_or(MemoryError::AllocationFailed {
            size: layout.size(),
            align: layout.align(),
        })
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        std::alloc::dealloc(ptr.as_ptr(), layout);
    }
}
