// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! The buffer behind every container.
//!
//! A [`Storage`] is either an **owner**, holding a block obtained from its
//! allocator and releasing it exactly once, or a **view**, aliasing a
//! block owned elsewhere and never releasing it. The lifetime `'a` ties a
//! view to the borrow it was created from; owners may use any lifetime.

use crate::{Element, TensorError};
use memory_manager::Allocator;
use std::marker::PhantomData;
use std::ptr::NonNull;

/// How `assign_from` initialises a container from another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyMode {
    /// Allocate a buffer of the same shape; contents are unspecified.
    WithoutCopy,
    /// Alias the source buffer (the result is a view).
    ShallowCopy,
    /// Allocate a buffer and copy the source into it.
    DeepCopy,
}

pub(crate) struct Storage<'a, T, A: Allocator> {
    ptr: NonNull<T>,
    len: usize,
    owner: bool,
    alloc: A,
    _marker: PhantomData<&'a mut [T]>,
}

// SAFETY: a Storage is either the unique owner of its block or a view
// created from a borrow that grants the same access; sending or sharing
// it is as safe as sending or sharing `&mut [T]` plus the allocator.
unsafe impl<'a, T: Send, A: Allocator + Send> Send for Storage<'a, T, A> {}
unsafe impl<'a, T: Sync, A: Allocator + Sync> Sync for Storage<'a, T, A> {}

impl<'a, T: Element, A: Allocator> Storage<'a, T, A> {
    pub(crate) fn empty(alloc: A) -> Self {
        Self {
            ptr: NonNull::dangling(),
            len: 0,
            owner: false,
            alloc,
            _marker: PhantomData,
        }
    }

    /// Allocates `len` elements initialised by `init(index)`.
    pub(crate) fn with_fn(
        alloc: A,
        len: usize,
        mut init: impl FnMut(usize) -> T,
    ) -> Result<Self, TensorError> {
        let ptr = alloc.allocate_array::<T>(len)?;
        for i in 0..len {
            // SAFETY: `ptr` holds `len` uninitialised slots.
            unsafe { ptr.as_ptr().add(i).write(init(i)) };
        }
        Ok(Self {
            ptr,
            len,
            owner: true,
            alloc,
            _marker: PhantomData,
        })
    }

    /// Allocates `len` elements taken from `iter`, which must yield exactly
    /// `len` items.
    pub(crate) fn from_iter_exact(
        alloc: A,
        len: usize,
        iter: impl IntoIterator<Item = T>,
        op: &'static str,
    ) -> Result<Self, TensorError> {
        let mut storage = Self::with_fn(alloc, len, |_| T::default())?;
        let mut written = 0;
        for value in iter {
            if written == len {
                return Err(TensorError::size_mismatch(op, len, written + 1));
            }
            storage.as_mut_slice()[written] = value;
            written += 1;
        }
        if written != len {
            return Err(TensorError::size_mismatch(op, len, written));
        }
        Ok(storage)
    }

    /// Creates a view over `len` elements starting at `ptr`.
    ///
    /// # Safety
    /// The elements must stay valid, and not be accessed through any other
    /// path that conflicts with this view, for the lifetime `'a`.
    pub(crate) unsafe fn view(ptr: NonNull<T>, len: usize, alloc: A) -> Self {
        Self {
            ptr,
            len,
            owner: false,
            alloc,
            _marker: PhantomData,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub(crate) fn is_owner(&self) -> bool {
        self.owner
    }

    pub(crate) fn allocator(&self) -> &A {
        &self.alloc
    }

    pub(crate) fn as_slice(&self) -> &[T] {
        // SAFETY: `ptr` is dangling-but-aligned when `len == 0`, else valid
        // for `len` initialised elements.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [T] {
        // SAFETY: as above; `&mut self` guarantees unique access.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }

    /// Pointer to element `offset`, for building read-only sub-views.
    pub(crate) fn ptr_at(&self, offset: usize) -> NonNull<T> {
        NonNull::from(&self.as_slice()[offset..]).cast()
    }

    /// Pointer to element `offset`, for building mutable sub-views.
    pub(crate) fn ptr_at_mut(&mut self, offset: usize) -> NonNull<T> {
        NonNull::from(&mut self.as_mut_slice()[offset..]).cast()
    }

    /// Replaces the contents with `len` elements from `init`, reusing the
    /// current buffer when the element count is unchanged.
    pub(crate) fn refill(
        &mut self,
        len: usize,
        mut init: impl FnMut(usize) -> T,
    ) -> Result<(), TensorError> {
        if len == self.len && len > 0 {
            for (i, slot) in self.as_mut_slice().iter_mut().enumerate() {
                *slot = init(i);
            }
            return Ok(());
        }
        let fresh = Self::with_fn(self.alloc.clone(), len, init)?;
        self.replace(fresh);
        Ok(())
    }

    /// Releases the current buffer (if owned) and takes over `other`.
    pub(crate) fn replace(&mut self, other: Storage<'a, T, A>) {
        self.release();
        *self = other;
    }

    /// Allocates an owning copy of the contents.
    pub(crate) fn try_clone<'b>(&self) -> Result<Storage<'b, T, A>, TensorError> {
        let src = self.as_slice();
        Storage::with_fn(self.alloc.clone(), src.len(), |i| src[i])
    }

    /// Releases the buffer if owned and leaves the storage empty.
    /// Calling it on an empty storage is a no-op.
    pub(crate) fn release(&mut self) {
        if self.owner && self.len > 0 {
            // SAFETY: owners hold a block from `allocate_array::<T>(len)`.
            unsafe { self.alloc.deallocate_array(self.ptr, self.len) };
        }
        self.ptr = NonNull::dangling();
        self.len = 0;
        self.owner = false;
    }
}

impl<'a, T, A: Allocator> Drop for Storage<'a, T, A> {
    fn drop(&mut self) {
        if self.owner && self.len > 0 {
            // SAFETY: see `release`.
            unsafe { self.alloc.deallocate_array(self.ptr, self.len) };
        }
    }
}
