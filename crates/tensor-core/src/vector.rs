// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Rank-1 container: `length` pixels of `dimension` channels.

use crate::check;
use crate::macros::{dense_assign, dense_common};
use crate::storage::{CopyMode, Storage};
use crate::{Dense, Element, ReadOnly, Scalar, Shape, TensorError};
use memory_manager::{Allocator, HeapAllocator};
use std::ops::{Index, IndexMut};
use std::slice::{ChunksExact, ChunksExactMut};

/// A row of `length` pixels, each of `dimension` channels.
///
/// Element `(i, c)` lives at flat offset `i * dimension + c`.
pub struct Vector<'a, T, A: Allocator = HeapAllocator> {
    storage: Storage<'a, T, A>,
    length: usize,
    dimension: usize,
}

dense_common!(Vector, rank = 1, fields = [length, dimension]);

dense_assign!(Vector, fields = [length, dimension]);

impl<'a, T: Element, A: Allocator> Vector<'a, T, A> {
    /// Number of pixels.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Channels per pixel.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn shape(&self) -> Shape {
        Shape::vector(self.length, self.dimension)
    }

    pub fn unit_size(&self, rank: usize) -> Option<usize> {
        match rank {
            0 => Some(self.dimension),
            1 => Some(self.size()),
            _ => None,
        }
    }

    /// Checked pixel access.
    pub fn at(&self, index: usize) -> Result<&[T], TensorError> {
        const OP: &str = "Vector::at";
        check::ensure_initialized(OP, self.size())?;
        check::check_index(OP, index, self.length)?;
        let start = index * self.dimension;
        Ok(&self.as_slice()[start..start + self.dimension])
    }

    pub fn at_mut(&mut self, index: usize) -> Result<&mut [T], TensorError> {
        const OP: &str = "Vector::at_mut";
        check::ensure_initialized(OP, self.size())?;
        check::check_index(OP, index, self.length)?;
        let start = index * self.dimension;
        let dim = self.dimension;
        Ok(&mut self.as_mut_slice()[start..start + dim])
    }

    /// Checked element access.
    pub fn at_element(&self, index: usize, channel: usize) -> Result<&T, TensorError> {
        const OP: &str = "Vector::at_element";
        check::ensure_initialized(OP, self.size())?;
        check::check_index(OP, channel, self.dimension)?;
        Ok(&self.at(index)?[channel])
    }

    pub fn at_element_mut(&mut self, index: usize, channel: usize) -> Result<&mut T, TensorError> {
        const OP: &str = "Vector::at_element_mut";
        check::ensure_initialized(OP, self.size())?;
        check::check_index(OP, channel, self.dimension)?;
        Ok(&mut self.at_mut(index)?[channel])
    }

    /// Read-only view of pixel `index`.
    pub fn pixel(&self, index: usize) -> Result<ReadOnly<Scalar<'_, T, A>>, TensorError> {
        const OP: &str = "Vector::pixel";
        check::check_index(OP, index, self.length)?;
        let ptr = self.storage.ptr_at(index * self.dimension);
        // SAFETY: the view borrows `self` shared and `ReadOnly` never hands
        // out mutable access.
        let storage = unsafe { Storage::view(ptr, self.dimension, self.allocator().clone()) };
        Ok(ReadOnly::new(Scalar::from_parts(storage, self.dimension)))
    }

    /// Mutable view of pixel `index`; writes go to this vector's buffer.
    pub fn pixel_mut(&mut self, index: usize) -> Result<Scalar<'_, T, A>, TensorError> {
        const OP: &str = "Vector::pixel_mut";
        check::check_index(OP, index, self.length)?;
        let dim = self.dimension;
        let ptr = self.storage.ptr_at_mut(index * dim);
        // SAFETY: the view borrows `self` mutably for its whole lifetime.
        let storage = unsafe { Storage::view(ptr, dim, self.allocator().clone()) };
        Ok(Scalar::from_parts(storage, dim))
    }

    /// Iterates over pixels.
    pub fn iter(&self) -> ChunksExact<'_, T> {
        self.as_slice().chunks_exact(self.dimension.max(1))
    }

    pub fn iter_mut(&mut self) -> ChunksExactMut<'_, T> {
        let dim = self.dimension.max(1);
        self.as_mut_slice().chunks_exact_mut(dim)
    }

    /// Copies `scalar` into every pixel.
    ///
    /// # Errors
    /// [`TensorError::InvalidDimension`] if `scalar.size()` differs from
    /// the pixel dimension.
    pub fn fill_scalar<B: Allocator>(&mut self, scalar: &Scalar<'_, T, B>) -> Result<(), TensorError> {
        const OP: &str = "Vector::fill_scalar";
        check::ensure_initialized(OP, self.size())?;
        check::ensure_initialized(OP, scalar.size())?;
        if scalar.size() != self.dimension {
            return Err(TensorError::InvalidDimension {
                op: OP,
                expected: self.dimension,
                actual: scalar.size(),
            });
        }
        let src = scalar.as_slice();
        for pixel in self.iter_mut() {
            pixel.copy_from_slice(src);
        }
        Ok(())
    }
}

impl<'a, T: Element, A: Allocator> Index<usize> for Vector<'a, T, A> {
    type Output = [T];

    fn index(&self, index: usize) -> &[T] {
        let start = index * self.dimension;
        &self.as_slice()[start..start + self.dimension]
    }
}

impl<'a, T: Element, A: Allocator> IndexMut<usize> for Vector<'a, T, A> {
    fn index_mut(&mut self, index: usize) -> &mut [T] {
        let start = index * self.dimension;
        let dim = self.dimension;
        &mut self.as_mut_slice()[start..start + dim]
    }
}

impl<'a, T: Element, A: Allocator> Index<(usize, usize)> for Vector<'a, T, A> {
    type Output = T;

    fn index(&self, (index, channel): (usize, usize)) -> &T {
        debug_assert!(channel < self.dimension);
        &self.as_slice()[index * self.dimension + channel]
    }
}

impl<'a, T: Element, A: Allocator> IndexMut<(usize, usize)> for Vector<'a, T, A> {
    fn index_mut(&mut self, (index, channel): (usize, usize)) -> &mut T {
        debug_assert!(channel < self.dimension);
        let dim = self.dimension;
        &mut self.as_mut_slice()[index * dim + channel]
    }
}
