// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Rank-3 container: `batch` planes, each a `rows × columns × dimension`
//! matrix.
//!
//! Element `(b, r, c, ch)` lives at flat offset
//! `b * matrix_size + r * row_size + c * dimension + ch`.

use crate::check;
use crate::macros::{dense_assign, dense_common};
use crate::storage::{CopyMode, Storage};
use crate::{Dense, Element, Matrix, ReadOnly, Scalar, Shape, TensorError, Vector};
use memory_manager::{Allocator, HeapAllocator};
use std::ops::{Index, IndexMut};
use std::slice::{ChunksExact, ChunksExactMut};

/// A batch of equally shaped matrices stored back to back.
pub struct Tensor<'a, T, A: Allocator = HeapAllocator> {
    storage: Storage<'a, T, A>,
    batch: usize,
    rows: usize,
    columns: usize,
    dimension: usize,
}

dense_common!(Tensor, rank = 3, fields = [batch, rows, columns, dimension]);

dense_assign!(Tensor, fields = [batch, rows, columns, dimension]);

impl<'a, T: Element, A: Allocator> Tensor<'a, T, A> {
    pub fn batch(&self) -> usize {
        self.batch
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    pub fn row_size(&self) -> usize {
        self.columns * self.dimension
    }

    /// Elements per plane: `rows * row_size`.
    pub fn matrix_size(&self) -> usize {
        self.rows * self.row_size()
    }

    pub fn shape(&self) -> Shape {
        Shape::tensor(self.batch, self.rows, self.columns, self.dimension)
    }

    pub fn unit_size(&self, rank: usize) -> Option<usize> {
        match rank {
            0 => Some(self.dimension),
            1 => Some(self.row_size()),
            2 => Some(self.matrix_size()),
            3 => Some(self.size()),
            _ => None,
        }
    }

    fn pixel_offset(&self, plane: usize, row: usize, column: usize) -> usize {
        plane * self.matrix_size() + row * self.row_size() + column * self.dimension
    }

    /// Checked access to the elements of plane `plane`.
    pub fn plane_slice(&self, plane: usize) -> Result<&[T], TensorError> {
        const OP: &str = "Tensor::plane_slice";
        check::check_index(OP, plane, self.batch)?;
        Ok(&self[plane])
    }

    pub fn plane_slice_mut(&mut self, plane: usize) -> Result<&mut [T], TensorError> {
        const OP: &str = "Tensor::plane_slice_mut";
        check::check_index(OP, plane, self.batch)?;
        Ok(&mut self[plane])
    }

    /// Checked pixel access.
    pub fn at(&self, plane: usize, row: usize, column: usize) -> Result<&[T], TensorError> {
        const OP: &str = "Tensor::at";
        check::ensure_initialized(OP, self.size())?;
        check::check_index(OP, plane, self.batch)?;
        check::check_index(OP, row, self.rows)?;
        check::check_index(OP, column, self.columns)?;
        Ok(&self[(plane, row, column)])
    }

    pub fn at_mut(&mut self, plane: usize, row: usize, column: usize) -> Result<&mut [T], TensorError> {
        const OP: &str = "Tensor::at_mut";
        check::ensure_initialized(OP, self.size())?;
        check::check_index(OP, plane, self.batch)?;
        check::check_index(OP, row, self.rows)?;
        check::check_index(OP, column, self.columns)?;
        Ok(&mut self[(plane, row, column)])
    }

    /// Checked element access.
    pub fn get(&self, plane: usize, row: usize, column: usize, channel: usize) -> Result<&T, TensorError> {
        const OP: &str = "Tensor::get";
        check::ensure_initialized(OP, self.size())?;
        check::check_index(OP, channel, self.dimension)?;
        Ok(&self.at(plane, row, column)?[channel])
    }

    /// Read-only view of plane `plane`.
    pub fn plane(&self, plane: usize) -> Result<ReadOnly<Matrix<'_, T, A>>, TensorError> {
        const OP: &str = "Tensor::plane";
        check::check_index(OP, plane, self.batch)?;
        let ptr = self.storage.ptr_at(plane * self.matrix_size());
        // SAFETY: shared borrow of `self`; `ReadOnly` never hands out
        // mutable access.
        let storage = unsafe { Storage::view(ptr, self.matrix_size(), self.allocator().clone()) };
        Ok(ReadOnly::new(Matrix::from_parts(
            storage,
            self.rows,
            self.columns,
            self.dimension,
        )))
    }

    /// Mutable view of plane `plane`; writes go to this tensor's buffer.
    pub fn plane_mut(&mut self, plane: usize) -> Result<Matrix<'_, T, A>, TensorError> {
        const OP: &str = "Tensor::plane_mut";
        check::check_index(OP, plane, self.batch)?;
        let (rows, columns, dimension) = (self.rows, self.columns, self.dimension);
        let matrix_size = self.matrix_size();
        let ptr = self.storage.ptr_at_mut(plane * matrix_size);
        // SAFETY: the view borrows `self` mutably for its whole lifetime.
        let storage = unsafe { Storage::view(ptr, matrix_size, self.allocator().clone()) };
        Ok(Matrix::from_parts(storage, rows, columns, dimension))
    }

    /// Iterates over pixels.
    pub fn iter(&self) -> ChunksExact<'_, T> {
        self.as_slice().chunks_exact(self.dimension.max(1))
    }

    pub fn iter_mut(&mut self) -> ChunksExactMut<'_, T> {
        let dim = self.dimension.max(1);
        self.as_mut_slice().chunks_exact_mut(dim)
    }

    /// Iterates over rows of every plane in turn.
    pub fn rows_iter(&self) -> ChunksExact<'_, T> {
        self.as_slice().chunks_exact(self.row_size().max(1))
    }

    pub fn rows_iter_mut(&mut self) -> ChunksExactMut<'_, T> {
        let row_size = self.row_size().max(1);
        self.as_mut_slice().chunks_exact_mut(row_size)
    }

    /// Iterates over planes.
    pub fn planes_iter(&self) -> ChunksExact<'_, T> {
        self.as_slice().chunks_exact(self.matrix_size().max(1))
    }

    pub fn planes_iter_mut(&mut self) -> ChunksExactMut<'_, T> {
        let matrix_size = self.matrix_size().max(1);
        self.as_mut_slice().chunks_exact_mut(matrix_size)
    }

    /// Copies `scalar` into every pixel.
    pub fn fill_scalar<B: Allocator>(&mut self, scalar: &Scalar<'_, T, B>) -> Result<(), TensorError> {
        const OP: &str = "Tensor::fill_scalar";
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

    /// Copies `vector` into every row of every plane.
    pub fn fill_vector<B: Allocator>(&mut self, vector: &Vector<'_, T, B>) -> Result<(), TensorError> {
        const OP: &str = "Tensor::fill_vector";
        check::ensure_initialized(OP, self.size())?;
        check::ensure_initialized(OP, vector.size())?;
        check::ensure_len(OP, self.row_size(), vector.size())?;
        let src = vector.as_slice();
        for row in self.rows_iter_mut() {
            row.copy_from_slice(src);
        }
        Ok(())
    }

    /// Copies `matrix` into every plane.
    pub fn fill_matrix<B: Allocator>(&mut self, matrix: &Matrix<'_, T, B>) -> Result<(), TensorError> {
        const OP: &str = "Tensor::fill_matrix";
        check::ensure_initialized(OP, self.size())?;
        check::ensure_initialized(OP, matrix.size())?;
        check::ensure_len(OP, self.matrix_size(), matrix.size())?;
        let src = matrix.as_slice();
        for plane in self.planes_iter_mut() {
            plane.copy_from_slice(src);
        }
        Ok(())
    }
}

impl<'a, T: Element, A: Allocator> Index<usize> for Tensor<'a, T, A> {
    type Output = [T];

    /// Plane `plane`.
    fn index(&self, plane: usize) -> &[T] {
        let size = self.matrix_size();
        &self.as_slice()[plane * size..(plane + 1) * size]
    }
}

impl<'a, T: Element, A: Allocator> IndexMut<usize> for Tensor<'a, T, A> {
    fn index_mut(&mut self, plane: usize) -> &mut [T] {
        let size = self.matrix_size();
        &mut self.as_mut_slice()[plane * size..(plane + 1) * size]
    }
}

impl<'a, T: Element, A: Allocator> Index<(usize, usize, usize)> for Tensor<'a, T, A> {
    type Output = [T];

    /// Pixel `(plane, row, column)`.
    fn index(&self, (plane, row, column): (usize, usize, usize)) -> &[T] {
        debug_assert!(row < self.rows && column < self.columns);
        let start = self.pixel_offset(plane, row, column);
        &self.as_slice()[start..start + self.dimension]
    }
}

impl<'a, T: Element, A: Allocator> IndexMut<(usize, usize, usize)> for Tensor<'a, T, A> {
    fn index_mut(&mut self, (plane, row, column): (usize, usize, usize)) -> &mut [T] {
        debug_assert!(row < self.rows && column < self.columns);
        let start = self.pixel_offset(plane, row, column);
        let dim = self.dimension;
        &mut self.as_mut_slice()[start..start + dim]
    }
}

impl<'a, T: Element, A: Allocator> Index<(usize, usize, usize, usize)> for Tensor<'a, T, A> {
    type Output = T;

    fn index(&self, (plane, row, column, channel): (usize, usize, usize, usize)) -> &T {
        debug_assert!(channel < self.dimension);
        &self.as_slice()[self.pixel_offset(plane, row, column) + channel]
    }
}

impl<'a, T: Element, A: Allocator> IndexMut<(usize, usize, usize, usize)> for Tensor<'a, T, A> {
    fn index_mut(&mut self, (plane, row, column, channel): (usize, usize, usize, usize)) -> &mut T {
        debug_assert!(channel < self.dimension);
        let offset = self.pixel_offset(plane, row, column) + channel;
        &mut self.as_mut_slice()[offset]
    }
}
