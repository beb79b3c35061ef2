// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Rank-2 container: `rows × columns` pixels of `dimension` channels.
//!
//! ```text
//!   row 0: [p(0,0) c0..cD][p(0,1) c0..cD] ... [p(0,C-1) ...]   <- row_size
//!   row 1: [p(1,0) ...   ]                                       elements
//!   ...
//! ```
//!
//! Element `(r, c, ch)` lives at flat offset
//! `r * row_size + c * dimension + ch`.

use crate::check;
use crate::macros::{dense_assign, dense_common};
use crate::storage::{CopyMode, Storage};
use crate::{Dense, Element, ReadOnly, Scalar, Shape, TensorError, Vector};
use memory_manager::{Allocator, HeapAllocator};
use std::ops::{Index, IndexMut};
use std::slice::{ChunksExact, ChunksExactMut};

/// A row-major image-like matrix.
pub struct Matrix<'a, T, A: Allocator = HeapAllocator> {
    storage: Storage<'a, T, A>,
    rows: usize,
    columns: usize,
    dimension: usize,
}

dense_common!(Matrix, rank = 2, fields = [rows, columns, dimension]);

dense_assign!(Matrix, fields = [rows, columns, dimension]);

impl<'a, T: Element, A: Allocator> Matrix<'a, T, A> {
    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }

    /// Channels per pixel.
    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Elements per row: `columns * dimension`.
    pub fn row_size(&self) -> usize {
        self.columns * self.dimension
    }

    pub fn shape(&self) -> Shape {
        Shape::matrix(self.rows, self.columns, self.dimension)
    }

    pub fn unit_size(&self, rank: usize) -> Option<usize> {
        match rank {
            0 => Some(self.dimension),
            1 => Some(self.row_size()),
            2 => Some(self.size()),
            _ => None,
        }
    }

    fn pixel_offset(&self, row: usize, column: usize) -> usize {
        row * self.row_size() + column * self.dimension
    }

    /// Checked access to the elements of row `row`.
    pub fn row_slice(&self, row: usize) -> Result<&[T], TensorError> {
        const OP: &str = "Matrix::row_slice";
        check::check_index(OP, row, self.rows)?;
        Ok(&self[row])
    }

    pub fn row_slice_mut(&mut self, row: usize) -> Result<&mut [T], TensorError> {
        const OP: &str = "Matrix::row_slice_mut";
        check::check_index(OP, row, self.rows)?;
        Ok(&mut self[row])
    }

    /// Checked pixel access.
    pub fn at(&self, row: usize, column: usize) -> Result<&[T], TensorError> {
        const OP: &str = "Matrix::at";
        check::ensure_initialized(OP, self.size())?;
        check::check_index(OP, row, self.rows)?;
        check::check_index(OP, column, self.columns)?;
        Ok(&self[(row, column)])
    }

    pub fn at_mut(&mut self, row: usize, column: usize) -> Result<&mut [T], TensorError> {
        const OP: &str = "Matrix::at_mut";
        check::ensure_initialized(OP, self.size())?;
        check::check_index(OP, row, self.rows)?;
        check::check_index(OP, column, self.columns)?;
        Ok(&mut self[(row, column)])
    }

    /// Checked element access.
    pub fn get(&self, row: usize, column: usize, channel: usize) -> Result<&T, TensorError> {
        const OP: &str = "Matrix::get";
        check::ensure_initialized(OP, self.size())?;
        check::check_index(OP, channel, self.dimension)?;
        Ok(&self.at(row, column)?[channel])
    }

    pub fn get_mut(&mut self, row: usize, column: usize, channel: usize) -> Result<&mut T, TensorError> {
        const OP: &str = "Matrix::get_mut";
        check::ensure_initialized(OP, self.size())?;
        check::check_index(OP, channel, self.dimension)?;
        Ok(&mut self.at_mut(row, column)?[channel])
    }

    /// Read-only view of row `row`.
    pub fn row(&self, row: usize) -> Result<ReadOnly<Vector<'_, T, A>>, TensorError> {
        const OP: &str = "Matrix::row";
        check::check_index(OP, row, self.rows)?;
        let ptr = self.storage.ptr_at(row * self.row_size());
        // SAFETY: shared borrow of `self`; `ReadOnly` never hands out
        // mutable access.
        let storage = unsafe { Storage::view(ptr, self.row_size(), self.allocator().clone()) };
        Ok(ReadOnly::new(Vector::from_parts(storage, self.columns, self.dimension)))
    }

    /// Mutable view of row `row`; writes go to this matrix's buffer.
    pub fn row_mut(&mut self, row: usize) -> Result<Vector<'_, T, A>, TensorError> {
        const OP: &str = "Matrix::row_mut";
        check::check_index(OP, row, self.rows)?;
        let (columns, dimension, row_size) = (self.columns, self.dimension, self.row_size());
        let ptr = self.storage.ptr_at_mut(row * row_size);
        // SAFETY: the view borrows `self` mutably for its whole lifetime.
        let storage = unsafe { Storage::view(ptr, row_size, self.allocator().clone()) };
        Ok(Vector::from_parts(storage, columns, dimension))
    }

    /// Iterates over pixels in row-major order.
    pub fn iter(&self) -> ChunksExact<'_, T> {
        self.as_slice().chunks_exact(self.dimension.max(1))
    }

    pub fn iter_mut(&mut self) -> ChunksExactMut<'_, T> {
        let dim = self.dimension.max(1);
        self.as_mut_slice().chunks_exact_mut(dim)
    }

    /// Iterates over rows.
    pub fn rows_iter(&self) -> ChunksExact<'_, T> {
        self.as_slice().chunks_exact(self.row_size().max(1))
    }

    pub fn rows_iter_mut(&mut self) -> ChunksExactMut<'_, T> {
        let row_size = self.row_size().max(1);
        self.as_mut_slice().chunks_exact_mut(row_size)
    }

    /// Copies `scalar` into every pixel.
    ///
    /// # Errors
    /// [`TensorError::InvalidDimension`] if `scalar.size()` differs from
    /// the pixel dimension.
    pub fn fill_scalar<B: Allocator>(&mut self, scalar: &Scalar<'_, T, B>) -> Result<(), TensorError> {
        const OP: &str = "Matrix::fill_scalar";
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

    /// Copies `vector` into every row.
    ///
    /// # Errors
    /// [`TensorError::InvalidSize`] if `vector.size()` differs from
    /// `row_size`.
    pub fn fill_vector<B: Allocator>(&mut self, vector: &Vector<'_, T, B>) -> Result<(), TensorError> {
        const OP: &str = "Matrix::fill_vector";
        check::ensure_initialized(OP, self.size())?;
        check::ensure_initialized(OP, vector.size())?;
        check::ensure_len(OP, self.row_size(), vector.size())?;
        let src = vector.as_slice();
        for row in self.rows_iter_mut() {
            row.copy_from_slice(src);
        }
        Ok(())
    }
}

impl<'a, T: Element, A: Allocator> Index<usize> for Matrix<'a, T, A> {
    type Output = [T];

    /// Row `row`.
    fn index(&self, row: usize) -> &[T] {
        let row_size = self.row_size();
        &self.as_slice()[row * row_size..(row + 1) * row_size]
    }
}

impl<'a, T: Element, A: Allocator> IndexMut<usize> for Matrix<'a, T, A> {
    fn index_mut(&mut self, row: usize) -> &mut [T] {
        let row_size = self.row_size();
        &mut self.as_mut_slice()[row * row_size..(row + 1) * row_size]
    }
}

impl<'a, T: Element, A: Allocator> Index<(usize, usize)> for Matrix<'a, T, A> {
    type Output = [T];

    /// Pixel `(row, column)`.
    fn index(&self, (row, column): (usize, usize)) -> &[T] {
        debug_assert!(column < self.columns);
        let start = self.pixel_offset(row, column);
        &self.as_slice()[start..start + self.dimension]
    }
}

impl<'a, T: Element, A: Allocator> IndexMut<(usize, usize)> for Matrix<'a, T, A> {
    fn index_mut(&mut self, (row, column): (usize, usize)) -> &mut [T] {
        debug_assert!(column < self.columns);
        let start = self.pixel_offset(row, column);
        let dim = self.dimension;
        &mut self.as_mut_slice()[start..start + dim]
    }
}

impl<'a, T: Element, A: Allocator> Index<(usize, usize, usize)> for Matrix<'a, T, A> {
    type Output = T;

    fn index(&self, (row, column, channel): (usize, usize, usize)) -> &T {
        debug_assert!(column < self.columns && channel < self.dimension);
        &self.as_slice()[self.pixel_offset(row, column) + channel]
    }
}

impl<'a, T: Element, A: Allocator> IndexMut<(usize, usize, usize)> for Matrix<'a, T, A> {
    fn index_mut(&mut self, (row, column, channel): (usize, usize, usize)) -> &mut T {
        debug_assert!(column < self.columns && channel < self.dimension);
        let offset = self.pixel_offset(row, column) + channel;
        &mut self.as_mut_slice()[offset]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Tensor;
    use memory_manager::{MemoryBudget, PoolAllocator};

    fn ramp(rows: usize, columns: usize, dimension: usize) -> Matrix<'static, u32> {
        let n = (rows * columns * dimension) as u32;
        Matrix::from_slice(rows, columns, dimension, &(0..n).collect::<Vec<_>>()).unwrap()
    }

    #[test]
    fn test_layout_and_indexing() {
        let m = ramp(3, 4, 2);
        assert_eq!(m.row_size(), 8);
        assert_eq!(m.size(), 24);
        assert_eq!(&m[1], &[8, 9, 10, 11, 12, 13, 14, 15]);
        assert_eq!(&m[(2, 1)], &[18, 19]);
        assert_eq!(m[(2, 3, 1)], 23);
        assert_eq!(m.shape(), Shape::matrix(3, 4, 2));
        assert_eq!(m.unit_size(1), Some(8));
        assert_eq!(m.unit_size(3), None);
    }

    #[test]
    fn test_checked_access() {
        let mut m = ramp(2, 2, 1);
        assert_eq!(*m.get(1, 1, 0).unwrap(), 3);
        *m.get_mut(0, 1, 0).unwrap() = 42;
        assert_eq!(m.as_slice(), &[0, 42, 2, 3]);
        assert!(matches!(m.at(2, 0), Err(TensorError::OutOfRange { index: 2, .. })));
        assert!(matches!(m.at(0, 2), Err(TensorError::OutOfRange { index: 2, .. })));
        assert!(matches!(m.get(0, 0, 1), Err(TensorError::OutOfRange { .. })));
        assert!(matches!(m.row_slice(5), Err(TensorError::OutOfRange { .. })));
    }

    #[test]
    fn test_checked_access_on_empty() {
        let mut m: Matrix<'_, u8> = Matrix::new();
        assert!(matches!(m.at(0, 0), Err(TensorError::NotInitialized { op: "Matrix::at" })));
        assert!(matches!(m.at_mut(0, 0), Err(TensorError::NotInitialized { .. })));
        assert!(matches!(m.get(0, 0, 0), Err(TensorError::NotInitialized { .. })));

        let mut t: Tensor<'_, u8> = Tensor::new();
        assert!(matches!(t.at(0, 0, 0), Err(TensorError::NotInitialized { op: "Tensor::at" })));
        assert!(matches!(t.at_mut(0, 0, 0), Err(TensorError::NotInitialized { .. })));

        let v: Vector<'_, u8> = Vector::new();
        assert!(matches!(v.at(0), Err(TensorError::NotInitialized { op: "Vector::at" })));
        let s: Scalar<'_, u8> = Scalar::new();
        assert!(matches!(s.at(0), Err(TensorError::NotInitialized { op: "Scalar::at" })));
    }

    #[test]
    fn test_assign_rules() {
        let mut m: Matrix<'_, i8> = Matrix::new();
        assert!(matches!(
            m.assign_slice(2, 2, 1, &[1, 2, 3]),
            Err(TensorError::InvalidSize { .. })
        ));
        assert!(m.is_empty());
        m.assign_value(2, 3, 1, -4).unwrap();
        assert!(matches!(
            m.assign(1, 1, 1),
            Err(TensorError::AlreadyInitialized { .. })
        ));
        assert_eq!(m.as_slice(), &[-4; 6]);
    }

    #[test]
    fn test_row_views() {
        let mut m = ramp(3, 2, 1);
        {
            let r = m.row(1).unwrap();
            assert_eq!(r.length(), 2);
            assert_eq!(r.as_slice(), &[2, 3]);
        }
        {
            let mut r = m.row_mut(2).unwrap();
            r.fill(0).unwrap();
            assert!(!r.is_owner());
        }
        assert_eq!(m.as_slice(), &[0, 1, 2, 3, 0, 0]);
    }

    #[test]
    fn test_iterators_are_double_ended() {
        let m = ramp(2, 3, 1);
        let last_row = m.rows_iter().next_back().unwrap();
        assert_eq!(last_row, &[3, 4, 5]);
        assert_eq!(m.iter().rev().next().unwrap(), &[5]);
        assert_eq!(m.iter().count(), 6);
    }

    #[test]
    fn test_fill_broadcasts() {
        let mut m: Matrix<'_, u8> = Matrix::with_shape(2, 2, 3).unwrap();
        let s: Scalar<'_, u8> = Scalar::from_slice(3, &[1, 2, 3]).unwrap();
        m.fill_scalar(&s).unwrap();
        assert_eq!(m.as_slice(), &[1, 2, 3, 1, 2, 3, 1, 2, 3, 1, 2, 3]);

        let v: Vector<'_, u8> = Vector::from_slice(2, 3, &[9, 8, 7, 6, 5, 4]).unwrap();
        m.fill_vector(&v).unwrap();
        assert_eq!(&m[1], &[9, 8, 7, 6, 5, 4]);

        let short: Vector<'_, u8> = Vector::with_shape(1, 3).unwrap();
        assert!(matches!(m.fill_vector(&short), Err(TensorError::InvalidSize { .. })));

        let empty: Vector<'_, u8> = Vector::new();
        assert!(matches!(m.fill_vector(&empty), Err(TensorError::NotInitialized { .. })));
    }

    #[test]
    fn test_without_copy_allocates_same_shape() {
        let src = ramp(2, 3, 1);
        let mut dst: Matrix<'_, u32> = Matrix::new();
        dst.assign_from(&src, CopyMode::WithoutCopy).unwrap();
        assert_eq!(dst.shape(), src.shape());
        assert!(dst.is_owner());
    }

    #[test]
    fn test_take_leaves_source_empty() {
        let mut m = ramp(2, 2, 1);
        let moved = std::mem::take(&mut m);
        assert!(m.is_empty());
        assert_eq!(m.rows(), 0);
        assert_eq!(moved.size(), 4);
    }

    #[test]
    fn test_reassign_different_count_releases_old() {
        let pool = PoolAllocator::new(MemoryBudget::from_mb(1));
        let mut m: Matrix<'_, f32, _> = Matrix::with_shape_in(4, 4, 1, pool.clone()).unwrap();
        m.reassign(2, 2, 1).unwrap();
        assert_eq!(pool.stats().total_deallocations, 1);
        m.reassign_slice(1, 4, 1, &[1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(pool.stats().total_deallocations, 1);
        assert_eq!(m.columns(), 4);
        drop(m);
        assert_eq!(pool.stats().live_allocations(), 0);
    }
}
