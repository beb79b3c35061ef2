// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Rank-0 container: one pixel of `size` channels.

use crate::check;
use crate::macros::{dense_assign, dense_common};
use crate::storage::{CopyMode, Storage};
use crate::{Dense, Element, Shape, TensorError};
use memory_manager::{Allocator, HeapAllocator};
use std::ops::{Index, IndexMut};

/// A single pixel of `size` channels, stored contiguously.
///
/// Scalars broadcast over the channel axis of every larger container
/// (see `fill_scalar` on `Vector`, `Matrix` and `Tensor`).
pub struct Scalar<'a, T, A: Allocator = HeapAllocator> {
    storage: Storage<'a, T, A>,
    size: usize,
}

dense_common!(Scalar, rank = 0, fields = [size]);

dense_assign!(Scalar, fields = [size]);

impl<'a, T: Element, A: Allocator> Scalar<'a, T, A> {
    /// Number of channels.
    pub fn dimension(&self) -> usize {
        self.size
    }

    pub fn shape(&self) -> Shape {
        Shape::scalar(self.size)
    }

    pub fn unit_size(&self, rank: usize) -> Option<usize> {
        (rank == 0).then_some(self.size)
    }

    /// Checked channel access.
    pub fn at(&self, channel: usize) -> Result<&T, TensorError> {
        const OP: &str = "Scalar::at";
        check::ensure_initialized(OP, self.size())?;
        check::check_index(OP, channel, self.size)?;
        Ok(&self.as_slice()[channel])
    }

    pub fn at_mut(&mut self, channel: usize) -> Result<&mut T, TensorError> {
        const OP: &str = "Scalar::at_mut";
        check::ensure_initialized(OP, self.size())?;
        check::check_index(OP, channel, self.size)?;
        Ok(&mut self.as_mut_slice()[channel])
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }
}

impl<'a, T: Element, A: Allocator> Index<usize> for Scalar<'a, T, A> {
    type Output = T;

    fn index(&self, channel: usize) -> &T {
        &self.as_slice()[channel]
    }
}

impl<'a, T: Element, A: Allocator> IndexMut<usize> for Scalar<'a, T, A> {
    fn index_mut(&mut self, channel: usize) -> &mut T {
        &mut self.as_mut_slice()[channel]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use memory_manager::{MemoryBudget, PoolAllocator};

    #[test]
    fn test_assign_and_index() {
        let mut s: Scalar<'_, i16> = Scalar::new();
        assert!(s.is_empty());
        s.assign_slice(3, &[1, -2, 3]).unwrap();
        assert_eq!(s.size(), 3);
        assert_eq!(s.dimension(), 3);
        assert_eq!(s[1], -2);
        s[1] = 7;
        assert_eq!(s.as_slice(), &[1, 7, 3]);
        assert!(s.is_owner());
    }

    #[test]
    fn test_assign_twice_fails() {
        let mut s: Scalar<'_, u8> = Scalar::with_shape(2).unwrap();
        assert!(matches!(
            s.assign(4),
            Err(TensorError::AlreadyInitialized { op: "Scalar::assign" })
        ));
        s.reassign_value(4, 9).unwrap();
        assert_eq!(s.as_slice(), &[9, 9, 9, 9]);
    }

    #[test]
    fn test_zero_size_rejected() {
        let mut s: Scalar<'_, f32> = Scalar::new();
        assert!(matches!(s.assign(0), Err(TensorError::InvalidSize { .. })));
        assert!(s.is_empty());
    }

    #[test]
    fn test_checked_access() {
        let s: Scalar<'_, u32> = Scalar::filled(2, 5).unwrap();
        assert_eq!(*s.at(1).unwrap(), 5);
        assert!(matches!(
            s.at(2),
            Err(TensorError::OutOfRange { index: 2, extent: 2, .. })
        ));
    }

    #[test]
    fn test_copy_modes() {
        let mut src: Scalar<'_, f64> = Scalar::from_slice(2, &[1.5, 2.5]).unwrap();

        let mut deep: Scalar<'_, f64> = Scalar::new();
        deep.assign_from(&src, CopyMode::DeepCopy).unwrap();
        assert_eq!(deep, src);
        assert!(deep.is_owner());

        let mut shallow: Scalar<'_, f64> = Scalar::new();
        assert!(matches!(
            shallow.assign_from(&src, CopyMode::ShallowCopy),
            Err(TensorError::InvalidCopyMode { .. })
        ));

        let mut view: Scalar<'_, f64> = Scalar::new();
        view.assign_from_mut(&mut src, CopyMode::ShallowCopy).unwrap();
        assert!(!view.is_owner());
        view[0] = -1.0;
        drop(view);
        assert_eq!(src.as_slice(), &[-1.0, 2.5]);
    }

    #[test]
    fn test_assign_from_empty_source() {
        let src: Scalar<'_, u8> = Scalar::new();
        let mut dst: Scalar<'_, u8> = Scalar::new();
        assert!(matches!(
            dst.assign_from(&src, CopyMode::DeepCopy),
            Err(TensorError::NotInitialized { .. })
        ));
    }

    #[test]
    fn test_clear_is_idempotent_and_releases_once() {
        let pool = PoolAllocator::new(MemoryBudget::from_mb(1));
        let mut s: Scalar<'_, i32, _> = Scalar::with_shape_in(8, pool.clone()).unwrap();
        s.clear();
        s.clear();
        assert!(s.is_empty());
        drop(s);
        assert_eq!(pool.stats().total_deallocations, 1);
    }

    #[test]
    fn test_fill_errors() {
        let mut empty: Scalar<'_, u8> = Scalar::new();
        assert!(matches!(empty.fill(1), Err(TensorError::NotInitialized { .. })));

        let mut s: Scalar<'_, u8> = Scalar::with_shape(3).unwrap();
        assert!(matches!(
            s.fill_slice(&[1, 2]),
            Err(TensorError::InvalidSize { .. })
        ));
        s.fill_slice(&[1, 2, 3]).unwrap();
        assert_eq!(s.as_slice(), &[1, 2, 3]);
    }
}
