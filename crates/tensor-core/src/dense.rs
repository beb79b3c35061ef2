// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Shape-generic access to container buffers.

use crate::{Element, Shape};
use std::ops::Deref;

/// What the dispatch layer needs to know about any container.
///
/// All four containers store their elements contiguously in row-major
/// order, so an operation only needs the flat buffer plus the broadcast
/// unit sizes.
pub trait Dense {
    /// Element type stored in the buffer.
    type Elem: Element;

    /// Container rank: 0 for `Scalar` up to 3 for `Tensor`.
    const RANK: usize;

    /// Current extents.
    fn shape(&self) -> Shape;

    /// Total element count (0 when empty).
    fn size(&self) -> usize;

    /// Channels per pixel.
    fn dimension(&self) -> usize;

    /// Element count of a rank-`rank` sub-container (`dimension`,
    /// `row_size`, `matrix_size`), or `None` if `rank > Self::RANK`.
    fn unit_size(&self, rank: usize) -> Option<usize>;

    /// The elements, row-major.
    fn as_slice(&self) -> &[Self::Elem];

    /// The elements, row-major, mutably.
    fn as_mut_slice(&mut self) -> &mut [Self::Elem];

    /// Returns `true` if the container holds no buffer.
    fn is_empty(&self) -> bool {
        self.size() == 0
    }
}

/// A container that may only be read.
///
/// Returned by the immutable sub-view accessors (`Matrix::row`,
/// `Tensor::plane`, ...). It dereferences to the wrapped view but offers
/// no mutable access, so data borrowed through `&self` cannot be written.
pub struct ReadOnly<C>(C);

impl<C> ReadOnly<C> {
    pub(crate) fn new(inner: C) -> Self {
        Self(inner)
    }
}

impl<C> Deref for ReadOnly<C> {
    type Target = C;

    fn deref(&self) -> &C {
        &self.0
    }
}

impl<C: std::fmt::Debug> std::fmt::Debug for ReadOnly<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ReadOnly").field(&self.0).finish()
    }
}
