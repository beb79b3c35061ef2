// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Container shape descriptors.
//!
//! Every container is a grid of "pixels" of `dimension` channels. A
//! [`Shape`] lists the grid extents outermost first, followed by the
//! channel count:
//!
//! | container | dims |
//! |-----------|------|
//! | `Scalar`  | `[dimension]` |
//! | `Vector`  | `[length, dimension]` |
//! | `Matrix`  | `[rows, columns, dimension]` |
//! | `Tensor`  | `[batch, rows, columns, dimension]` |
//!
//! The container rank is therefore `dims.len() - 1`.

use std::fmt;

/// Describes the extents of a container.
#[derive(Debug, Clone, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Shape {
    dims: Vec<usize>,
}

impl Shape {
    /// Creates a shape from extents, channel count last.
    ///
    /// # Examples
    /// ```
    /// use tensor_core::Shape;
    /// let s = Shape::new(vec![2, 3, 4]);
    /// assert_eq!(s.rank(), 2);
    /// assert_eq!(s.num_elements(), 24);
    /// assert_eq!(s.dimension(), 4);
    /// ```
    pub fn new(dims: Vec<usize>) -> Self {
        Self { dims }
    }

    /// Rank-0 shape of `size` channels.
    pub fn scalar(size: usize) -> Self {
        Self { dims: vec![size] }
    }

    /// Rank-1 shape.
    pub fn vector(length: usize, dimension: usize) -> Self {
        Self {
            dims: vec![length, dimension],
        }
    }

    /// Rank-2 shape.
    pub fn matrix(rows: usize, columns: usize, dimension: usize) -> Self {
        Self {
            dims: vec![rows, columns, dimension],
        }
    }

    /// Rank-3 shape.
    pub fn tensor(batch: usize, rows: usize, columns: usize, dimension: usize) -> Self {
        Self {
            dims: vec![batch, rows, columns, dimension],
        }
    }

    /// Returns the container rank (0 for scalars, 3 for tensors).
    pub fn rank(&self) -> usize {
        self.dims.len().saturating_sub(1)
    }

    /// Returns the channel count (the innermost extent), or 0 for an
    /// extent-less shape.
    pub fn dimension(&self) -> usize {
        self.dims.last().copied().unwrap_or(0)
    }

    /// Returns the total number of elements.
    pub fn num_elements(&self) -> usize {
        if self.dims.is_empty() {
            0
        } else {
            self.dims.iter().product()
        }
    }

    /// Returns `true` if the shape holds no elements.
    pub fn is_empty(&self) -> bool {
        self.num_elements() == 0
    }

    /// Returns the extents as a slice.
    pub fn dims(&self) -> &[usize] {
        &self.dims
    }

    /// Returns one extent, or `None` if out of bounds.
    pub fn dim(&self, index: usize) -> Option<usize> {
        self.dims.get(index).copied()
    }

    /// Element count of one rank-`rank` sub-container: `dimension` for
    /// rank 0, `row_size` for rank 1, `matrix_size` for rank 2.
    ///
    /// Returns `None` if `rank` exceeds this shape's rank.
    pub fn unit_size(&self, rank: usize) -> Option<usize> {
        let n = self.dims.len();
        (rank < n).then(|| self.dims[n - rank - 1..].iter().product())
    }

    /// Computes row-major element strides for each extent.
    pub fn strides(&self) -> Vec<usize> {
        let rank = self.dims.len();
        let mut strides = vec![1usize; rank];
        for i in (0..rank.saturating_sub(1)).rev() {
            strides[i] = strides[i + 1] * self.dims[i + 1];
        }
        strides
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[")?;
        for (i, d) in self.dims.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{d}")?;
        }
        write!(f, "]")
    }
}

impl From<Vec<usize>> for Shape {
    fn from(dims: Vec<usize>) -> Self {
        Self::new(dims)
    }
}

impl From<&[usize]> for Shape {
    fn from(dims: &[usize]) -> Self {
        Self::new(dims.to_vec())
    }
}
