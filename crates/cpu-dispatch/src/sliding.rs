// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Sliding-window index generation.
//!
//! For a `rows × columns × dimension` source, the index lists, window by
//! window, the flat element offset of every value the window covers. The
//! windows are ordered row-major over their positions; inside a window the
//! offsets run channel by channel, then row by row:
//!
//! ```text
//! index[w][ch * window_h * window_w + y * window_w + x]
//!     = (top(w) + y) * columns * dimension + (left(w) + x) * dimension + ch
//! ```
//!
//! The index is built by repeated offset-adds: one window row, then the
//! window's rows, then its channels, then the horizontal slides, then the
//! vertical ones, each step copying the previous block plus a constant.

use crate::ops::ensure_initialized;
use crate::Dispatcher;
use serde::{Deserialize, Serialize};
use simd_kernels::{OffsetFn, SlidingKernels};
use tensor_core::{Allocator, Matrix, TensorError};

/// Geometry of a sliding window over a source container.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlidingWindow {
    pub rows: usize,
    pub columns: usize,
    pub dimension: usize,
    pub window_h: usize,
    pub window_w: usize,
    pub stride_h: usize,
    pub stride_w: usize,
}

impl SlidingWindow {
    /// A `window_h × window_w` window with unit strides.
    pub fn new(rows: usize, columns: usize, dimension: usize, window_h: usize, window_w: usize) -> Self {
        Self {
            rows,
            columns,
            dimension,
            window_h,
            window_w,
            stride_h: 1,
            stride_w: 1,
        }
    }

    pub fn with_strides(mut self, stride_h: usize, stride_w: usize) -> Self {
        self.stride_h = stride_h;
        self.stride_w = stride_w;
        self
    }

    /// Checks that the window fits the source and the strides advance.
    pub fn validate(&self, op: &'static str) -> Result<(), TensorError> {
        if self.window_h == 0
            || self.window_w == 0
            || self.window_h > self.rows
            || self.window_w > self.columns
        {
            return Err(TensorError::InvalidWindowSize {
                op,
                window_h: self.window_h,
                window_w: self.window_w,
                rows: self.rows,
                columns: self.columns,
            });
        }
        if self.stride_h == 0 || self.stride_w == 0 {
            return Err(TensorError::InvalidSlidingStride {
                op,
                stride_h: self.stride_h,
                stride_w: self.stride_w,
            });
        }
        if self.dimension == 0 {
            return Err(TensorError::InvalidDimension {
                op,
                expected: 1,
                actual: 0,
            });
        }
        Ok(())
    }

    /// Window positions vertically and horizontally, or `None` if the
    /// geometry is invalid.
    pub fn steps(&self) -> Option<(usize, usize)> {
        self.validate("steps").ok()?;
        Some((
            (self.rows - self.window_h) / self.stride_h + 1,
            (self.columns - self.window_w) / self.stride_w + 1,
        ))
    }

    /// Number of window positions, or `None` if the geometry is invalid
    /// or the count overflows.
    pub fn windows(&self) -> Option<usize> {
        let (steps_h, steps_w) = self.steps()?;
        steps_h.checked_mul(steps_w)
    }

    /// Offsets per window, or `None` on overflow.
    pub fn window_len(&self) -> Option<usize> {
        self.window_h.checked_mul(self.window_w)?.checked_mul(self.dimension)
    }

    /// Total number of offsets in the index, or `None` if the geometry is
    /// invalid or the count overflows.
    pub fn element_count(&self) -> Option<usize> {
        self.windows()?.checked_mul(self.window_len()?)
    }

    /// Natural `(rows, columns)` of an index matrix: one row per window.
    pub fn index_shape(&self) -> Option<(usize, usize)> {
        Some((self.windows()?, self.window_len()?))
    }
}

impl Dispatcher {
    /// Fills `index` with the offsets of every window position.
    ///
    /// `index` must already hold exactly [`SlidingWindow::element_count`]
    /// elements, and every offset into the source must be representable
    /// in `I`.
    pub fn sliding_window<'c, 'b, I, A>(
        &self,
        index: &'c mut Matrix<'b, I, A>,
        window: &SlidingWindow,
    ) -> Result<&'c mut Matrix<'b, I, A>, TensorError>
    where
        I: SlidingKernels,
        A: Allocator,
    {
        const OP: &str = "cpu_sliding_window";
        ensure_initialized(OP, index)?;
        window.validate(OP)?;

        let overflow = |what: &str| TensorError::InvalidSize {
            op: OP,
            detail: format!("{what} overflows"),
        };
        let (steps_h, steps_w) = window.steps().ok_or_else(|| overflow("window count"))?;
        let expected = window.element_count().ok_or_else(|| overflow("window count"))?;
        if index.size() != expected {
            return Err(TensorError::size_mismatch(OP, expected, index.size()));
        }

        let row_stride = window
            .columns
            .checked_mul(window.dimension)
            .ok_or_else(|| overflow("source row"))?;
        let source = window
            .rows
            .checked_mul(row_stride)
            .ok_or_else(|| overflow("source size"))?;
        let fit = |value: usize| -> Result<I, TensorError> {
            I::from_offset(value).ok_or_else(|| TensorError::InvalidSize {
                op: OP,
                detail: format!(
                    "offset {value} does not fit {}",
                    std::any::type_name::<I>()
                ),
            })
        };
        // Steps that are never taken are neither computed nor checked.
        let step = |taken: bool, stride: usize, unit: usize| -> Result<I, TensorError> {
            if !taken {
                return Ok(I::default());
            }
            fit(stride.checked_mul(unit).ok_or_else(|| overflow("window step"))?)
        };
        fit(source - 1)?;
        let zero = fit(0)?;
        let pixel_step = step(window.window_w > 1, 1, window.dimension)?;
        let row_step = step(window.window_h > 1, 1, row_stride)?;
        let channel_step = step(window.dimension > 1, 1, 1)?;
        let slide_w = step(steps_w > 1, window.stride_w, window.dimension)?;
        let slide_h = step(steps_h > 1, window.stride_h, row_stride)?;

        let kernel = self.select(OP, &I::offset_kernels());
        let out = index.as_mut_slice();
        out[0] = zero;
        for x in 1..window.window_w {
            out[x] = out[x - 1].wrapping_offset(pixel_step);
        }

        let mut filled = window.window_w;
        // SAFETY: each step reads the first `filled` elements and writes
        // the next ones, all inside `out`, which holds `expected` elements.
        unsafe {
            filled = repeat(kernel, out, filled, window.window_h, row_step);
            filled = repeat(kernel, out, filled, window.dimension, channel_step);
            filled = repeat_chained(kernel, out, filled, steps_w, slide_w);
            filled = repeat_chained(kernel, out, filled, steps_h, slide_h);
        }
        debug_assert_eq!(filled, expected);
        Ok(index)
    }
}

/// Writes `times - 1` copies of `out[..block]`, copy `k` offset by `k * step`.
unsafe fn repeat<I: SlidingKernels>(
    kernel: OffsetFn<I>,
    out: &mut [I],
    block: usize,
    times: usize,
    step: I,
) -> usize {
    let base = out.as_mut_ptr();
    let mut offset = step;
    for k in 1..times {
        kernel(block, base, base.add(k * block), offset);
        offset = offset.wrapping_offset(step);
    }
    block * times
}

/// Writes `times - 1` copies, each the previous copy offset by `step`.
unsafe fn repeat_chained<I: SlidingKernels>(
    kernel: OffsetFn<I>,
    out: &mut [I],
    block: usize,
    times: usize,
    step: I,
) -> usize {
    let base = out.as_mut_ptr();
    for k in 1..times {
        kernel(block, base.add((k - 1) * block), base.add(k * block), step);
    }
    block * times
}

/// [`Dispatcher::sliding_window`] on the global dispatcher.
pub fn cpu_sliding_window<'c, 'b, I, A>(
    index: &'c mut Matrix<'b, I, A>,
    window: &SlidingWindow,
) -> Result<&'c mut Matrix<'b, I, A>, TensorError>
where
    I: SlidingKernels,
    A: Allocator,
{
    Dispatcher::global().sliding_window(index, window)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn naive(w: &SlidingWindow) -> Vec<usize> {
        let (steps_h, steps_w) = w.steps().unwrap();
        let mut out = Vec::new();
        for sy in 0..steps_h {
            for sx in 0..steps_w {
                for ch in 0..w.dimension {
                    for y in 0..w.window_h {
                        for x in 0..w.window_w {
                            let row = sy * w.stride_h + y;
                            let column = sx * w.stride_w + x;
                            out.push(row * w.columns * w.dimension + column * w.dimension + ch);
                        }
                    }
                }
            }
        }
        out
    }

    fn generate<I: SlidingKernels>(w: &SlidingWindow) -> Matrix<'static, I> {
        let (rows, columns) = w.index_shape().unwrap();
        let mut index: Matrix<I> = Matrix::with_shape(rows, columns, 1).unwrap();
        cpu_sliding_window(&mut index, w).unwrap();
        index
    }

    #[test]
    fn test_matches_naive_offsets() {
        for w in [
            SlidingWindow::new(5, 6, 1, 3, 3),
            SlidingWindow::new(4, 4, 3, 2, 2).with_strides(2, 2),
            SlidingWindow::new(7, 9, 2, 3, 4).with_strides(2, 3),
            SlidingWindow::new(3, 3, 1, 3, 3),
            SlidingWindow::new(1, 10, 4, 1, 1),
        ] {
            let expected = naive(&w);
            let index = generate::<usize>(&w);
            assert_eq!(index.as_slice(), expected.as_slice(), "{w:?}");

            let narrow = generate::<u32>(&w);
            let widened: Vec<usize> = narrow.as_slice().iter().map(|&v| v as usize).collect();
            assert_eq!(widened, expected, "{w:?}");
        }
    }

    #[test]
    fn test_index_rows_are_windows() {
        let w = SlidingWindow::new(3, 4, 1, 2, 2).with_strides(1, 2);
        let index = generate::<u64>(&w);
        assert_eq!(index.rows(), 4);
        assert_eq!(&index[0], &[0, 1, 4, 5]);
        assert_eq!(&index[1], &[2, 3, 6, 7]);
        assert_eq!(&index[3], &[6, 7, 10, 11]);
    }

    #[test]
    fn test_validation_order() {
        let mut empty: Matrix<u32> = Matrix::new();
        let w = SlidingWindow::new(4, 4, 1, 2, 2);
        assert!(matches!(
            cpu_sliding_window(&mut empty, &w),
            Err(TensorError::NotInitialized { .. })
        ));

        let mut index: Matrix<u32> = Matrix::with_shape(9, 4, 1).unwrap();
        let too_tall = SlidingWindow::new(4, 4, 1, 5, 2);
        assert!(matches!(
            cpu_sliding_window(&mut index, &too_tall),
            Err(TensorError::InvalidWindowSize { window_h: 5, .. })
        ));
        let zero = SlidingWindow::new(4, 4, 1, 0, 2);
        assert!(matches!(
            cpu_sliding_window(&mut index, &zero),
            Err(TensorError::InvalidWindowSize { .. })
        ));
        let still = w.with_strides(0, 1);
        assert!(matches!(
            cpu_sliding_window(&mut index, &still),
            Err(TensorError::InvalidSlidingStride { stride_h: 0, .. })
        ));

        let mut wrong: Matrix<u32> = Matrix::with_shape(9, 3, 1).unwrap();
        assert!(matches!(
            cpu_sliding_window(&mut wrong, &w),
            Err(TensorError::InvalidSize { .. })
        ));
        assert!(cpu_sliding_window(&mut index, &w).is_ok());
    }

    #[test]
    fn test_counts() {
        let w = SlidingWindow::new(10, 12, 3, 3, 5).with_strides(2, 3);
        assert_eq!(w.steps(), Some((4, 3)));
        assert_eq!(w.windows(), Some(12));
        assert_eq!(w.window_len(), Some(45));
        assert_eq!(w.element_count(), Some(540));
        assert_eq!(SlidingWindow::new(2, 2, 1, 3, 1).windows(), None);
        assert_eq!(SlidingWindow::new(2, 2, 0, 1, 1).element_count(), None);
    }

    #[test]
    fn test_single_window_with_huge_strides() {
        let huge = usize::MAX / 2 + 1;
        let w = SlidingWindow::new(4, 4, 2, 2, 2).with_strides(huge, huge);
        assert_eq!(w.steps(), Some((1, 1)));
        let expected = naive(&w);
        assert_eq!(generate::<usize>(&w).as_slice(), expected.as_slice());
        assert_eq!(&generate::<u32>(&w)[0], &[0, 2, 8, 10, 1, 3, 9, 11]);

        // One step on a single axis only.
        let tall = SlidingWindow::new(5, 3, 1, 2, 3).with_strides(2, usize::MAX);
        assert_eq!(tall.steps(), Some((2, 1)));
        assert_eq!(generate::<u64>(&tall).as_slice(), &[0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11]);
    }

    #[test]
    fn test_zero_dimension_rejected() {
        let w = SlidingWindow::new(4, 4, 0, 2, 2);
        assert!(matches!(
            w.validate("t"),
            Err(TensorError::InvalidDimension { actual: 0, .. })
        ));
        let mut index: Matrix<u32> = Matrix::with_shape(9, 4, 1).unwrap();
        assert!(matches!(
            cpu_sliding_window(&mut index, &w),
            Err(TensorError::InvalidDimension { op: "cpu_sliding_window", .. })
        ));
    }

    #[test]
    fn test_offsets_must_fit_index_type() {
        let w = SlidingWindow::new(1 << 17, 1 << 16, 1, 1, 1).with_strides(1 << 17, 1 << 16);
        assert_eq!(w.element_count(), Some(1));
        let mut index: Matrix<u32> = Matrix::with_shape(1, 1, 1).unwrap();
        assert!(matches!(
            cpu_sliding_window(&mut index, &w),
            Err(TensorError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_serde() {
        let w = SlidingWindow::new(8, 8, 3, 3, 3).with_strides(1, 2);
        let json = serde_json::to_string(&w).unwrap();
        assert_eq!(serde_json::from_str::<SlidingWindow>(&json).unwrap(), w);
    }
}
