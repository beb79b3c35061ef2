// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Pixel transpose of matrices and of every plane of a tensor.
//!
//! Pixels are moved whole: a `rows × columns × dimension` source becomes a
//! `columns × rows × dimension` destination. Pixels of 1, 2, 4 or 8 bytes
//! are moved as machine words by the tiled kernels; any other width goes
//! through a byte-wise copy.

use crate::ops::ensure_initialized;
use crate::Dispatcher;
use simd_kernels::{transpose_pixels, TransposeKernels};
use std::mem;
use tensor_core::{Allocator, Element, Matrix, Shape, Tensor, TensorError};

/// One or more equally shaped planes, as raw bytes.
struct Planes {
    count: usize,
    rows: usize,
    columns: usize,
    pixel: usize,
}

impl Planes {
    fn plane_bytes(&self) -> usize {
        self.rows * self.columns * self.pixel
    }
}

impl Dispatcher {
    /// `b[j][i] = a[i][j]` per pixel. `b` must already have shape
    /// `columns × rows × dimension`.
    pub fn transpose<'c, 'b, T, A, B>(
        &self,
        a: &Matrix<'_, T, A>,
        b: &'c mut Matrix<'b, T, B>,
    ) -> Result<&'c mut Matrix<'b, T, B>, TensorError>
    where
        T: Element,
        A: Allocator,
        B: Allocator,
    {
        const OP: &str = "cpu_transpose";
        ensure_initialized(OP, a)?;
        ensure_initialized(OP, b)?;
        let expected = Shape::matrix(a.columns(), a.rows(), a.dimension());
        if b.shape() != expected {
            return Err(TensorError::InvalidShape {
                op: OP,
                lhs: a.shape(),
                rhs: b.shape(),
            });
        }

        let planes = Planes {
            count: 1,
            rows: a.rows(),
            columns: a.columns(),
            pixel: a.dimension() * mem::size_of::<T>(),
        };
        // SAFETY: both buffers hold one plane of the described geometry and
        // cannot overlap, `b` being borrowed mutably.
        unsafe { self.transpose_planes(OP, &planes, a.as_ptr().cast(), b.as_mut_ptr().cast()) };
        Ok(b)
    }

    /// [`Dispatcher::transpose`] applied to every plane. `b` must already
    /// have shape `batch × columns × rows × dimension`.
    pub fn transpose_tensor<'c, 'b, T, A, B>(
        &self,
        a: &Tensor<'_, T, A>,
        b: &'c mut Tensor<'b, T, B>,
    ) -> Result<&'c mut Tensor<'b, T, B>, TensorError>
    where
        T: Element,
        A: Allocator,
        B: Allocator,
    {
        const OP: &str = "cpu_transpose_tensor";
        ensure_initialized(OP, a)?;
        ensure_initialized(OP, b)?;
        let expected = Shape::tensor(a.batch(), a.columns(), a.rows(), a.dimension());
        if b.shape() != expected {
            return Err(TensorError::InvalidShape {
                op: OP,
                lhs: a.shape(),
                rhs: b.shape(),
            });
        }

        let planes = Planes {
            count: a.batch(),
            rows: a.rows(),
            columns: a.columns(),
            pixel: a.dimension() * mem::size_of::<T>(),
        };
        // SAFETY: as in `transpose`, for `batch` consecutive planes.
        unsafe { self.transpose_planes(OP, &planes, a.as_ptr().cast(), b.as_mut_ptr().cast()) };
        Ok(b)
    }

    unsafe fn transpose_planes(&self, op: &'static str, planes: &Planes, a: *const u8, b: *mut u8) {
        match planes.pixel {
            1 => self.transpose_words::<u8>(op, planes, a, b),
            2 => self.transpose_words::<u16>(op, planes, a, b),
            4 => self.transpose_words::<u32>(op, planes, a, b),
            8 => self.transpose_words::<u64>(op, planes, a, b),
            _ => self.transpose_bytes(op, planes, a, b),
        }
    }

    unsafe fn transpose_words<W: TransposeKernels>(
        &self,
        op: &'static str,
        planes: &Planes,
        a: *const u8,
        b: *mut u8,
    ) {
        let align = mem::align_of::<W>();
        if a as usize % align != 0 || b as usize % align != 0 {
            return self.transpose_bytes(op, planes, a, b);
        }
        let kernel = self.select(op, &W::transpose_kernels());
        let step = planes.plane_bytes();
        for p in 0..planes.count {
            kernel(
                planes.rows,
                planes.columns,
                a.add(p * step).cast::<W>(),
                planes.columns,
                b.add(p * step).cast::<W>(),
                planes.rows,
            );
        }
    }

    unsafe fn transpose_bytes(&self, op: &'static str, planes: &Planes, a: *const u8, b: *mut u8) {
        tracing::trace!(op, pixel = planes.pixel, "byte-wise transpose");
        let step = planes.plane_bytes();
        for p in 0..planes.count {
            transpose_pixels(
                planes.rows,
                planes.columns,
                planes.pixel,
                a.add(p * step),
                planes.columns * planes.pixel,
                b.add(p * step),
                planes.rows * planes.pixel,
            );
        }
    }
}

/// [`Dispatcher::transpose`] on the global dispatcher.
pub fn cpu_transpose<'c, 'b, T, A, B>(
    a: &Matrix<'_, T, A>,
    b: &'c mut Matrix<'b, T, B>,
) -> Result<&'c mut Matrix<'b, T, B>, TensorError>
where
    T: Element,
    A: Allocator,
    B: Allocator,
{
    Dispatcher::global().transpose(a, b)
}

/// [`Dispatcher::transpose_tensor`] on the global dispatcher.
pub fn cpu_transpose_tensor<'c, 'b, T, A, B>(
    a: &Tensor<'_, T, A>,
    b: &'c mut Tensor<'b, T, B>,
) -> Result<&'c mut Tensor<'b, T, B>, TensorError>
where
    T: Element,
    A: Allocator,
    B: Allocator,
{
    Dispatcher::global().transpose_tensor(a, b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cpu_features::CpuCapabilities;

    fn ramp<T: Element>(rows: usize, columns: usize, dimension: usize, f: impl Fn(usize) -> T) -> Matrix<'static, T> {
        let data: Vec<T> = (0..rows * columns * dimension).map(f).collect();
        Matrix::from_slice(rows, columns, dimension, &data).unwrap()
    }

    fn check_transposed<T: Element>(a: &Matrix<'_, T>, b: &Matrix<'_, T>) {
        for i in 0..a.rows() {
            for j in 0..a.columns() {
                assert_eq!(&a[(i, j)], &b[(j, i)], "pixel ({i}, {j})");
            }
        }
    }

    #[test]
    fn test_i8_round_trip_13x17() {
        let a = ramp::<i8>(13, 17, 1, |i| (i as i32 * 7 - 100) as i8);
        let mut t: Matrix<i8> = Matrix::with_shape(17, 13, 1).unwrap();
        let mut back: Matrix<i8> = Matrix::with_shape(13, 17, 1).unwrap();
        cpu_transpose(&a, &mut t).unwrap();
        check_transposed(&a, &t);
        cpu_transpose(&t, &mut back).unwrap();
        assert_eq!(back, a);
    }

    #[test]
    fn test_every_pixel_width() {
        for dimension in [1, 2, 3, 4, 5] {
            let a = ramp::<u16>(9, 21, dimension, |i| i as u16);
            let mut b: Matrix<u16> = Matrix::with_shape(21, 9, dimension).unwrap();
            cpu_transpose(&a, &mut b).unwrap();
            check_transposed(&a, &b);
        }
        let f = ramp::<f64>(5, 3, 1, |i| i as f64 * 0.5);
        let mut g: Matrix<f64> = Matrix::with_shape(3, 5, 1).unwrap();
        cpu_transpose(&f, &mut g).unwrap();
        check_transposed(&f, &g);
    }

    #[test]
    fn test_portable_and_best_agree() {
        let a = ramp::<u8>(35, 40, 1, |i| (i * 31) as u8);
        let mut fast: Matrix<u8> = Matrix::with_shape(40, 35, 1).unwrap();
        let mut slow: Matrix<u8> = Matrix::with_shape(40, 35, 1).unwrap();
        Dispatcher::default().transpose(&a, &mut fast).unwrap();
        Dispatcher::with_capabilities(CpuCapabilities::none())
            .transpose(&a, &mut slow)
            .unwrap();
        assert_eq!(fast, slow);
    }

    #[test]
    fn test_tensor_planes() {
        let data: Vec<u32> = (0..2 * 3 * 5).collect();
        let a: Tensor<u32> = Tensor::from_slice(2, 3, 5, 1, &data).unwrap();
        let mut b: Tensor<u32> = Tensor::with_shape(2, 5, 3, 1).unwrap();
        cpu_transpose_tensor(&a, &mut b).unwrap();
        for p in 0..2 {
            for i in 0..3 {
                for j in 0..5 {
                    assert_eq!(a.get(p, i, j, 0).unwrap(), b.get(p, j, i, 0).unwrap());
                }
            }
        }
    }

    #[test]
    fn test_destination_shape_checked() {
        let a = ramp::<u8>(2, 3, 1, |i| i as u8);
        let mut same: Matrix<u8> = Matrix::with_shape(2, 3, 1).unwrap();
        assert!(matches!(
            cpu_transpose(&a, &mut same),
            Err(TensorError::InvalidShape { op: "cpu_transpose", .. })
        ));
        let mut empty: Matrix<u8> = Matrix::new();
        assert!(matches!(
            cpu_transpose(&a, &mut empty),
            Err(TensorError::NotInitialized { .. })
        ));
    }
}
