// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Row and column sums accumulated into `f32`.
//!
//! A container is summed as a stack of rows of `unit_size(1)` elements
//! (a `Vector` is one row, a `Tensor` is `batch * rows` rows). Sums are
//! added to the accumulator's existing contents, so an accumulator can
//! collect several containers.

use crate::ops::ensure_initialized;
use crate::Dispatcher;
use simd_kernels::{KernelTable, ReduceKernels, SumFn};
use tensor_core::{Dense, TensorError};

impl Dispatcher {
    /// `acc[r] += Σ_j a[r][j]` for every row `r`; `acc` holds one entry per row.
    pub fn row_sums<'c, T, A, C>(&self, a: &A, acc: &'c mut C) -> Result<&'c mut C, TensorError>
    where
        T: ReduceKernels,
        A: Dense<Elem = T>,
        C: Dense<Elem = f32>,
    {
        self.sum_into("cpu_row_sums", T::row_sum_kernels(), a, acc, |rows, _| rows)
    }

    /// `acc[j] += Σ_r a[r][j]` for every column element `j`; `acc` holds
    /// one entry per element of a row.
    pub fn column_sums<'c, T, A, C>(&self, a: &A, acc: &'c mut C) -> Result<&'c mut C, TensorError>
    where
        T: ReduceKernels,
        A: Dense<Elem = T>,
        C: Dense<Elem = f32>,
    {
        self.sum_into("cpu_column_sums", T::column_sum_kernels(), a, acc, |_, columns| columns)
    }

    fn sum_into<'c, T, A, C>(
        &self,
        op: &'static str,
        table: KernelTable<SumFn<T>>,
        a: &A,
        acc: &'c mut C,
        outputs: impl FnOnce(usize, usize) -> usize,
    ) -> Result<&'c mut C, TensorError>
    where
        T: ReduceKernels,
        A: Dense<Elem = T>,
        C: Dense<Elem = f32>,
    {
        ensure_initialized(op, a)?;
        ensure_initialized(op, acc)?;
        let columns = match a.unit_size(1) {
            Some(columns) if columns > 0 => columns,
            _ => {
                return Err(TensorError::InvalidShape {
                    op,
                    lhs: a.shape(),
                    rhs: acc.shape(),
                })
            }
        };
        let rows = a.size() / columns;
        let expected = outputs(rows, columns);
        if acc.size() != expected {
            return Err(TensorError::size_mismatch(op, expected, acc.size()));
        }

        let kernel = self.select(op, &table);
        // SAFETY: `a` holds `rows * columns` elements laid out with stride
        // `columns`; `acc` holds the `expected` outputs.
        unsafe {
            kernel(
                rows,
                columns,
                a.as_slice().as_ptr(),
                columns,
                acc.as_mut_slice().as_mut_ptr(),
            )
        };
        Ok(acc)
    }
}

/// [`Dispatcher::row_sums`] on the global dispatcher.
pub fn cpu_row_sums<'c, T, A, C>(a: &A, acc: &'c mut C) -> Result<&'c mut C, TensorError>
where
    T: ReduceKernels,
    A: Dense<Elem = T>,
    C: Dense<Elem = f32>,
{
    Dispatcher::global().row_sums(a, acc)
}

/// [`Dispatcher::column_sums`] on the global dispatcher.
pub fn cpu_column_sums<'c, T, A, C>(a: &A, acc: &'c mut C) -> Result<&'c mut C, TensorError>
where
    T: ReduceKernels,
    A: Dense<Elem = T>,
    C: Dense<Elem = f32>,
{
    Dispatcher::global().column_sums(a, acc)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::{Matrix, Scalar, Tensor, Vector};

    #[test]
    fn test_column_sums_of_u8_block() {
        let data: Vec<u8> = (0..8 * 16).map(|i| (i * 37 % 251) as u8).collect();
        let a: Matrix<u8> = Matrix::from_slice(8, 16, 1, &data).unwrap();
        let mut acc: Vector<f32> = Vector::filled(16, 1, 0.0).unwrap();
        cpu_column_sums(&a, &mut acc).unwrap();
        for j in 0..16 {
            let naive: u32 = (0..8).map(|r| data[r * 16 + j] as u32).sum();
            assert_eq!(acc.as_slice()[j], naive as f32, "column {j}");
        }
    }

    #[test]
    fn test_row_sums_accumulate() {
        let a: Matrix<i16> = Matrix::from_slice(3, 2, 2, &[1, 2, 3, 4, -1, -2, -3, -4, 100, 0, 0, 100]).unwrap();
        let mut acc: Vector<f32> = Vector::filled(3, 1, 1.0).unwrap();
        cpu_row_sums(&a, &mut acc).unwrap();
        assert_eq!(acc.as_slice(), &[11.0, -9.0, 201.0]);
        cpu_row_sums(&a, &mut acc).unwrap();
        assert_eq!(acc.as_slice(), &[21.0, -19.0, 401.0]);
    }

    #[test]
    fn test_tensor_rows_span_planes() {
        let t: Tensor<f32> = Tensor::filled(2, 3, 4, 1, 0.25).unwrap();
        let mut rows: Vector<f32> = Vector::filled(6, 1, 0.0).unwrap();
        cpu_row_sums(&t, &mut rows).unwrap();
        assert_eq!(rows.as_slice(), &[1.0; 6]);

        let mut columns: Vector<f32> = Vector::filled(4, 1, 0.0).unwrap();
        cpu_column_sums(&t, &mut columns).unwrap();
        assert_eq!(columns.as_slice(), &[1.5; 4]);
    }

    #[test]
    fn test_accumulator_size_checked() {
        let a: Matrix<u32> = Matrix::with_shape(4, 5, 1).unwrap();
        let mut wrong: Vector<f32> = Vector::with_shape(5, 1).unwrap();
        assert!(matches!(
            cpu_row_sums(&a, &mut wrong),
            Err(TensorError::InvalidSize { op: "cpu_row_sums", .. })
        ));
        assert!(cpu_column_sums(&a, &mut wrong).is_ok());

        let s: Scalar<u32> = Scalar::with_shape(3).unwrap();
        let mut one: Scalar<f32> = Scalar::with_shape(1).unwrap();
        assert!(matches!(cpu_row_sums(&s, &mut one), Err(TensorError::InvalidShape { .. })));
    }
}
