// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Checked operations on containers.
//!
//! Every operation validates its operands completely before the kernel
//! runs, so a failed call leaves the destination untouched. Checks run in
//! a fixed order: empty operands (`NotInitialized`), then ranks and
//! broadcast units (`InvalidShape`), then element counts (`InvalidSize`).

pub mod convert;
pub mod elementwise;
pub mod reduce;
pub mod transpose;

use tensor_core::{Dense, TensorError};

pub(crate) fn ensure_initialized<D: Dense>(op: &'static str, d: &D) -> Result<(), TensorError> {
    if d.is_empty() {
        return Err(TensorError::NotInitialized { op });
    }
    Ok(())
}

pub(crate) fn ensure_same_rank<X: Dense, Y: Dense>(
    op: &'static str,
    x: &X,
    y: &Y,
) -> Result<(), TensorError> {
    if X::RANK != Y::RANK {
        return Err(TensorError::InvalidShape {
            op,
            lhs: x.shape(),
            rhs: y.shape(),
        });
    }
    Ok(())
}

pub(crate) fn ensure_same_size<X: Dense, Y: Dense>(
    op: &'static str,
    x: &X,
    y: &Y,
) -> Result<(), TensorError> {
    if x.size() != y.size() {
        return Err(TensorError::size_mismatch(op, x.size(), y.size()));
    }
    Ok(())
}

/// The broadcast unit of `a` that `b` is repeated over: `b` must have a
/// lower rank and exactly as many elements as `a`'s sub-container of that
/// rank.
pub(crate) fn broadcast_unit<A: Dense, B: Dense>(
    op: &'static str,
    a: &A,
    b: &B,
) -> Result<usize, TensorError> {
    match a.unit_size(B::RANK) {
        Some(unit) if B::RANK < A::RANK && unit == b.size() => Ok(unit),
        _ => Err(TensorError::InvalidShape {
            op,
            lhs: a.shape(),
            rhs: b.shape(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tensor_core::{Matrix, Scalar, Tensor, Vector};

    #[test]
    fn test_broadcast_unit_per_rank() {
        let m: Matrix<u8> = Matrix::with_shape(3, 4, 2).unwrap();
        let row: Vector<u8> = Vector::with_shape(4, 2).unwrap();
        let pixel: Scalar<u8> = Scalar::with_shape(2).unwrap();
        assert_eq!(broadcast_unit("t", &m, &row).unwrap(), 8);
        assert_eq!(broadcast_unit("t", &m, &pixel).unwrap(), 2);

        let t: Tensor<u8> = Tensor::with_shape(2, 3, 4, 2).unwrap();
        assert_eq!(broadcast_unit("t", &t, &m).unwrap(), 24);
    }

    #[test]
    fn test_broadcast_unit_rejects() {
        let m: Matrix<u8> = Matrix::with_shape(3, 4, 1).unwrap();
        let short: Vector<u8> = Vector::with_shape(3, 1).unwrap();
        assert!(matches!(
            broadcast_unit("t", &m, &short),
            Err(TensorError::InvalidShape { .. })
        ));
        // Same rank is not a broadcast.
        assert!(broadcast_unit("t", &m, &m).is_err());
        // Higher rank never is.
        let t: Tensor<u8> = Tensor::with_shape(1, 3, 4, 1).unwrap();
        assert!(broadcast_unit("t", &m, &t).is_err());
    }

    #[test]
    fn test_rank_and_size() {
        let v: Vector<i32> = Vector::with_shape(6, 1).unwrap();
        let m: Matrix<i32> = Matrix::with_shape(2, 3, 1).unwrap();
        assert!(ensure_same_rank("t", &v, &m).is_err());
        assert!(ensure_same_size("t", &v, &m).is_ok());
        let empty: Vector<i32> = Vector::new();
        assert!(matches!(
            ensure_initialized("t", &empty),
            Err(TensorError::NotInitialized { op: "t" })
        ));
    }
}
