// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Validation helpers shared by the containers.

use crate::TensorError;

/// Element count of a shape whose extents must all be non-zero.
pub(crate) fn shape_product(op: &'static str, extents: &[usize]) -> Result<usize, TensorError> {
    if extents.iter().any(|&e| e == 0) {
        return Err(TensorError::zero_extent(op, extents));
    }
    extents
        .iter()
        .try_fold(1usize, |acc, &e| acc.checked_mul(e))
        .ok_or_else(|| TensorError::InvalidSize {
            op,
            detail: "element count overflows usize".to_string(),
        })
}

pub(crate) fn ensure_uninitialized(op: &'static str, size: usize) -> Result<(), TensorError> {
    if size == 0 {
        Ok(())
    } else {
        Err(TensorError::AlreadyInitialized { op })
    }
}

pub(crate) fn ensure_initialized(op: &'static str, size: usize) -> Result<(), TensorError> {
    if size == 0 {
        Err(TensorError::NotInitialized { op })
    } else {
        Ok(())
    }
}

pub(crate) fn ensure_len(op: &'static str, expected: usize, actual: usize) -> Result<(), TensorError> {
    if expected == actual {
        Ok(())
    } else {
        Err(TensorError::size_mismatch(op, expected, actual))
    }
}

pub(crate) fn check_index(op: &'static str, index: usize, extent: usize) -> Result<(), TensorError> {
    if index < extent {
        Ok(())
    } else {
        Err(TensorError::OutOfRange { op, index, extent })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shape_product() {
        assert_eq!(shape_product("t", &[2, 3, 4]).unwrap(), 24);
        assert!(matches!(
            shape_product("t", &[2, 0, 4]),
            Err(TensorError::InvalidSize { .. })
        ));
        assert!(matches!(
            shape_product("t", &[usize::MAX, 2]),
            Err(TensorError::InvalidSize { .. })
        ));
    }

    #[test]
    fn test_state_checks() {
        assert!(ensure_uninitialized("t", 0).is_ok());
        assert!(matches!(
            ensure_uninitialized("t", 1),
            Err(TensorError::AlreadyInitialized { op: "t" })
        ));
        assert!(matches!(
            ensure_initialized("t", 0),
            Err(TensorError::NotInitialized { op: "t" })
        ));
        assert!(matches!(
            check_index("t", 3, 3),
            Err(TensorError::OutOfRange { index: 3, extent: 3, .. })
        ));
    }
}
