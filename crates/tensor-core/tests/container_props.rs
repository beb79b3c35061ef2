// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Property tests for container layout and ownership.

use memory_manager::{MemoryBudget, PoolAllocator};
use proptest::prelude::*;
use tensor_core::{CopyMode, Dense, Matrix, Tensor};

fn extents() -> impl Strategy<Value = (usize, usize, usize)> {
    (1usize..8, 1usize..8, 1usize..5)
}

proptest! {
    #[test]
    fn prop_row_views_match_flat_layout((rows, columns, dimension) in extents()) {
        let n = rows * columns * dimension;
        let data: Vec<i32> = (0..n as i32).collect();
        let m: Matrix<'_, i32> = Matrix::from_slice(rows, columns, dimension, &data).unwrap();
        for r in 0..rows {
            let row = m.row(r).unwrap();
            let start = r * columns * dimension;
            prop_assert_eq!(row.as_slice(), &data[start..start + columns * dimension]);
            for c in 0..columns {
                prop_assert_eq!(m.get(r, c, dimension - 1).unwrap(), &data[start + c * dimension + dimension - 1]);
            }
        }
    }

    #[test]
    fn prop_unit_sizes_nest((batch, (rows, columns, dimension)) in (1usize..4, extents())) {
        let t: Tensor<'_, u8> = Tensor::with_shape(batch, rows, columns, dimension).unwrap();
        prop_assert_eq!(t.unit_size(0), Some(dimension));
        prop_assert_eq!(t.unit_size(1), Some(columns * dimension));
        prop_assert_eq!(t.unit_size(2), Some(rows * columns * dimension));
        prop_assert_eq!(t.unit_size(3), Some(t.size()));
        prop_assert_eq!(t.shape().num_elements(), t.size());
    }

    #[test]
    fn prop_owners_release_exactly_once((rows, columns, dimension) in extents(), views in 0usize..4) {
        let pool = PoolAllocator::new(MemoryBudget::from_mb(4));
        {
            let mut owner: Matrix<'_, f32, _> =
                Matrix::with_shape_in(rows, columns, dimension, pool.clone()).unwrap();
            for _ in 0..views {
                let mut alias: Matrix<'_, f32, _> = Matrix::new_in(pool.clone());
                alias.assign_from_mut(&mut owner, CopyMode::ShallowCopy).unwrap();
                alias.clear();
                alias.clear();
            }
            let copy = owner.try_clone().unwrap();
            prop_assert_eq!(&copy, &owner);
        }
        let stats = pool.stats();
        prop_assert_eq!(stats.total_deallocations, 2);
        prop_assert_eq!(stats.live_allocations(), 0);
    }
}
