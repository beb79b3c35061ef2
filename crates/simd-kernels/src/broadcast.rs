// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Applying a binary kernel with one operand repeated.

use crate::table::BinaryFn;
use std::slice;

/// `c[o][i] = a[o][i] OP b[i]` for `o < outer`, `i < inner`.
///
/// A unit shorter than `tile` elements would make each kernel call too
/// short to leave the scalar tail, so `b` is first repeated into a pattern
/// of at least `tile` elements and whole groups of units are processed per
/// call.
///
/// # Safety
/// `a` must be readable and `c` writable for `outer * inner` elements, `b`
/// readable for `inner` elements, and `kernel` must be valid for the
/// running processor.
pub unsafe fn broadcast_rows<T: Copy>(
    kernel: BinaryFn<T>,
    outer: usize,
    inner: usize,
    a: *const T,
    b: *const T,
    c: *mut T,
    tile: usize,
) {
    if outer == 0 || inner == 0 {
        return;
    }
    if inner >= tile || outer == 1 {
        for o in 0..outer {
            kernel(inner, a.add(o * inner), b, c.add(o * inner));
        }
        return;
    }

    let group = tile.div_ceil(inner).min(outer);
    let pattern = slice::from_raw_parts(b, inner).repeat(group);
    let mut o = 0;
    while o < outer {
        let units = group.min(outer - o);
        kernel(units * inner, a.add(o * inner), pattern.as_ptr(), c.add(o * inner));
        o += units;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arith::{add_portable, sub_portable, ArithKernels};

    fn naive(outer: usize, inner: usize, a: &[i16], b: &[i16]) -> Vec<i16> {
        (0..outer * inner).map(|k| a[k].saturating_sub(b[k % inner])).collect()
    }

    #[test]
    fn test_matches_unit_by_unit() {
        for (outer, inner, tile) in [(1, 5, 64), (7, 3, 64), (10, 1, 8), (3, 100, 64), (9, 6, 16), (4, 4, 0)] {
            let a: Vec<i16> = (0..outer * inner).map(|i| (i as i16).wrapping_mul(911)).collect();
            let b: Vec<i16> = (0..inner).map(|i| i16::MIN + (i as i16) * 7).collect();
            let mut c = vec![0i16; a.len()];
            unsafe {
                broadcast_rows(sub_portable::<i16>, outer, inner, a.as_ptr(), b.as_ptr(), c.as_mut_ptr(), tile)
            };
            assert_eq!(c, naive(outer, inner, &a, &b), "{outer}x{inner} tile {tile}");
        }
    }

    #[test]
    fn test_selected_kernel_in_place() {
        let (_, kernel) = u8::add_kernels().select(cpu_features::capabilities());
        let mut a: Vec<u8> = (0..90).map(|i| i as u8 * 2).collect();
        let b = [1u8, 2, 250];
        let expected: Vec<u8> = a.iter().enumerate().map(|(i, &x)| x.saturating_add(b[i % 3])).collect();
        let p = a.as_mut_ptr();
        unsafe { broadcast_rows(kernel, 30, 3, p, b.as_ptr(), p, 64) };
        assert_eq!(a, expected);
    }

    #[test]
    fn test_empty_is_noop() {
        let mut c = [9u32; 2];
        unsafe { broadcast_rows(add_portable::<u32>, 0, 2, c.as_ptr(), c.as_ptr(), c.as_mut_ptr(), 64) };
        assert_eq!(c, [9, 9]);
    }
}
