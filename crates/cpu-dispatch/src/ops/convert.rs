// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Element type conversion between containers of equal rank and size.

use crate::ops::{ensure_initialized, ensure_same_rank, ensure_same_size};
use crate::Dispatcher;
use simd_kernels::{FloatLane, ScaleKernels, WidenKernels};
use tensor_core::{Dense, Numeric, TensorError};

fn check_pair<A: Dense, C: Dense>(op: &'static str, a: &A, c: &C) -> Result<(), TensorError> {
    ensure_initialized(op, a)?;
    ensure_initialized(op, c)?;
    ensure_same_rank(op, a, c)?;
    ensure_same_size(op, a, c)
}

impl Dispatcher {
    /// Exact integer widening, e.g. `u8` to `i32`.
    pub fn convert<'c, S, D, A, C>(&self, a: &A, c: &'c mut C) -> Result<&'c mut C, TensorError>
    where
        S: WidenKernels<D>,
        D: Numeric,
        A: Dense<Elem = S>,
        C: Dense<Elem = D>,
    {
        const OP: &str = "cpu_convert";
        check_pair(OP, a, c)?;

        let kernel = self.select(OP, &S::widen_kernels());
        // SAFETY: both buffers hold `a.size()` elements.
        unsafe { kernel(a.size(), a.as_slice().as_ptr(), c.as_mut_slice().as_mut_ptr()) };
        Ok(c)
    }

    /// Conversion to `f32` or `f64`.
    pub fn convert_float<'c, S, F, A, C>(&self, a: &A, c: &'c mut C) -> Result<&'c mut C, TensorError>
    where
        S: ScaleKernels<F>,
        F: FloatLane,
        A: Dense<Elem = S>,
        C: Dense<Elem = F>,
    {
        self.scale_into("cpu_convert_float", a, F::from_lane(1u8), c)
    }

    /// Conversion to `f32` or `f64` followed by a multiply: `c[i] = F(a[i]) * scale`.
    pub fn convert_scale<'c, S, F, A, C>(
        &self,
        a: &A,
        scale: F,
        c: &'c mut C,
    ) -> Result<&'c mut C, TensorError>
    where
        S: ScaleKernels<F>,
        F: FloatLane,
        A: Dense<Elem = S>,
        C: Dense<Elem = F>,
    {
        self.scale_into("cpu_convert_scale", a, scale, c)
    }

    fn scale_into<'c, S, F, A, C>(
        &self,
        op: &'static str,
        a: &A,
        scale: F,
        c: &'c mut C,
    ) -> Result<&'c mut C, TensorError>
    where
        S: ScaleKernels<F>,
        F: FloatLane,
        A: Dense<Elem = S>,
        C: Dense<Elem = F>,
    {
        check_pair(op, a, c)?;

        let kernel = self.select(op, &S::scale_kernels());
        // SAFETY: both buffers hold `a.size()` elements.
        unsafe { kernel(a.size(), a.as_slice().as_ptr(), c.as_mut_slice().as_mut_ptr(), scale) };
        Ok(c)
    }
}

/// [`Dispatcher::convert`] on the global dispatcher.
pub fn cpu_convert<'c, S, D, A, C>(a: &A, c: &'c mut C) -> Result<&'c mut C, TensorError>
where
    S: WidenKernels<D>,
    D: Numeric,
    A: Dense<Elem = S>,
    C: Dense<Elem = D>,
{
    Dispatcher::global().convert(a, c)
}

/// [`Dispatcher::convert_float`] on the global dispatcher.
pub fn cpu_convert_float<'c, S, F, A, C>(a: &A, c: &'c mut C) -> Result<&'c mut C, TensorError>
where
    S: ScaleKernels<F>,
    F: FloatLane,
    A: Dense<Elem = S>,
    C: Dense<Elem = F>,
{
    Dispatcher::global().convert_float(a, c)
}

/// [`Dispatcher::convert_scale`] on the global dispatcher.
pub fn cpu_convert_scale<'c, S, F, A, C>(a: &A, scale: F, c: &'c mut C) -> Result<&'c mut C, TensorError>
where
    S: ScaleKernels<F>,
    F: FloatLane,
    A: Dense<Elem = S>,
    C: Dense<Elem = F>,
{
    Dispatcher::global().convert_scale(a, scale, c)
}
