// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Saturating arithmetic and bitwise logic over containers.
//!
//! Each binary operation comes in six forms:
//!
//! | Form | Effect | Operands |
//! |------|--------|----------|
//! | `op` | `c = a OP b` | same rank, same size |
//! | `op_assign` | `c = c OP b` | same rank, same size |
//! | `op_value` | `c = a OP b` | constant `a`, `b` and `c` of equal size |
//! | `op_value_assign` | `c = a OP c` | constant `a` |
//! | `op_broadcast` | `c = a OP b` | `b` repeated over `a`'s units of `b`'s rank |
//! | `op_broadcast_assign` | `c = c OP b` | as above, in place |

use crate::ops::{broadcast_unit, ensure_initialized, ensure_same_rank, ensure_same_size};
use crate::Dispatcher;
use simd_kernels::{
    broadcast_rows, ArithKernels, BinaryFn, BitwiseKernels, KernelTable, UnaryFn, ValueFn,
};
use tensor_core::{Dense, Element, TensorError};

impl Dispatcher {
    fn run_binary<T, A, B, C>(
        &self,
        op: &'static str,
        table: KernelTable<BinaryFn<T>>,
        a: &A,
        b: &B,
        c: &mut C,
    ) -> Result<(), TensorError>
    where
        T: Element,
        A: Dense<Elem = T>,
        B: Dense<Elem = T>,
        C: Dense<Elem = T>,
    {
        ensure_initialized(op, a)?;
        ensure_initialized(op, b)?;
        ensure_initialized(op, c)?;
        ensure_same_rank(op, a, b)?;
        ensure_same_rank(op, a, c)?;
        ensure_same_size(op, a, b)?;
        ensure_same_size(op, a, c)?;

        let kernel = self.select(op, &table);
        // SAFETY: all three buffers hold `a.size()` elements.
        unsafe {
            kernel(
                a.size(),
                a.as_slice().as_ptr(),
                b.as_slice().as_ptr(),
                c.as_mut_slice().as_mut_ptr(),
            )
        };
        Ok(())
    }

    fn run_binary_assign<T, B, C>(
        &self,
        op: &'static str,
        table: KernelTable<BinaryFn<T>>,
        c: &mut C,
        b: &B,
    ) -> Result<(), TensorError>
    where
        T: Element,
        B: Dense<Elem = T>,
        C: Dense<Elem = T>,
    {
        ensure_initialized(op, c)?;
        ensure_initialized(op, b)?;
        ensure_same_rank(op, c, b)?;
        ensure_same_size(op, c, b)?;

        let kernel = self.select(op, &table);
        let n = c.size();
        let out = c.as_mut_slice().as_mut_ptr();
        // SAFETY: both buffers hold `n` elements; kernels allow `c == a`.
        unsafe { kernel(n, out, b.as_slice().as_ptr(), out) };
        Ok(())
    }

    fn run_value<T, B, C>(
        &self,
        op: &'static str,
        table: KernelTable<ValueFn<T>>,
        a: T,
        b: &B,
        c: &mut C,
    ) -> Result<(), TensorError>
    where
        T: Element,
        B: Dense<Elem = T>,
        C: Dense<Elem = T>,
    {
        ensure_initialized(op, b)?;
        ensure_initialized(op, c)?;
        ensure_same_size(op, b, c)?;

        let kernel = self.select(op, &table);
        // SAFETY: `b` and `c` hold `b.size()` elements.
        unsafe { kernel(b.size(), a, b.as_slice().as_ptr(), c.as_mut_slice().as_mut_ptr()) };
        Ok(())
    }

    fn run_value_assign<T, C>(
        &self,
        op: &'static str,
        table: KernelTable<ValueFn<T>>,
        a: T,
        c: &mut C,
    ) -> Result<(), TensorError>
    where
        T: Element,
        C: Dense<Elem = T>,
    {
        ensure_initialized(op, c)?;

        let kernel = self.select(op, &table);
        let n = c.size();
        let out = c.as_mut_slice().as_mut_ptr();
        // SAFETY: `n` elements, in place.
        unsafe { kernel(n, a, out, out) };
        Ok(())
    }

    fn run_broadcast<T, A, B, C>(
        &self,
        op: &'static str,
        table: KernelTable<BinaryFn<T>>,
        a: &A,
        b: &B,
        c: &mut C,
    ) -> Result<(), TensorError>
    where
        T: Element,
        A: Dense<Elem = T>,
        B: Dense<Elem = T>,
        C: Dense<Elem = T>,
    {
        ensure_initialized(op, a)?;
        ensure_initialized(op, b)?;
        ensure_initialized(op, c)?;
        let unit = broadcast_unit(op, a, b)?;
        ensure_same_rank(op, a, c)?;
        ensure_same_size(op, a, c)?;

        let kernel = self.select(op, &table);
        // SAFETY: `a` and `c` hold `a.size()` elements, a whole number of
        // `unit`s; `b` holds exactly one unit.
        unsafe {
            broadcast_rows(
                kernel,
                a.size() / unit,
                unit,
                a.as_slice().as_ptr(),
                b.as_slice().as_ptr(),
                c.as_mut_slice().as_mut_ptr(),
                self.broadcast_tile(),
            )
        };
        Ok(())
    }

    fn run_broadcast_assign<T, B, C>(
        &self,
        op: &'static str,
        table: KernelTable<BinaryFn<T>>,
        c: &mut C,
        b: &B,
    ) -> Result<(), TensorError>
    where
        T: Element,
        B: Dense<Elem = T>,
        C: Dense<Elem = T>,
    {
        ensure_initialized(op, c)?;
        ensure_initialized(op, b)?;
        let unit = broadcast_unit(op, c, b)?;

        let kernel = self.select(op, &table);
        let n = c.size();
        let out = c.as_mut_slice().as_mut_ptr();
        // SAFETY: as `run_broadcast`, in place.
        unsafe {
            broadcast_rows(
                kernel,
                n / unit,
                unit,
                out,
                b.as_slice().as_ptr(),
                out,
                self.broadcast_tile(),
            )
        };
        Ok(())
    }
}

macro_rules! binary_family {
    (
        $bound:ident, $what:literal,
        $table:ident, $value_table:ident,
        $op:ident / $cpu_op:ident,
        $assign:ident / $cpu_assign:ident,
        $value:ident / $cpu_value:ident,
        $value_assign:ident / $cpu_value_assign:ident,
        $broadcast:ident / $cpu_broadcast:ident,
        $broadcast_assign:ident / $cpu_broadcast_assign:ident $(,)?
    ) => {
        impl Dispatcher {
            #[doc = concat!("Elementwise ", $what, ": `c[i] = a[i] OP b[i]`.")]
            pub fn $op<'c, T, A, B, C>(&self, a: &A, b: &B, c: &'c mut C) -> Result<&'c mut C, TensorError>
            where
                T: $bound,
                A: Dense<Elem = T>,
                B: Dense<Elem = T>,
                C: Dense<Elem = T>,
            {
                self.run_binary(stringify!($cpu_op), T::$table(), a, b, c)?;
                Ok(c)
            }

            #[doc = concat!("In-place ", $what, ": `c[i] = c[i] OP b[i]`.")]
            pub fn $assign<'c, T, B, C>(&self, c: &'c mut C, b: &B) -> Result<&'c mut C, TensorError>
            where
                T: $bound,
                B: Dense<Elem = T>,
                C: Dense<Elem = T>,
            {
                self.run_binary_assign(stringify!($cpu_assign), T::$table(), c, b)?;
                Ok(c)
            }

            #[doc = concat!("Elementwise ", $what, " with a constant left operand: `c[i] = a OP b[i]`.")]
            pub fn $value<'c, T, B, C>(&self, a: T, b: &B, c: &'c mut C) -> Result<&'c mut C, TensorError>
            where
                T: $bound,
                B: Dense<Elem = T>,
                C: Dense<Elem = T>,
            {
                self.run_value(stringify!($cpu_value), T::$value_table(), a, b, c)?;
                Ok(c)
            }

            #[doc = concat!("In-place ", $what, " with a constant left operand: `c[i] = a OP c[i]`.")]
            pub fn $value_assign<'c, T, C>(&self, a: T, c: &'c mut C) -> Result<&'c mut C, TensorError>
            where
                T: $bound,
                C: Dense<Elem = T>,
            {
                self.run_value_assign(stringify!($cpu_value_assign), T::$value_table(), a, c)?;
                Ok(c)
            }

            #[doc = concat!(
                "Broadcast ", $what, ": `b` is applied to every sub-container of `a` ",
                "with `b`'s rank (pixel, row or plane)."
            )]
            pub fn $broadcast<'c, T, A, B, C>(&self, a: &A, b: &B, c: &'c mut C) -> Result<&'c mut C, TensorError>
            where
                T: $bound,
                A: Dense<Elem = T>,
                B: Dense<Elem = T>,
                C: Dense<Elem = T>,
            {
                self.run_broadcast(stringify!($cpu_broadcast), T::$table(), a, b, c)?;
                Ok(c)
            }

            #[doc = concat!("In-place broadcast ", $what, ".")]
            pub fn $broadcast_assign<'c, T, B, C>(&self, c: &'c mut C, b: &B) -> Result<&'c mut C, TensorError>
            where
                T: $bound,
                B: Dense<Elem = T>,
                C: Dense<Elem = T>,
            {
                self.run_broadcast_assign(stringify!($cpu_broadcast_assign), T::$table(), c, b)?;
                Ok(c)
            }
        }

        #[doc = concat!("[`Dispatcher::", stringify!($op), "`] on the global dispatcher.")]
        pub fn $cpu_op<'c, T, A, B, C>(a: &A, b: &B, c: &'c mut C) -> Result<&'c mut C, TensorError>
        where
            T: $bound,
            A: Dense<Elem = T>,
            B: Dense<Elem = T>,
            C: Dense<Elem = T>,
        {
            Dispatcher::global().$op(a, b, c)
        }

        #[doc = concat!("[`Dispatcher::", stringify!($assign), "`] on the global dispatcher.")]
        pub fn $cpu_assign<'c, T, B, C>(c: &'c mut C, b: &B) -> Result<&'c mut C, TensorError>
        where
            T: $bound,
            B: Dense<Elem = T>,
            C: Dense<Elem = T>,
        {
            Dispatcher::global().$assign(c, b)
        }

        #[doc = concat!("[`Dispatcher::", stringify!($value), "`] on the global dispatcher.")]
        pub fn $cpu_value<'c, T, B, C>(a: T, b: &B, c: &'c mut C) -> Result<&'c mut C, TensorError>
        where
            T: $bound,
            B: Dense<Elem = T>,
            C: Dense<Elem = T>,
        {
            Dispatcher::global().$value(a, b, c)
        }

        #[doc = concat!("[`Dispatcher::", stringify!($value_assign), "`] on the global dispatcher.")]
        pub fn $cpu_value_assign<'c, T, C>(a: T, c: &'c mut C) -> Result<&'c mut C, TensorError>
        where
            T: $bound,
            C: Dense<Elem = T>,
        {
            Dispatcher::global().$value_assign(a, c)
        }

        #[doc = concat!("[`Dispatcher::", stringify!($broadcast), "`] on the global dispatcher.")]
        pub fn $cpu_broadcast<'c, T, A, B, C>(a: &A, b: &B, c: &'c mut C) -> Result<&'c mut C, TensorError>
        where
            T: $bound,
            A: Dense<Elem = T>,
            B: Dense<Elem = T>,
            C: Dense<Elem = T>,
        {
            Dispatcher::global().$broadcast(a, b, c)
        }

        #[doc = concat!("[`Dispatcher::", stringify!($broadcast_assign), "`] on the global dispatcher.")]
        pub fn $cpu_broadcast_assign<'c, T, B, C>(c: &'c mut C, b: &B) -> Result<&'c mut C, TensorError>
        where
            T: $bound,
            B: Dense<Elem = T>,
            C: Dense<Elem = T>,
        {
            Dispatcher::global().$broadcast_assign(c, b)
        }
    };
}

binary_family!(
    ArithKernels, "saturating add", add_kernels, add_value_kernels,
    add / cpu_add,
    add_assign / cpu_add_assign,
    add_value / cpu_add_value,
    add_value_assign / cpu_add_value_assign,
    add_broadcast / cpu_add_broadcast,
    add_broadcast_assign / cpu_add_broadcast_assign,
);

binary_family!(
    ArithKernels, "saturating subtract", sub_kernels, sub_value_kernels,
    sub / cpu_sub,
    sub_assign / cpu_sub_assign,
    sub_value / cpu_sub_value,
    sub_value_assign / cpu_sub_value_assign,
    sub_broadcast / cpu_sub_broadcast,
    sub_broadcast_assign / cpu_sub_broadcast_assign,
);

binary_family!(
    BitwiseKernels, "bitwise and", and_kernels, and_value_kernels,
    and / cpu_and,
    and_assign / cpu_and_assign,
    and_value / cpu_and_value,
    and_value_assign / cpu_and_value_assign,
    and_broadcast / cpu_and_broadcast,
    and_broadcast_assign / cpu_and_broadcast_assign,
);

binary_family!(
    BitwiseKernels, "bitwise or", or_kernels, or_value_kernels,
    or / cpu_or,
    or_assign / cpu_or_assign,
    or_value / cpu_or_value,
    or_value_assign / cpu_or_value_assign,
    or_broadcast / cpu_or_broadcast,
    or_broadcast_assign / cpu_or_broadcast_assign,
);

binary_family!(
    BitwiseKernels, "bitwise xor", xor_kernels, xor_value_kernels,
    xor / cpu_xor,
    xor_assign / cpu_xor_assign,
    xor_value / cpu_xor_value,
    xor_value_assign / cpu_xor_value_assign,
    xor_broadcast / cpu_xor_broadcast,
    xor_broadcast_assign / cpu_xor_broadcast_assign,
);

impl Dispatcher {
    /// Bitwise complement: `c[i] = !a[i]` (on the raw bits for floats).
    pub fn not<'c, T, A, C>(&self, a: &A, c: &'c mut C) -> Result<&'c mut C, TensorError>
    where
        T: BitwiseKernels,
        A: Dense<Elem = T>,
        C: Dense<Elem = T>,
    {
        const OP: &str = "cpu_not";
        ensure_initialized(OP, a)?;
        ensure_initialized(OP, c)?;
        ensure_same_rank(OP, a, c)?;
        ensure_same_size(OP, a, c)?;

        let kernel: UnaryFn<T> = self.select(OP, &T::not_kernels());
        // SAFETY: both buffers hold `a.size()` elements.
        unsafe { kernel(a.size(), a.as_slice().as_ptr(), c.as_mut_slice().as_mut_ptr()) };
        Ok(c)
    }

    /// In-place bitwise complement.
    pub fn not_assign<'c, T, C>(&self, c: &'c mut C) -> Result<&'c mut C, TensorError>
    where
        T: BitwiseKernels,
        C: Dense<Elem = T>,
    {
        const OP: &str = "cpu_not_assign";
        ensure_initialized(OP, c)?;

        let kernel = self.select(OP, &T::not_kernels());
        let n = c.size();
        let out = c.as_mut_slice().as_mut_ptr();
        // SAFETY: `n` elements, in place.
        unsafe { kernel(n, out, out) };
        Ok(c)
    }
}

/// [`Dispatcher::not`] on the global dispatcher.
pub fn cpu_not<'c, T, A, C>(a: &A, c: &'c mut C) -> Result<&'c mut C, TensorError>
where
    T: BitwiseKernels,
    A: Dense<Elem = T>,
    C: Dense<Elem = T>,
{
    Dispatcher::global().not(a, c)
}

/// [`Dispatcher::not_assign`] on the global dispatcher.
pub fn cpu_not_assign<'c, T, C>(c: &'c mut C) -> Result<&'c mut C, TensorError>
where
    T: BitwiseKernels,
    C: Dense<Elem = T>,
{
    Dispatcher::global().not_assign(c)
}
