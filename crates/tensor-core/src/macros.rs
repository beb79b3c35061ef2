// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Members every container shares.
//!
//! Each container is a [`crate::storage::Storage`] plus a handful of extent
//! fields. `dense_common!` generates the rank-independent part (empty
//! construction, buffer access, `clear`, `swap`, flat fills, deep clone,
//! equality, `Debug` and the [`crate::Dense`] impl); `dense_assign!`
//! generates the extent-taking constructors and the assign/reassign family.
//! Rank-specific members live in each container's module.

macro_rules! dense_common {
    ($name:ident, rank = $rank:expr, fields = [$($field:ident),+]) => {
        impl<'a, T: Element, A: Allocator + Default> $name<'a, T, A> {
            /// Creates an empty container with the default allocator.
            pub fn new() -> Self {
                Self::new_in(A::default())
            }
        }

        impl<'a, T: Element, A: Allocator> $name<'a, T, A> {
            /// Creates an empty container that will allocate from `alloc`.
            pub fn new_in(alloc: A) -> Self {
                Self {
                    storage: Storage::empty(alloc),
                    $($field: 0,)+
                }
            }

            #[allow(dead_code)]
            pub(crate) fn from_parts(storage: Storage<'a, T, A>, $($field: usize),+) -> Self {
                Self { storage, $($field),+ }
            }

            /// Total number of elements (0 when empty).
            pub fn size(&self) -> usize {
                self.storage.len()
            }

            /// Returns `true` if the container holds no buffer.
            pub fn is_empty(&self) -> bool {
                self.storage.is_empty()
            }

            /// Returns `true` if this container owns (and will release) its buffer.
            pub fn is_owner(&self) -> bool {
                self.storage.is_owner()
            }

            /// The allocator this container allocates from.
            pub fn allocator(&self) -> &A {
                self.storage.allocator()
            }

            /// The elements, row-major.
            pub fn as_slice(&self) -> &[T] {
                self.storage.as_slice()
            }

            /// The elements, row-major, mutably.
            pub fn as_mut_slice(&mut self) -> &mut [T] {
                self.storage.as_mut_slice()
            }

            /// Raw pointer to the first element.
            pub fn as_ptr(&self) -> *const T {
                self.storage.as_slice().as_ptr()
            }

            /// Raw mutable pointer to the first element.
            pub fn as_mut_ptr(&mut self) -> *mut T {
                self.storage.as_mut_slice().as_mut_ptr()
            }

            /// Releases the buffer (if owned) and zeroes the shape.
            /// Idempotent.
            pub fn clear(&mut self) {
                self.storage.release();
                $(self.$field = 0;)+
            }

            /// Exchanges buffers and shapes with `other`.
            pub fn swap(&mut self, other: &mut Self) {
                std::mem::swap(self, other);
            }

            /// Sets every element to `value`.
            ///
            /// # Errors
            /// [`TensorError::NotInitialized`] if the container is empty.
            pub fn fill(&mut self, value: T) -> Result<(), TensorError> {
                check::ensure_initialized(concat!(stringify!($name), "::fill"), self.size())?;
                self.storage.as_mut_slice().fill(value);
                Ok(())
            }

            /// Copies `values` into the buffer; lengths must match.
            ///
            /// # Errors
            /// [`TensorError::NotInitialized`] if the container or `values`
            /// is empty, [`TensorError::InvalidSize`] on a length mismatch.
            pub fn fill_slice(&mut self, values: &[T]) -> Result<(), TensorError> {
                const OP: &str = concat!(stringify!($name), "::fill_slice");
                check::ensure_initialized(OP, self.size())?;
                check::ensure_initialized(OP, values.len())?;
                check::ensure_len(OP, self.size(), values.len())?;
                self.storage.as_mut_slice().copy_from_slice(values);
                Ok(())
            }

            /// Allocates an owning deep copy with the same allocator.
            ///
            /// Copying an empty container yields an empty container.
            pub fn try_clone<'b>(&self) -> Result<$name<'b, T, A>, TensorError> {
                if self.is_empty() {
                    return Ok($name::new_in(self.allocator().clone()));
                }
                Ok($name {
                    storage: self.storage.try_clone()?,
                    $($field: self.$field,)+
                })
            }
        }

        impl<'a, T: Element, A: Allocator + Default> Default for $name<'a, T, A> {
            fn default() -> Self {
                Self::new()
            }
        }

        impl<'a, 'b, T: Element, A: Allocator, B: Allocator> PartialEq<$name<'b, T, B>>
            for $name<'a, T, A>
        {
            /// Equal shapes and contents; ownership and allocator are ignored.
            fn eq(&self, other: &$name<'b, T, B>) -> bool {
                $(self.$field == other.$field &&)+ self.as_slice() == other.as_slice()
            }
        }

        impl<'a, T: Element, A: Allocator> std::fmt::Debug for $name<'a, T, A> {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.debug_struct(stringify!($name))
                    $(.field(stringify!($field), &self.$field))+
                    .field("owner", &self.is_owner())
                    .field("allocator", self.allocator())
                    .finish()
            }
        }

        impl<'a, T: Element, A: Allocator> Dense for $name<'a, T, A> {
            type Elem = T;
            const RANK: usize = $rank;

            fn shape(&self) -> Shape {
                $name::shape(self)
            }

            fn size(&self) -> usize {
                self.storage.len()
            }

            fn dimension(&self) -> usize {
                $name::dimension(self)
            }

            fn unit_size(&self, rank: usize) -> Option<usize> {
                $name::unit_size(self, rank)
            }

            fn as_slice(&self) -> &[T] {
                self.storage.as_slice()
            }

            fn as_mut_slice(&mut self) -> &mut [T] {
                self.storage.as_mut_slice()
            }
        }
    };
}

/// Constructors and (re)assignment, parameterised by the extent fields.
///
/// Every extent-taking member accepts the fields in declaration order, so
/// `Matrix::assign(rows, columns, dimension)` and `Vector::assign(length,
/// dimension)` share one body.
macro_rules! dense_assign {
    ($name:ident, fields = [$($field:ident),+]) => {
        impl<'a, T: Element, A: Allocator + Default> $name<'a, T, A> {
            /// Allocates a default-valued container of the given extents.
            pub fn with_shape($($field: usize),+) -> Result<Self, TensorError> {
                Self::with_shape_in($($field,)+ A::default())
            }

            /// Allocates a container of the given extents set to `value`.
            pub fn filled($($field: usize,)+ value: T) -> Result<Self, TensorError> {
                let mut c = Self::new();
                c.assign_value($($field,)+ value)?;
                Ok(c)
            }

            /// Allocates a container of the given extents holding a copy of
            /// `data`.
            pub fn from_slice($($field: usize,)+ data: &[T]) -> Result<Self, TensorError> {
                let mut c = Self::new();
                c.assign_slice($($field,)+ data)?;
                Ok(c)
            }
        }

        impl<'a, T: Element, A: Allocator> $name<'a, T, A> {
            /// Allocates a default-valued container of the given extents
            /// from `alloc`.
            pub fn with_shape_in($($field: usize,)+ alloc: A) -> Result<Self, TensorError> {
                let mut c = Self::new_in(alloc);
                c.assign($($field),+)?;
                Ok(c)
            }

            fn assign_with(
                &mut self,
                op: &'static str,
                $($field: usize,)+
                init: impl FnMut(usize) -> T,
            ) -> Result<(), TensorError> {
                check::ensure_uninitialized(op, self.size())?;
                let len = check::shape_product(op, &[$($field),+])?;
                self.storage = Storage::with_fn(self.allocator().clone(), len, init)?;
                $(self.$field = $field;)+
                Ok(())
            }

            /// Allocates default-valued elements for the given extents.
            ///
            /// # Errors
            /// [`TensorError::AlreadyInitialized`] if the container already
            /// holds data (use `reassign`), [`TensorError::InvalidSize`] if
            /// any extent is zero.
            pub fn assign(&mut self, $($field: usize),+) -> Result<(), TensorError> {
                self.assign_with(concat!(stringify!($name), "::assign"), $($field,)+ |_| T::default())
            }

            /// Allocates elements set to `value`.
            pub fn assign_value(&mut self, $($field: usize,)+ value: T) -> Result<(), TensorError> {
                self.assign_with(concat!(stringify!($name), "::assign_value"), $($field,)+ |_| value)
            }

            /// Allocates elements copied from `data`, whose length must
            /// equal the product of the extents.
            pub fn assign_slice(&mut self, $($field: usize,)+ data: &[T]) -> Result<(), TensorError> {
                const OP: &str = concat!(stringify!($name), "::assign_slice");
                check::ensure_uninitialized(OP, self.size())?;
                let len = check::shape_product(OP, &[$($field),+])?;
                check::ensure_len(OP, len, data.len())?;
                self.assign_with(OP, $($field,)+ |i| data[i])
            }

            /// Allocates elements taken from `iter`, which must yield
            /// exactly as many items as the extents describe.
            pub fn assign_iter(
                &mut self,
                $($field: usize,)+
                iter: impl IntoIterator<Item = T>,
            ) -> Result<(), TensorError> {
                const OP: &str = concat!(stringify!($name), "::assign_iter");
                check::ensure_uninitialized(OP, self.size())?;
                let len = check::shape_product(OP, &[$($field),+])?;
                self.storage = Storage::from_iter_exact(self.allocator().clone(), len, iter, OP)?;
                $(self.$field = $field;)+
                Ok(())
            }

            /// Initialises an empty container with `other`'s shape.
            ///
            /// # Errors
            /// [`TensorError::InvalidCopyMode`] for
            /// [`CopyMode::ShallowCopy`], which needs a mutable source (see
            /// `assign_from_mut`); [`TensorError::NotInitialized`] if `other`
            /// is empty.
            pub fn assign_from<B: Allocator>(
                &mut self,
                other: &$name<'_, T, B>,
                mode: CopyMode,
            ) -> Result<(), TensorError> {
                const OP: &str = concat!(stringify!($name), "::assign_from");
                check::ensure_uninitialized(OP, self.size())?;
                check::ensure_initialized(OP, other.size())?;
                let src = other.as_slice();
                match mode {
                    CopyMode::ShallowCopy => Err(TensorError::InvalidCopyMode { op: OP }),
                    CopyMode::WithoutCopy => {
                        self.assign_with(OP, $(other.$field,)+ |_| T::default())
                    }
                    CopyMode::DeepCopy => self.assign_with(OP, $(other.$field,)+ |i| src[i]),
                }
            }

            /// Like `assign_from`, but a shallow copy turns `self` into a
            /// view of `other`'s buffer for as long as `other` stays
            /// borrowed.
            pub fn assign_from_mut(
                &mut self,
                other: &'a mut $name<'_, T, A>,
                mode: CopyMode,
            ) -> Result<(), TensorError> {
                const OP: &str = concat!(stringify!($name), "::assign_from_mut");
                if mode != CopyMode::ShallowCopy {
                    return self.assign_from(other, mode);
                }
                check::ensure_uninitialized(OP, self.size())?;
                check::ensure_initialized(OP, other.size())?;
                let len = other.size();
                let ptr = other.storage.ptr_at_mut(0);
                // SAFETY: `other` stays mutably borrowed for `'a`.
                self.storage = unsafe { Storage::view(ptr, len, other.allocator().clone()) };
                $(self.$field = other.$field;)+
                Ok(())
            }

            fn reassign_with(
                &mut self,
                op: &'static str,
                $($field: usize,)+
                init: impl FnMut(usize) -> T,
            ) -> Result<(), TensorError> {
                let len = check::shape_product(op, &[$($field),+])?;
                self.storage.refill(len, init)?;
                $(self.$field = $field;)+
                Ok(())
            }

            /// Re-initialises with default-valued elements, reusing the
            /// buffer when the element count is unchanged.
            pub fn reassign(&mut self, $($field: usize),+) -> Result<(), TensorError> {
                self.reassign_with(concat!(stringify!($name), "::reassign"), $($field,)+ |_| T::default())
            }

            pub fn reassign_value(&mut self, $($field: usize,)+ value: T) -> Result<(), TensorError> {
                self.reassign_with(concat!(stringify!($name), "::reassign_value"), $($field,)+ |_| value)
            }

            pub fn reassign_slice(&mut self, $($field: usize,)+ data: &[T]) -> Result<(), TensorError> {
                const OP: &str = concat!(stringify!($name), "::reassign_slice");
                let len = check::shape_product(OP, &[$($field),+])?;
                check::ensure_len(OP, len, data.len())?;
                self.reassign_with(OP, $($field,)+ |i| data[i])
            }

            pub fn reassign_iter(
                &mut self,
                $($field: usize,)+
                iter: impl IntoIterator<Item = T>,
            ) -> Result<(), TensorError> {
                const OP: &str = concat!(stringify!($name), "::reassign_iter");
                let data: Vec<T> = iter.into_iter().collect();
                let len = check::shape_product(OP, &[$($field),+])?;
                check::ensure_len(OP, len, data.len())?;
                self.reassign_with(OP, $($field,)+ |i| data[i])
            }

            /// Changes the extents without touching the data; the element
            /// count must stay the same.
            pub fn reshape(&mut self, $($field: usize),+) -> Result<(), TensorError> {
                const OP: &str = concat!(stringify!($name), "::reshape");
                check::ensure_initialized(OP, self.size())?;
                let len = check::shape_product(OP, &[$($field),+])?;
                check::ensure_len(OP, self.size(), len)?;
                $(self.$field = $field;)+
                Ok(())
            }

            /// Copies `other` into this container; element counts must match.
            pub fn fill_from<B: Allocator>(
                &mut self,
                other: &$name<'_, T, B>,
            ) -> Result<(), TensorError> {
                const OP: &str = concat!(stringify!($name), "::fill_from");
                check::ensure_initialized(OP, self.size())?;
                check::ensure_initialized(OP, other.size())?;
                check::ensure_len(OP, self.size(), other.size())?;
                self.storage.as_mut_slice().copy_from_slice(other.as_slice());
                Ok(())
            }
        }
    };
}

pub(crate) use dense_assign;
pub(crate) use dense_common;
