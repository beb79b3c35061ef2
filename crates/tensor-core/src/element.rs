// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Element types a container can hold.

use std::fmt;

/// A plain value type that can live in a container buffer.
///
/// Containers never run destructors on elements and initialise fresh
/// storage with `T::default()`.
pub trait Element: Copy + Default + PartialEq + fmt::Debug + Send + Sync + 'static {}

macro_rules! impl_element {
    ($($t:ty),*) => {
        $(impl Element for $t {})*
    };
}

impl_element!(i8, u8, i16, u16, i32, u32, i64, u64, usize, f32, f64);

/// One of the eight numeric element types the kernels are specialised for.
pub trait Numeric: Element + PartialOrd {
    /// Runtime tag of this type.
    const TYPE: ElementType;
    /// Smallest representable value (most negative finite for floats).
    const MIN: Self;
    /// Largest representable value (largest finite for floats).
    const MAX: Self;
}

/// Runtime tag for the numeric element types.
///
/// The dispatch layer uses `ElementType` in log records and errors; the
/// kernels themselves are selected statically through [`Numeric`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    I8,
    U8,
    I16,
    U16,
    I32,
    U32,
    F32,
    F64,
}

impl ElementType {
    /// All tags, narrowest integers first.
    pub const ALL: [ElementType; 8] = [
        ElementType::I8,
        ElementType::U8,
        ElementType::I16,
        ElementType::U16,
        ElementType::I32,
        ElementType::U32,
        ElementType::F32,
        ElementType::F64,
    ];

    /// Returns the size of a single element in bytes.
    pub fn size_bytes(self) -> usize {
        match self {
            ElementType::I8 | ElementType::U8 => 1,
            ElementType::I16 | ElementType::U16 => 2,
            ElementType::I32 | ElementType::U32 | ElementType::F32 => 4,
            ElementType::F64 => 8,
        }
    }

    /// Returns a human-readable label for this element type.
    pub fn as_str(self) -> &'static str {
        match self {
            ElementType::I8 => "i8",
            ElementType::U8 => "u8",
            ElementType::I16 => "i16",
            ElementType::U16 => "u16",
            ElementType::I32 => "i32",
            ElementType::U32 => "u32",
            ElementType::F32 => "f32",
            ElementType::F64 => "f64",
        }
    }

    /// Returns `true` for `f32` and `f64`.
    pub fn is_float(self) -> bool {
        matches!(self, ElementType::F32 | ElementType::F64)
    }

    /// Returns `true` for types with a sign (floats included).
    pub fn is_signed(self) -> bool {
        !matches!(self, ElementType::U8 | ElementType::U16 | ElementType::U32)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

macro_rules! impl_numeric {
    ($($t:ty => $tag:ident),*) => {
        $(impl Numeric for $t {
            const TYPE: ElementType = ElementType::$tag;
            const MIN: Self = <$t>::MIN;
            const MAX: Self = <$t>::MAX;
        })*
    };
}

impl_numeric!(
    i8 => I8, u8 => U8, i16 => I16, u16 => U16,
    i32 => I32, u32 => U32, f32 => F32, f64 => F64
);
