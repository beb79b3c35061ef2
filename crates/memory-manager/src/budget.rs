// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Memory budget for the pool allocator.

use crate::MemoryError;
use std::fmt;

const KB: usize = 1024;
const MB: usize = 1024 * KB;
const GB: usize = 1024 * MB;

/// Recognised suffixes, longest first so `"MB"` wins over `"B"`.
const SUFFIXES: [(&str, usize); 7] = [
    ("GB", GB),
    ("MB", MB),
    ("KB", KB),
    ("G", GB),
    ("M", MB),
    ("K", KB),
    ("B", 1),
];

/// A hard ceiling on the live bytes of a [`crate::PoolAllocator`].
///
/// # Parsing
/// `"512M"`/`"512MB"`, `"1G"`/`"1GB"`, `"64K"`/`"64KB"`, `"100B"` or a plain
/// byte count. Suffixes are case-insensitive and binary (1K = 1024).
///
/// # Examples
/// ```
/// use memory_manager::MemoryBudget;
///
/// assert_eq!(MemoryBudget::parse("64k").unwrap().as_bytes(), 64 * 1024);
/// assert_eq!(MemoryBudget::from_mb(2).to_string(), "2 MB");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct MemoryBudget {
    bytes: usize,
}

impl MemoryBudget {
    /// Creates a budget from a byte count.
    pub fn from_bytes(bytes: usize) -> Self {
        Self { bytes }
    }

    /// Creates a budget from mebibytes.
    pub fn from_mb(mb: usize) -> Self {
        Self::from_bytes(mb.saturating_mul(MB))
    }

    /// A budget no allocation can exceed.
    pub fn unlimited() -> Self {
        Self::from_bytes(usize::MAX)
    }

    /// Returns the budget in bytes.
    pub fn as_bytes(&self) -> usize {
        self.bytes
    }

    /// Parses a human-readable budget string.
    ///
    /// # Errors
    /// [`MemoryError::InvalidBudget`] for malformed, overflowing or zero
    /// budgets.
    pub fn parse(s: &str) -> Result<Self, MemoryError> {
        let trimmed = s.trim();
        let upper = trimmed.to_ascii_uppercase();

        let (digits, multiplier) = SUFFIXES
            .iter()
            .find_map(|&(suffix, mult)| {
                upper
                    .strip_suffix(suffix)
                    .map(|rest| (&trimmed[..rest.len()], mult))
            })
            .unwrap_or((trimmed, 1));

        let value: usize = digits.trim().parse().map_err(|_| {
            MemoryError::InvalidBudget(format!(
                "'{trimmed}' is not a number with an optional K/M/G suffix"
            ))
        })?;
        let bytes = value
            .checked_mul(multiplier)
            .ok_or_else(|| MemoryError::InvalidBudget(format!("'{trimmed}' overflows")))?;
        if bytes == 0 {
            return Err(MemoryError::InvalidBudget("budget must be non-zero".into()));
        }
        Ok(Self { bytes })
    }
}

impl fmt::Display for MemoryBudget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.bytes {
            b if b >= GB && b % GB == 0 => write!(f, "{} GB", b / GB),
            b if b >= MB && b % MB == 0 => write!(f, "{} MB", b / MB),
            b if b >= KB && b % KB == 0 => write!(f, "{} KB", b / KB),
            b => write!(f, "{b} B"),
        }
    }
}
