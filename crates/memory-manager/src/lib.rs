// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! # memory-manager
//!
//! Where container buffers come from.
//!
//! # Key Components
//!
//! - [`Allocator`]: the interface the dense containers are generic over:
//!   `allocate(layout)`, `deallocate(ptr, layout)`, typed array helpers
//!   and `rebind`.
//! - [`HeapAllocator`]: the global heap with SIMD alignment. The default
//!   allocator of every container.
//! - [`PoolAllocator`]: a budget-enforced pool that caches released
//!   blocks by size class and counts every allocation and release.
//! - [`MemoryBudget`]: a hard ceiling with human-readable parsing
//!   (`"512M"`, `"1G"`, etc.).
//! - [`AllocationStats`]: cumulative pool counters.
//!
//! # Ownership Model
//!
//! ```text
//! Matrix (owner)  ── allocate_array::<T>(n) ──►  Allocator
//!       │
//!       │  clear() / drop
//!       ▼
//! deallocate_array(ptr, n)   exactly once per owning buffer
//!
//! Matrix (view)   ── never calls the allocator
//! ```
//!
//! # Example
//! ```
//! use memory_manager::{Allocator, HeapAllocator, MemoryBudget, PoolAllocator};
//!
//! let heap = HeapAllocator;
//! let p = heap.allocate_array::<u16>(8).unwrap();
//! unsafe { heap.deallocate_array(p, 8) };
//!
//! let pool = PoolAllocator::new(MemoryBudget::parse("64K").unwrap());
//! let q = pool.allocate_array::<u8>(1000).unwrap();
//! unsafe { pool.deallocate_array(q, 1000) };
//! assert_eq!(pool.stats().live_allocations(), 0);
//! ```

mod allocator;
mod budget;
mod error;
pub mod pool;
mod stats;

pub use allocator::{array_layout, Allocator, HeapAllocator, SIMD_ALIGNMENT};
pub use budget::MemoryBudget;
pub use error::MemoryError;
pub use pool::PoolAllocator;
pub use stats::AllocationStats;
