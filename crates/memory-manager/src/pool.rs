// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Arena-style pool allocator with budget enforcement.
//!
//! The [`PoolAllocator`] is an [`Allocator`] for workloads that repeatedly
//! create and drop containers of similar sizes. It:
//!
//! 1. Enforces a hard memory ceiling. Allocations that would exceed the
//!    budget return `Err(OutOfMemory)`.
//! 2. Keeps released blocks on a free list binned by size class, so the
//!    next allocation of that class skips the system allocator.
//! 3. Counts every allocation and release in [`AllocationStats`].
//!
//! # Sharing
//! Clones share one pool through an `Arc`. Containers hold a clone, which
//! keeps the pool (and its cached blocks) alive until the last container
//! is gone.
//!
//! # Size Classes
//! Blocks are rounded up to the next power of two, with a minimum of
//! [`MIN_SIZE_CLASS`] bytes, and aligned to [`BLOCK_ALIGNMENT`].

use crate::{Allocator, AllocationStats, MemoryBudget, MemoryError};
use std::alloc::Layout;
use std::collections::HashMap;
use std::fmt;
use std::ptr::NonNull;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Minimum size class in bytes. Anything smaller is rounded up.
pub const MIN_SIZE_CLASS: usize = 256;

/// Alignment of every pool block (one cache line).
pub const BLOCK_ALIGNMENT: usize = 64;

/// A cached block of `size_class` bytes.
struct Block(NonNull<u8>);

// SAFETY: a cached block is exclusively owned by the free list; the
// pointer is never dereferenced while cached.
unsafe impl Send for Block {}

/// State shared by every clone of a pool.
struct PoolInner {
    budget: MemoryBudget,
    /// Bytes handed out and not yet released (requested sizes).
    allocated_bytes: AtomicUsize,
    /// size_class → cached blocks.
    free_blocks: Mutex<HashMap<usize, Vec<Block>>>,
    /// Total bytes held in the free list.
    free_list_bytes: AtomicUsize,
    stats: Mutex<AllocationStats>,
}

impl PoolInner {
    fn release_cached(&self) {
        if let Ok(mut free) = self.free_blocks.lock() {
            for (size_class, blocks) in free.drain() {
                let layout = block_layout(size_class);
                for block in blocks {
                    // SAFETY: cached blocks were allocated with `block_layout(size_class)`.
                    unsafe { std::alloc::dealloc(block.0.as_ptr(), layout) };
                }
            }
            self.free_list_bytes.store(0, Ordering::Release);
        }
    }
}

impl Drop for PoolInner {
    fn drop(&mut self) {
        self.release_cached();
    }
}

/// A budgeted, caching allocator for container buffers.
///
/// # Example
/// ```
/// use memory_manager::{Allocator, MemoryBudget, PoolAllocator};
///
/// let pool = PoolAllocator::new(MemoryBudget::from_mb(1));
/// let block = pool.allocate_array::<f32>(256).unwrap();
/// assert_eq!(pool.allocated_bytes(), 1024);
///
/// unsafe { pool.deallocate_array(block, 256) };
/// assert_eq!(pool.allocated_bytes(), 0);
/// assert_eq!(pool.stats().total_deallocations, 1);
/// ```
#[derive(Clone)]
pub struct PoolAllocator {
    inner: Arc<PoolInner>,
}

impl PoolAllocator {
    /// Creates an empty pool with the given budget.
    pub fn new(budget: MemoryBudget) -> Self {
        Self {
            inner: Arc::new(PoolInner {
                budget,
                allocated_bytes: AtomicUsize::new(0),
                free_blocks: Mutex::new(HashMap::new()),
                free_list_bytes: AtomicUsize::new(0),
                stats: Mutex::new(AllocationStats::default()),
            }),
        }
    }

    /// Returns the number of bytes currently handed out.
    pub fn allocated_bytes(&self) -> usize {
        self.inner.allocated_bytes.load(Ordering::Acquire)
    }

    /// Returns the number of bytes remaining before hitting the budget.
    pub fn available_bytes(&self) -> usize {
        self.inner
            .budget
            .as_bytes()
            .saturating_sub(self.allocated_bytes())
    }

    /// Returns the memory budget.
    pub fn budget(&self) -> MemoryBudget {
        self.inner.budget
    }

    /// Returns a snapshot of allocation statistics.
    pub fn stats(&self) -> AllocationStats {
        self.inner
            .stats
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }

    /// Returns the number of bytes cached in the free list.
    pub fn free_list_bytes(&self) -> usize {
        self.inner.free_list_bytes.load(Ordering::Acquire)
    }

    /// Releases every cached block back to the system allocator.
    ///
    /// Live allocations are unaffected.
    pub fn shrink(&self) {
        self.inner.release_cached();
    }

    /// Returns `true` if both handles share the same pool.
    pub fn same_pool(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn take_cached(&self, size_class: usize) -> Option<NonNull<u8>> {
        let mut free = self.inner.free_blocks.lock().ok()?;
        let block = free.get_mut(&size_class)?.pop()?;
        self.inner
            .free_list_bytes
            .fetch_sub(size_class, Ordering::Release);
        Some(block.0)
    }
}

impl Allocator for PoolAllocator {
    fn allocate(&self, layout: Layout) -> Result<NonNull<u8>, MemoryError> {
        let size = layout.size();
        if size == 0 {
            return Err(MemoryError::ZeroSizedAllocation);
        }
        if layout.align() > BLOCK_ALIGNMENT {
            return Err(MemoryError::UnsupportedAlignment {
                align: layout.align(),
                max: BLOCK_ALIGNMENT,
            });
        }

        let current = self.allocated_bytes();
        let budget = self.inner.budget.as_bytes();
        if current.saturating_add(size) > budget {
            if let Ok(mut stats) = self.inner.stats.lock() {
                stats.record_oom();
            }
            tracing::warn!(
                requested = size,
                available = budget.saturating_sub(current),
                "pool budget exhausted"
            );
            return Err(MemoryError::OutOfMemory {
                requested_bytes: size,
                available_bytes: budget.saturating_sub(current),
                budget_bytes: budget,
            });
        }

        let size_class = size_class_for(size);
        let (ptr, is_hit) = match self.take_cached(size_class) {
            Some(ptr) => (ptr, true),
            None => {
                let block = block_layout(size_class);
                // SAFETY: size classes are never zero.
                let raw = unsafe { std::alloc::alloc(block) };
                let ptr = NonNull::new(raw).ok_or(MemoryError::AllocationFailed {
                    size: block.size(),
                    align: block.align(),
                })?;
                (ptr, false)
            }
        };

        let total = self.inner.allocated_bytes.fetch_add(size, Ordering::AcqRel) + size;
        if let Ok(mut stats) = self.inner.stats.lock() {
            stats.record_allocation(size, is_hit);
            stats.update_peak(total);
        }
        Ok(ptr)
    }

    unsafe fn deallocate(&self, ptr: NonNull<u8>, layout: Layout) {
        let size = layout.size();
        self.inner.allocated_bytes.fetch_sub(size, Ordering::AcqRel);
        if let Ok(mut stats) = self.inner.stats.lock() {
            stats.record_deallocation();
        }

        let size_class = size_class_for(size);
        match self.inner.free_blocks.lock() {
            Ok(mut free) => {
                free.entry(size_class).or_default().push(Block(ptr));
                self.inner
                    .free_list_bytes
                    .fetch_add(size_class, Ordering::Release);
            }
            // A poisoned free list cannot cache; hand the block back directly.
            Err(_) => std::alloc::dealloc(ptr.as_ptr(), block_layout(size_class)),
        }
    }
}

impl fmt::Debug for PoolAllocator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PoolAllocator")
            .field("budget", &self.inner.budget)
            .field("allocated_bytes", &self.allocated_bytes())
            .field("free_list_bytes", &self.free_list_bytes())
            .finish()
    }
}

/// Computes the size class for a given allocation size.
///
/// Returns the smallest power of 2 that is ≥ `size` and ≥ `MIN_SIZE_CLASS`.
fn size_class_for(size: usize) -> usize {
    size.max(MIN_SIZE_CLASS).next_power_of_two()
}

fn block_layout(size_class: usize) -> Layout {
    // Size classes are powers of two no smaller than the alignment, so
    // this layout is always valid.
    Layout::from_size_align(size_class, BLOCK_ALIGNMENT).unwrap_or_else(|_| Layout::new::<u8>())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allocate_and_release() {
        let pool = PoolAllocator::new(MemoryBudget::from_mb(1));

        let p = pool.allocate_array::<u8>(1024).unwrap();
        assert_eq!(pool.allocated_bytes(), 1024);

        unsafe { pool.deallocate_array(p, 1024) };
        assert_eq!(pool.allocated_bytes(), 0);
    }

    #[test]
    fn test_block_alignment() {
        let pool = PoolAllocator::new(MemoryBudget::from_mb(1));
        let p = pool.allocate_array::<f64>(3).unwrap();
        assert_eq!(p.as_ptr() as usize % BLOCK_ALIGNMENT, 0);
        unsafe { pool.deallocate_array(p, 3) };
    }

    #[test]
    fn test_oom() {
        let pool = PoolAllocator::new(MemoryBudget::from_bytes(1024));

        let a = pool.allocate_array::<u8>(512).unwrap();
        let b = pool.allocate_array::<u8>(512).unwrap();
        let result = pool.allocate_array::<u8>(1);
        assert!(matches!(result, Err(MemoryError::OutOfMemory { .. })));

        unsafe {
            pool.deallocate_array(a, 512);
            pool.deallocate_array(b, 512);
        }
    }

    #[test]
    fn test_zero_allocation() {
        let pool = PoolAllocator::new(MemoryBudget::from_mb(1));
        let result = pool.allocate_array::<u8>(0);
        assert!(matches!(result, Err(MemoryError::ZeroSizedAllocation)));
    }

    #[test]
    fn test_oversized_alignment() {
        let pool = PoolAllocator::new(MemoryBudget::from_mb(1));
        let layout = Layout::from_size_align(16, 4096).unwrap();
        assert!(matches!(
            pool.allocate(layout),
            Err(MemoryError::UnsupportedAlignment { align: 4096, .. })
        ));
    }

    #[test]
    fn test_free_list_reuse() {
        let pool = PoolAllocator::new(MemoryBudget::from_mb(1));

        let p = pool.allocate_array::<u32>(100).unwrap();
        unsafe { pool.deallocate_array(p, 100) };

        // Same size class: served from the free list.
        let q = pool.allocate_array::<u32>(90).unwrap();
        assert_eq!(p, q);

        let stats = pool.stats();
        assert_eq!(stats.cache_hits, 1);
        assert_eq!(stats.cache_misses, 1);
        unsafe { pool.deallocate_array(q, 90) };
    }

    #[test]
    fn test_shrink() {
        let pool = PoolAllocator::new(MemoryBudget::from_mb(1));

        let p = pool.allocate_array::<u8>(8192).unwrap();
        unsafe { pool.deallocate_array(p, 8192) };
        assert_eq!(pool.free_list_bytes(), 8192);

        pool.shrink();
        assert_eq!(pool.free_list_bytes(), 0);
    }

    #[test]
    fn test_clones_share_state() {
        let pool = PoolAllocator::new(MemoryBudget::from_mb(1));
        let other = pool.rebind();
        assert!(pool.same_pool(&other));

        let p = other.allocate_array::<u16>(10).unwrap();
        assert_eq!(pool.allocated_bytes(), 20);
        unsafe { pool.deallocate_array(p, 10) };
        assert_eq!(other.allocated_bytes(), 0);

        let fresh = PoolAllocator::new(MemoryBudget::from_mb(1));
        assert!(!pool.same_pool(&fresh));
    }

    #[test]
    fn test_stats_peak_and_live() {
        let pool = PoolAllocator::new(MemoryBudget::from_mb(1));

        let a = pool.allocate_array::<u8>(1000).unwrap();
        let b = pool.allocate_array::<u8>(2000).unwrap();
        unsafe {
            pool.deallocate_array(a, 1000);
        }
        assert_eq!(pool.stats().live_allocations(), 1);
        unsafe {
            pool.deallocate_array(b, 2000);
        }

        let stats = pool.stats();
        assert_eq!(stats.peak_allocated_bytes, 3000);
        assert_eq!(stats.live_allocations(), 0);
    }

    #[test]
    fn test_stats_oom_count() {
        let pool = PoolAllocator::new(MemoryBudget::from_bytes(100));
        let _ = pool.allocate_array::<u8>(200);
        let _ = pool.allocate_array::<u8>(200);
        assert_eq!(pool.stats().oom_count, 2);
    }

    #[test]
    fn test_size_class() {
        assert_eq!(size_class_for(1), MIN_SIZE_CLASS);
        assert_eq!(size_class_for(4096), 4096);
        assert_eq!(size_class_for(5000), 8192);
    }

    #[test]
    fn test_debug_format() {
        let pool = PoolAllocator::new(MemoryBudget::from_mb(64));
        let debug = format!("{pool:?}");
        assert!(debug.contains("PoolAllocator"));
        assert!(debug.contains("budget"));
    }
}
