// Copyright (c) 2025 Dimitris Kafetzis
//
// Licensed under the MIT License.
// See LICENSE file in the project root for full license information.
//
// SPDX-License-Identifier: MIT

//! Allocation statistics for the pool allocator.
//!
//! Besides sizing the budget, the counters make ownership observable:
//! every successful allocation must be matched by exactly one release,
//! so `live_allocations()` returns to zero once all owners are gone.

/// Cumulative counters describing pool usage.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize)]
pub struct AllocationStats {
    /// Successful allocations.
    pub total_allocations: u64,
    /// Allocations served from the free list.
    pub cache_hits: u64,
    /// Allocations that went to the system allocator.
    pub cache_misses: u64,
    /// Requests rejected by the budget.
    pub oom_count: u64,
    /// High-water mark of live bytes.
    pub peak_allocated_bytes: usize,
    /// Total bytes ever handed out.
    pub cumulative_allocated_bytes: u64,
    /// Blocks released back to the pool.
    pub total_deallocations: u64,
}

impl AllocationStats {
    /// Returns the cache hit ratio in `[0.0, 1.0]`, or `0.0` before the
    /// first allocation.
    pub fn cache_hit_ratio(&self) -> f64 {
        let total = self.cache_hits + self.cache_misses;
        if total == 0 {
            return 0.0;
        }
        self.cache_hits as f64 / total as f64
    }

    /// Allocations not yet released.
    pub fn live_allocations(&self) -> u64 {
        self.total_allocations.saturating_sub(self.total_deallocations)
    }

    pub(crate) fn record_allocation(&mut self, size: usize, cache_hit: bool) {
        self.total_allocations += 1;
        if cache_hit {
            self.cache_hits += 1;
        } else {
            self.cache_misses += 1;
        }
        self.cumulative_allocated_bytes += size as u64;
    }

    pub(crate) fn record_oom(&mut self) {
        self.oom_count += 1;
    }

    pub(crate) fn record_deallocation(&mut self) {
        self.total_deallocations += 1;
    }

    pub(crate) fn update_peak(&mut self, current_bytes: usize) {
        self.peak_allocated_bytes = self.peak_allocated_bytes.max(current_bytes);
    }

    /// Returns a one-line human-readable summary.
    pub fn summary(&self) -> String {
        let peak_kb = self.peak_allocated_bytes as f64 / 1024.0;
        format!(
            "{} allocations ({} hits, {} misses, {:.0}% hit rate), {} releases, \
             {} live, {} OOMs, peak {:.1} KB",
            self.total_allocations,
            self.cache_hits,
            self.cache_misses,
            self.cache_hit_ratio() * 100.0,
            self.total_deallocations,
            self.live_allocations(),
            self.oom_count,
            peak_kb,
        )
    }
}
