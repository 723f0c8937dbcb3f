//! Reusable vision buffers keyed by ray count.
//!
//! Agents take their buffers from the pool when they are created and hand
//! them back when they die, so a steady population stops allocating.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::agent::VisionBuffers;

/// Allocation statistics of a [`VisionPool`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoolStats {
    /// Buffers created because none of the right size were cached.
    pub allocations_made: u64,
    /// Requests served from the cache.
    pub allocations_saved: u64,
    /// Fraction of requests served from the cache.
    pub reuse_rate: f32,
    /// Cached buffer count per ray count, sorted by ray count.
    pub cached: Vec<(usize, usize)>,
}

/// Free-list of [`VisionBuffers`] per ray count.
#[derive(Debug, Clone, Default)]
pub struct VisionPool {
    free: HashMap<usize, Vec<VisionBuffers>>,
    capacity: usize,
    allocations_made: u64,
    allocations_saved: u64,
}

impl VisionPool {
    /// Creates a pool caching at most `capacity` buffers per ray count.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            ..Self::default()
        }
    }

    /// Returns buffers for `num_rays` rays, reset to "nothing seen".
    pub fn take(&mut self, num_rays: usize) -> VisionBuffers {
        if let Some(buffers) = self.free.get_mut(&num_rays).and_then(Vec::pop) {
            self.allocations_saved += 1;
            buffers
        } else {
            self.allocations_made += 1;
            VisionBuffers::new(num_rays)
        }
    }

    /// Resets and caches `buffers`; dropped if that size is already full.
    pub fn give(&mut self, mut buffers: VisionBuffers) {
        let list = self.free.entry(buffers.len()).or_default();
        if list.len() < self.capacity {
            buffers.reset();
            list.push(buffers);
        }
    }

    /// Total cached buffers across all sizes.
    pub fn cached(&self) -> usize {
        self.free.values().map(Vec::len).sum()
    }

    /// Current allocation statistics.
    pub fn stats(&self) -> PoolStats {
        let requests = self.allocations_made + self.allocations_saved;
        let reuse_rate = if requests == 0 {
            0.0
        } else {
            self.allocations_saved as f32 / requests as f32
        };
        let mut cached: Vec<(usize, usize)> = self
            .free
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(&rays, list)| (rays, list.len()))
            .collect();
        cached.sort_unstable();

        PoolStats {
            allocations_made: self.allocations_made,
            allocations_saved: self.allocations_saved,
            reuse_rate,
            cached,
        }
    }

    /// Drops every cached buffer and resets the statistics.
    pub fn clear(&mut self) {
        self.free.clear();
        self.allocations_made = 0;
        self.allocations_saved = 0;
    }
}
