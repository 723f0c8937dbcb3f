//! Perception combines the latest vision cast with short-term memory into brain inputs.
//!
//! Brain inputs are laid out as `[ray distances..] ++ [sees_nothing, memory, hit_fraction]`.

use ndarray::Array1;

use super::vision::{HitType, VisionBuffers};

/// Scalar features appended after the ray distances.
pub const EXTRA_INPUTS: usize = 3;

/// Per-tick decay of the "recently seen" memory term.
pub const MEMORY_DECAY: f32 = 0.95;

/// Short-term memory of when the detected species was last in sight.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Perception {
    ticks_since_seen: Option<u32>,
}

impl Perception {
    /// Brain input width for a sensor with `num_rays` rays.
    pub fn input_size(num_rays: usize) -> usize {
        num_rays + EXTRA_INPUTS
    }

    /// Advances the memory by one tick given the current hit vector.
    pub fn observe(&mut self, buffers: &VisionBuffers, target: HitType) {
        if buffers.count_hits(target) > 0 {
            self.ticks_since_seen = Some(0);
        } else if let Some(ticks) = self.ticks_since_seen.as_mut() {
            *ticks = ticks.saturating_add(1);
        }
    }

    /// Ticks since the target was last seen, or `None` if never.
    pub fn ticks_since_seen(&self) -> Option<u32> {
        self.ticks_since_seen
    }

    /// Returns `true` if the target was seen within the last `ticks` ticks.
    pub fn seen_within(&self, ticks: u32) -> bool {
        self.ticks_since_seen.is_some_and(|t| t <= ticks)
    }

    /// Decaying memory term: 1.0 when the target is in sight, 0.0 if never seen.
    pub fn memory(&self) -> f32 {
        self.ticks_since_seen
            .map_or(0.0, |t| MEMORY_DECAY.powi(t.min(i32::MAX as u32) as i32))
    }

    /// Builds the brain input vector.
    pub fn inputs(&self, buffers: &VisionBuffers, target: HitType) -> Array1<f32> {
        let num_rays = buffers.len();
        let hit_count = buffers.count_hits(target);

        let mut inputs = Array1::zeros(Self::input_size(num_rays));
        for (slot, &distance) in inputs.iter_mut().zip(&buffers.distances) {
            *slot = distance;
        }
        inputs[num_rays] = if hit_count == 0 { 1.0 } else { 0.0 };
        inputs[num_rays + 1] = self.memory();
        inputs[num_rays + 2] = hit_count as f32 / num_rays.max(1) as f32;
        inputs
    }
}
