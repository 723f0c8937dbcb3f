//! Vision sense - ray casting against nearby bodies.
//!
//! Rays fan out evenly across the field of view. Each ray reports the
//! normalized distance to the closest detected body it passes through
//! (1.0 = nothing seen, 0.0 = contact) and what kind of body that was.

use std::f32::consts::TAU;

use geo::Point;
use serde::{Deserialize, Serialize};

use super::super::geometric_utils::{heading_vector, line_circle_distance};
use super::{Body, Species};

/// Fields of view within this tolerance of a full turn are treated as one.
const FULL_TURN_EPSILON: f32 = 1e-5;

/// Classification of what a ray detected.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HitType {
    /// Nothing detected.
    #[default]
    None,
    /// A prey body.
    Prey,
    /// A predator body.
    Predator,
}

impl From<Species> for HitType {
    fn from(species: Species) -> Self {
        match species {
            Species::Prey => HitType::Prey,
            Species::Predator => HitType::Predator,
        }
    }
}

/// Per-ray outputs of one vision cast.
#[derive(Debug, Clone, PartialEq)]
pub struct VisionBuffers {
    /// Normalized distance per ray, in `[0, 1]`.
    pub distances: Vec<f32>,
    /// Hit classification per ray.
    pub hits: Vec<HitType>,
}

impl VisionBuffers {
    /// Buffers for `num_rays` rays, reporting nothing seen.
    pub fn new(num_rays: usize) -> Self {
        Self {
            distances: vec![1.0; num_rays],
            hits: vec![HitType::None; num_rays],
        }
    }

    /// Number of rays the buffers hold.
    pub fn len(&self) -> usize {
        self.distances.len()
    }

    /// Returns `true` for zero-ray buffers.
    pub fn is_empty(&self) -> bool {
        self.distances.is_empty()
    }

    /// Resets every ray to "nothing seen".
    pub fn reset(&mut self) {
        self.distances.fill(1.0);
        self.hits.fill(HitType::None);
    }

    /// Number of rays that hit `target`.
    pub fn count_hits(&self, target: HitType) -> usize {
        self.hits.iter().filter(|hit| **hit == target).count()
    }
}

/// An agent's vision configuration and its latest cast.
#[derive(Debug, Clone)]
pub struct Vision {
    /// Field of view angle in radians.
    pub fov: f32,
    /// Maximum distance the agent can see.
    pub view_range: f32,
    /// Species this sensor classifies; all other bodies are ignored.
    pub detects: Species,
    /// Results of the most recent cast.
    pub buffers: VisionBuffers,
}

impl Vision {
    /// Number of rays cast.
    pub fn num_rays(&self) -> usize {
        self.buffers.len()
    }

    /// Hit type produced by the detected species.
    pub fn target(&self) -> HitType {
        self.detects.into()
    }

    /// Casts every ray from `origin` and stores the result in the buffers.
    pub fn cast(&mut self, origin: Point<f32>, heading: f32, candidates: &[Body]) {
        cast_rays(
            origin,
            heading,
            self.fov,
            self.view_range,
            self.detects,
            candidates,
            &mut self.buffers,
        );
    }
}

/// Angle of ray `index` out of `num_rays`.
///
/// A partial field of view is spanned inclusively, centered on `heading`. A
/// full turn spaces rays by `2π / num_rays` so the seam holds no duplicate.
#[inline]
pub fn ray_angle(heading: f32, fov: f32, num_rays: usize, index: usize) -> f32 {
    if (fov - TAU).abs() < FULL_TURN_EPSILON {
        heading + index as f32 * (TAU / num_rays as f32)
    } else {
        let step = fov / (num_rays as f32 - 1.0);
        heading - fov / 2.0 + index as f32 * step
    }
}

/// All ray angles of a sensor.
///
/// # Panics
///
/// Panics if `num_rays < 2`.
pub fn ray_angles(heading: f32, fov: f32, num_rays: usize) -> Vec<f32> {
    assert!(num_rays >= 2, "vision needs at least two rays, got {num_rays}");
    (0..num_rays)
        .map(|i| ray_angle(heading, fov, num_rays, i))
        .collect()
}

/// Casts `out.len()` rays against `candidates` and writes the results into `out`.
///
/// Candidates of species other than `detects` are skipped. A candidate is hit
/// when its projection onto the ray lies strictly inside `(0, view_range)` and
/// its centre is closer to the ray than its radius; the closest hit wins.
///
/// # Panics
///
/// Panics if `out` holds fewer than two rays or `view_range` is not positive.
pub fn cast_rays(
    origin: Point<f32>,
    heading: f32,
    fov: f32,
    view_range: f32,
    detects: Species,
    candidates: &[Body],
    out: &mut VisionBuffers,
) {
    let num_rays = out.len();
    assert!(num_rays >= 2, "vision needs at least two rays, got {num_rays}");
    assert_eq!(out.hits.len(), num_rays, "vision buffers differ in length");
    assert!(view_range > 0.0, "view_range must be positive");

    let target = HitType::from(detects);

    for ray in 0..num_rays {
        let direction = heading_vector(ray_angle(heading, fov, num_rays, ray));
        let ray_end = origin + direction * view_range;
        let mut closest = view_range;
        let mut hit = HitType::None;

        for candidate in candidates {
            if candidate.species != detects {
                continue;
            }

            let offset = candidate.pos - origin;
            let projection = offset.dot(direction);
            if projection <= 0.0 || projection >= view_range {
                continue;
            }

            let perpendicular = line_circle_distance(origin, ray_end, candidate.pos);
            if perpendicular < candidate.radius && projection < closest {
                closest = projection;
                hit = target;
            }
        }

        out.distances[ray] = closest / view_range;
        out.hits[ray] = hit;
    }
}
