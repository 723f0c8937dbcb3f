//! Trait for entities that occupy a circular footprint in the world.
//!
//! The spatial index buckets anything [`Locatable`], and overlap resolution
//! reads the same two accessors.

use geo::Point;

/// Trait for entities with a position and a body radius.
pub trait Locatable {
    /// Returns the entity's centre.
    fn pos(&self) -> Point<f32>;

    /// Returns the radius of the entity's circular body.
    fn radius(&self) -> f32;
}

impl Locatable for Point<f32> {
    fn pos(&self) -> Point<f32> {
        *self
    }

    fn radius(&self) -> f32 {
        0.0
    }
}
