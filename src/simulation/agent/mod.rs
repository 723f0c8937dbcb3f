//! Agents of both species: shared state, senses and per-species lifecycles.

mod agent;
pub mod perception;
pub mod predator;
pub mod prey;
pub mod vision;

pub use agent::*;
pub use perception::Perception;
pub use vision::{HitType, Vision, VisionBuffers};
