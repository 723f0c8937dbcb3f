//! # Predprey - Predator/Prey Neuroevolution
//!
//! A simulation of prey and predators with neural network brains that evolve
//! through clone-time mutation. Agents see their surroundings through ray
//! casting, steer with a small perceptron and live, eat, reproduce and die by
//! their species' rules.
//!
//! ## Features
//!
//! - Two-layer neural network brains (MLP with tanh activation)
//! - Ray-cast vision classifying prey and predators
//! - Heritable traits (speed, turn rate, energy capacity, ray count)
//! - Uniform-grid spatial index for neighbour queries
//! - Parallel vision phase with rayon
//! - Lineage events (births, deaths, feedings) as JSON lines
//! - Seeded, reproducible runs
//!
//! ## Core Modules
//!
//! - [`simulation::agent`] - Agent state and species lifecycles
//! - [`simulation::brain`] - Neural network implementation
//! - [`simulation::ecosystem`] - Main simulation logic
//! - [`simulation::spatial`] - Grid-based neighbour queries
//! - [`simulation::event_log`] - Lineage events

/// Core simulation logic and data structures.
pub mod simulation {
    /// Agents of both species and their senses.
    pub mod agent;
    /// Neural network implementation for agent brains.
    pub mod brain;
    /// Same-species overlap resolution.
    pub mod collision;
    /// Heritable traits and their mutation.
    pub mod dna;
    /// Main ecosystem simulation with a parallel vision phase.
    pub mod ecosystem;
    /// Error types.
    pub mod error;
    /// Lineage events and their bounded log.
    pub mod event_log;
    /// Outcomes of agent updates, applied serially by the ecosystem.
    pub mod events;
    /// Geometric utility functions for distances, angles and wraparound.
    pub mod geometric_utils;
    /// Trait for entities with a position and a radius.
    ///
    /// The [`locatable::Locatable`] trait is implemented by agents, their
    /// body snapshots and plain points, so all of them can be indexed.
    pub mod locatable;
    /// Simulation parameters.
    pub mod params;
    /// Reusable vision buffers.
    pub mod pool;
    /// Offspring creation and mutation schedule.
    pub mod reproduction;
    /// Uniform-grid spatial index.
    pub mod spatial;
}
