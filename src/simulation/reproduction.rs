//! Asexual reproduction with clone-time mutation.

use std::f32::consts::TAU;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::agent::{Agent, AgentId, Perception};
use super::dna::TraitChange;
use super::geometric_utils::heading_vector;
use super::params::Params;
use super::pool::VisionPool;

/// Distance of a newborn from its parent, in parent radii.
const BIRTH_OFFSET: f32 = 0.75;

/// What changed between a parent and its child.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MutationSummary {
    /// Mean absolute brain parameter perturbation.
    pub brain_strength: f32,
    /// Heritable traits that changed.
    pub traits: Vec<TraitChange>,
    /// Any trait changed, or the brain moved more than the significance threshold.
    pub significant: bool,
}

/// Trait mutation multiplier by parent generation.
///
/// Early lineages mutate more to explore; established ones mutate less.
pub fn mutation_multiplier(generation: u32) -> f32 {
    match generation {
        0..=2 => 1.8,
        3..=5 => 1.3,
        _ => 0.8,
    }
}

/// Creates one mutated child of `parent`.
///
/// The child is one generation older, inherits a mutated copy of the brain and
/// DNA, and is placed next to the parent in a random direction. A change in
/// ray count resizes the brain input and takes matching buffers from `pool`.
///
/// # Arguments
///
/// * `parent` - The reproducing agent
/// * `id` - Fresh id for the child
/// * `tick` - Birth tick
/// * `params` - Simulation parameters
/// * `pool` - Source of the child's vision buffers
/// * `rng` - Random number generator
///
/// # Returns
///
/// The child and a summary of its mutations.
pub fn offspring(
    parent: &Agent,
    id: AgentId,
    tick: u64,
    params: &Params,
    pool: &mut VisionPool,
    rng: &mut impl Rng,
) -> (Agent, MutationSummary) {
    let mutation = &params.mutation;

    let (mut brain, brain_strength) = parent.brain.clone_with_mutation(mutation.weight_rate, rng);

    let probability =
        (mutation.trait_probability * mutation_multiplier(parent.generation)).clamp(0.0, 1.0);
    let (dna, traits) = parent.dna.mutate(probability, mutation, rng);
    if dna.num_rays != parent.dna.num_rays {
        brain = brain.resize_input(Perception::input_size(dna.num_rays), rng);
    }

    let direction = heading_vector(rng.random_range(0.0..TAU));
    let pos = parent.pos + direction * (parent.radius * BIRTH_OFFSET);
    let angle = rng.random_range(0.0..TAU);

    let mut child = Agent::with_genome(
        id,
        parent.species(),
        pos,
        angle,
        dna,
        brain,
        tick,
        params,
        pool,
        rng,
    );
    child.generation = parent.generation + 1;
    child.parent = Some(parent.id);

    let significant = !traits.is_empty() || brain_strength > mutation.significant_strength;
    (
        child,
        MutationSummary {
            brain_strength,
            traits,
            significant,
        },
    )
}
