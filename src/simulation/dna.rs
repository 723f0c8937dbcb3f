//! Heritable non-network traits.
//!
//! Offspring copy their parent's DNA; each trait may mutate independently at
//! clone time with a probability chosen by the caller.

use rand::Rng;
use rand_distr::StandardNormal;
use serde::{Deserialize, Serialize};

use super::params::{MutationParams, PredatorParams, PreyParams};

/// Heritable trait values of one agent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Dna {
    /// Speed cap.
    pub max_speed: f32,
    /// Turn-rate cap in radians per tick.
    pub max_turn_speed: f32,
    /// Energy capacity.
    pub max_energy: f32,
    /// Number of vision rays.
    pub num_rays: usize,
}

/// Names of the heritable traits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gene {
    /// [`Dna::max_speed`]
    MaxSpeed,
    /// [`Dna::max_turn_speed`]
    MaxTurnSpeed,
    /// [`Dna::max_energy`]
    MaxEnergy,
    /// [`Dna::num_rays`]
    NumRays,
}

/// One trait that changed between parent and child.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TraitChange {
    /// Which trait changed.
    pub gene: Gene,
    /// Parent value.
    pub from: f32,
    /// Child value.
    pub to: f32,
}

impl Dna {
    /// Founding DNA of seeded prey.
    pub fn prey(params: &PreyParams) -> Self {
        Self {
            max_speed: params.max_speed,
            max_turn_speed: params.max_turn_speed,
            max_energy: params.max_energy,
            num_rays: params.num_rays,
        }
    }

    /// Founding DNA of seeded predators.
    pub fn predator(params: &PredatorParams) -> Self {
        Self {
            max_speed: params.max_speed,
            max_turn_speed: params.max_turn_speed,
            max_energy: params.max_energy,
            num_rays: params.num_rays,
        }
    }

    /// Copies the DNA, mutating each trait with probability `probability`.
    ///
    /// Continuous traits are scaled by `1 + N(0, 1) * trait_scale`; the ray
    /// count steps by one in a random direction. Results are clamped to the
    /// bounds in `mutation`.
    ///
    /// # Returns
    ///
    /// The child DNA and the traits whose value actually changed.
    pub fn mutate(
        &self,
        probability: f32,
        mutation: &MutationParams,
        rng: &mut impl Rng,
    ) -> (Self, Vec<TraitChange>) {
        let probability = f64::from(probability.clamp(0.0, 1.0));
        let mut child = *self;
        let mut changes = Vec::new();

        let scale = mutation.trait_scale;
        if rng.random_bool(probability) {
            child.max_speed = scale_trait(
                self.max_speed,
                scale,
                (mutation.min_speed, mutation.max_speed),
                rng,
            );
        }
        if rng.random_bool(probability) {
            child.max_turn_speed = scale_trait(
                self.max_turn_speed,
                scale,
                (mutation.min_turn_speed, mutation.max_turn_speed),
                rng,
            );
        }
        if rng.random_bool(probability) {
            child.max_energy = scale_trait(
                self.max_energy,
                scale,
                (mutation.min_energy, mutation.max_energy),
                rng,
            );
        }
        if rng.random_bool(probability) {
            let stepped = if rng.random_bool(0.5) {
                self.num_rays + 1
            } else {
                self.num_rays.saturating_sub(1)
            };
            child.num_rays = stepped.clamp(mutation.min_rays, mutation.max_rays);
        }

        for (gene, from, to) in [
            (Gene::MaxSpeed, self.max_speed, child.max_speed),
            (Gene::MaxTurnSpeed, self.max_turn_speed, child.max_turn_speed),
            (Gene::MaxEnergy, self.max_energy, child.max_energy),
            (Gene::NumRays, self.num_rays as f32, child.num_rays as f32),
        ] {
            if from != to {
                changes.push(TraitChange { gene, from, to });
            }
        }

        (child, changes)
    }
}

fn scale_trait(value: f32, scale: f32, (min, max): (f32, f32), rng: &mut impl Rng) -> f32 {
    let factor = 1.0 + rng.sample::<f32, _>(StandardNormal) * scale;
    (value * factor).clamp(min, max)
}
