//! Prey lifecycle.
//!
//! Prey graze in place, regenerating energy, until a predator comes into
//! sight. They then run on their brain's steering for a short while after
//! losing sight of it, burning energy as they go.

use super::super::events::{DeathCause, Outcome};
use super::{Agent, PreyState, UpdateContext};

/// Advances one prey by a tick.
///
/// # Arguments
///
/// * `agent` - The prey to update
/// * `state` - Its prey payload, written back by the caller
/// * `ctx` - Tick and parameters
///
/// # Returns
///
/// The transition the ecosystem should apply. Reproduction is only requested
/// once energy covers both the threshold and the reproduction cost; the cost
/// is deducted by the ecosystem once the birth is accepted.
pub fn update(agent: &mut Agent, state: &mut PreyState, ctx: &UpdateContext<'_>) -> Outcome {
    let params = &ctx.params.prey;
    agent.age += 1;

    let intent = agent.think();
    let fleeing = agent.perception.seen_within(params.flee_persistence_ticks);

    if fleeing && agent.energy > 0.0 {
        agent.integrate(intent, ctx.params.box_width, ctx.params.box_height);
        agent.consume_energy(params.burn_base + agent.speed * params.burn_per_speed);
    } else {
        agent.halt();
        agent.gain_energy(params.energy_regen);
    }

    if agent.age > params.max_age {
        return Outcome::Die(DeathCause::OldAge);
    }
    if params.starvation_enabled && agent.energy <= 0.0 {
        return Outcome::Die(DeathCause::Starvation);
    }
    // Capacity is heritable and may fall below the cost; such prey never breed.
    if agent.energy >= state.reproduction_threshold.max(params.reproduction_cost) {
        return Outcome::Reproduce { consumed: None };
    }
    Outcome::None
}
