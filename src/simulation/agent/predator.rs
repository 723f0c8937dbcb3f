//! Predator lifecycle.
//!
//! Predators always move by their brain's steering. They bite the closest prey
//! in front of them, and every few meals the meal also triggers reproduction.

use super::super::events::{DeathCause, Outcome};
use super::super::geometric_utils::{angle_difference, distance};
use super::super::params::PredatorParams;
use super::{Agent, AgentId, Body, PredatorState, Species, UpdateContext};

/// Advances one predator by a tick.
///
/// `ctx.nearby_prey` holds tick-start prey bodies; prey eaten earlier in the
/// same tick may still appear there, and removal is resolved by the ecosystem.
pub fn update(agent: &mut Agent, state: &mut PredatorState, ctx: &UpdateContext<'_>) -> Outcome {
    let params = &ctx.params.predator;
    agent.age += 1;

    let intent = agent.think();
    agent.integrate(intent, ctx.params.box_width, ctx.params.box_height);
    agent.consume_energy(params.burn_base + agent.speed * params.burn_per_speed);

    if can_bite(state, ctx.tick, params) {
        if let Some(prey) = bite_target(agent, ctx.nearby_prey, params) {
            agent.gain_energy(params.meal_energy);
            state.eaten_count += 1;
            state.total_eaten += 1;
            state.last_meal_tick = ctx.tick;
            state.last_eat_tick = Some(ctx.tick);

            if state.eaten_count >= params.eats_to_reproduce {
                state.eaten_count = 0;
                return Outcome::Reproduce {
                    consumed: Some(prey),
                };
            }
            return Outcome::Eat { prey };
        }
    }

    if is_starving(agent, state, ctx.tick, params) {
        return Outcome::Die(DeathCause::Starvation);
    }
    Outcome::None
}

/// Returns `true` once the eat cooldown has elapsed.
pub fn can_bite(state: &PredatorState, tick: u64, params: &PredatorParams) -> bool {
    state
        .last_eat_tick
        .is_none_or(|last| tick.saturating_sub(last) >= params.eat_cooldown_ticks)
}

/// Closest prey within bite range and inside the bite cone, if any.
pub fn bite_target(agent: &Agent, prey: &[Body], params: &PredatorParams) -> Option<AgentId> {
    prey.iter()
        .filter(|body| body.species == Species::Prey)
        .filter_map(|body| {
            let d = distance(agent.pos, body.pos);
            if d > params.bite_range {
                return None;
            }
            let offset = body.pos - agent.pos;
            let bearing = offset.y().atan2(offset.x());
            let off_axis = angle_difference(agent.angle, bearing).abs();
            // A prey right on top of the predator counts as in front of it.
            (d <= f32::EPSILON || off_axis <= params.bite_angle).then_some((body.id, d))
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(id, _)| id)
}

fn is_starving(agent: &Agent, state: &PredatorState, tick: u64, params: &PredatorParams) -> bool {
    agent.energy <= 0.0 || tick.saturating_sub(state.last_meal_tick) > params.starvation_ticks
}
