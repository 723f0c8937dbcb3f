//! Main ecosystem simulation with parallel vision and serial updates.
//!
//! The ecosystem owns every agent and advances them one tick at a time:
//! - Bodies are snapshotted and bucketed into a uniform grid
//! - Vision is cast in parallel with rayon against that snapshot
//! - Agents update one after another, each returning an [`Outcome`]
//! - Outcomes are applied serially: deaths, feedings, then births

use std::collections::HashSet;

use geo::Point;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::agent::{predator, prey, Agent, AgentId, Body, IdCounter, Kind, Species, UpdateContext};
use super::collision;
use super::error::ParamsError;
use super::event_log::{EventLog, SimulationEvent};
use super::events::{DeathCause, Outcome};
use super::geometric_utils::normalize_angle;
use super::params::Params;
use super::pool::{PoolStats, VisionPool};
use super::reproduction::{self, MutationSummary};
use super::spatial::SpatialIndex;

/// Population counts and event tallies of one tick.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickReport {
    /// The tick that was simulated.
    pub tick: u64,
    /// Living prey after the tick.
    pub prey: usize,
    /// Living predators after the tick.
    pub predators: usize,
    /// Children spawned.
    pub births: usize,
    /// Agents removed.
    pub deaths: usize,
    /// Meals eaten by predators.
    pub feedings: usize,
    /// Prey births dropped because the prey cap was reached.
    pub dropped_births: usize,
}

/// The main ecosystem containing all simulation state.
#[derive(Debug, Clone)]
pub struct Ecosystem {
    params: Params,
    agents: Vec<Agent>,
    tick: u64,
    ids: IdCounter,
    rng: SmallRng,
    grid: SpatialIndex<usize>,
    pool: VisionPool,
    events: EventLog,
}

impl Ecosystem {
    /// Creates a new ecosystem with the seeded populations at random positions.
    ///
    /// Returns an error if `params` fail validation.
    pub fn new(params: Params) -> Result<Self, ParamsError> {
        params.validate()?;

        let mut ecosystem = Self {
            rng: SmallRng::seed_from_u64(params.seed),
            grid: SpatialIndex::new(params.cell_size),
            pool: VisionPool::new(params.pool_capacity),
            events: EventLog::new(params.event_log_capacity),
            agents: Vec::with_capacity(params.n_prey + params.n_predator),
            tick: 0,
            ids: IdCounter::new(),
            params,
        };

        for _ in 0..ecosystem.params.n_prey {
            let pos = ecosystem.random_position();
            let angle = ecosystem.random_angle();
            ecosystem.spawn(Species::Prey, pos, angle);
        }
        for _ in 0..ecosystem.params.n_predator {
            let pos = ecosystem.random_position();
            let angle = ecosystem.random_angle();
            ecosystem.spawn(Species::Predator, pos, angle);
        }

        debug!(
            prey = ecosystem.params.n_prey,
            predators = ecosystem.params.n_predator,
            seed = ecosystem.params.seed,
            "ecosystem seeded"
        );
        Ok(ecosystem)
    }

    fn random_position(&mut self) -> Point<f32> {
        Point::new(
            self.rng.random_range(0.0..self.params.box_width),
            self.rng.random_range(0.0..self.params.box_height),
        )
    }

    fn random_angle(&mut self) -> f32 {
        self.rng.random_range(0.0..std::f32::consts::TAU)
    }

    /// Adds a generation-0 agent with founding DNA and a random brain.
    pub fn spawn(&mut self, species: Species, pos: Point<f32>, angle: f32) -> AgentId {
        let id = self.ids.next_id();
        let mut agent = Agent::new_random(
            id,
            species,
            pos,
            self.tick,
            &self.params,
            &mut self.pool,
            &mut self.rng,
        );
        agent.angle = normalize_angle(angle);
        self.events.push(SimulationEvent::Birth {
            tick: self.tick,
            species,
            child_id: id,
            parent_id: None,
            generation: 0,
            mutation: None,
        });
        self.agents.push(agent);
        id
    }

    /// Removes an agent, returning its buffers to the pool.
    ///
    /// Returns `false` if no agent with that id is alive.
    pub fn remove(&mut self, id: AgentId) -> bool {
        match self.agents.iter().position(|a| a.id == id) {
            Some(index) => {
                let agent = self.agents.swap_remove(index);
                self.pool.give(agent.vision.buffers);
                true
            }
            None => false,
        }
    }

    /// Simulation parameters.
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Number of ticks simulated so far.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// All living agents.
    pub fn agents(&self) -> &[Agent] {
        &self.agents
    }

    /// Looks up a living agent.
    pub fn agent(&self, id: AgentId) -> Option<&Agent> {
        self.agents.iter().find(|a| a.id == id)
    }

    /// Looks up a living agent for modification.
    pub fn agent_mut(&mut self, id: AgentId) -> Option<&mut Agent> {
        self.agents.iter_mut().find(|a| a.id == id)
    }

    /// Number of living prey.
    pub fn prey_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_prey()).count()
    }

    /// Number of living predators.
    pub fn predator_count(&self) -> usize {
        self.agents.iter().filter(|a| a.is_predator()).count()
    }

    /// Vision buffer pool statistics.
    pub fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Pending events.
    pub fn events(&self) -> &EventLog {
        &self.events
    }

    /// Removes and returns all pending events, oldest first.
    pub fn drain_events(&mut self) -> Vec<SimulationEvent> {
        self.events.drain()
    }

    /// Advances the simulation by one tick.
    pub fn step(&mut self) -> TickReport {
        let tick = self.tick;
        let mut report = TickReport {
            tick,
            ..TickReport::default()
        };

        let bodies: Vec<Body> = self.agents.iter().map(Body::from).collect();
        self.grid.clear();
        for (index, body) in bodies.iter().enumerate() {
            self.grid.insert(index, body);
        }

        if tick % self.params.vision_throttle == 0 {
            self.cast_vision(&bodies);
        }

        let outcomes = self.update_agents(&bodies, tick);
        self.apply_outcomes(&outcomes, tick, &mut report);

        if tick % self.params.collision_interval == 0 {
            collision::resolve_overlaps(&mut self.agents, &self.params);
        }

        self.tick += 1;
        report.prey = self.prey_count();
        report.predators = self.predator_count();
        report
    }

    // Parallel phase: each agent writes only its own buffers.
    fn cast_vision(&mut self, bodies: &[Body]) {
        let grid = &self.grid;
        self.agents.par_iter_mut().for_each(|agent| {
            let range = agent.vision.view_range;
            let detects = agent.vision.detects;
            let candidates: Vec<Body> = grid
                .neighbors_at(agent.pos, Some(range))
                .into_iter()
                .map(|index| bodies[index])
                .filter(|body| {
                    let offset = body.pos - agent.pos;
                    body.id != agent.id
                        && body.species == detects
                        && offset.dot(offset) <= range * range + body.radius * body.radius
                })
                .collect();
            let (origin, heading) = (agent.pos, agent.angle);
            agent.vision.cast(origin, heading, &candidates);
        });
    }

    fn update_agents(&mut self, bodies: &[Body], tick: u64) -> Vec<Outcome> {
        let mut outcomes = Vec::with_capacity(self.agents.len());

        for agent in &mut self.agents {
            let nearby_prey: Vec<Body> = if agent.is_predator() {
                let reach = self.params.predator.bite_range + agent.dna.max_speed;
                self.grid
                    .neighbors_at(agent.pos, Some(reach))
                    .into_iter()
                    .map(|index| bodies[index])
                    .filter(|body| body.species == Species::Prey)
                    .collect()
            } else {
                Vec::new()
            };
            let ctx = UpdateContext {
                tick,
                params: &self.params,
                nearby_prey: &nearby_prey,
            };

            let outcome = match agent.kind {
                Kind::Prey(mut state) => {
                    let outcome = prey::update(agent, &mut state, &ctx);
                    agent.kind = Kind::Prey(state);
                    outcome
                }
                Kind::Predator(mut state) => {
                    let outcome = predator::update(agent, &mut state, &ctx);
                    agent.kind = Kind::Predator(state);
                    outcome
                }
            };
            outcomes.push(outcome);
        }

        outcomes
    }

    fn apply_outcomes(&mut self, outcomes: &[Outcome], tick: u64, report: &mut TickReport) {
        // Deaths and feedings first; the first recorded cause wins.
        let mut dead: Vec<(AgentId, DeathCause)> = Vec::new();
        let mut dead_ids: HashSet<AgentId> = HashSet::new();

        for (agent, outcome) in self.agents.iter().zip(outcomes) {
            if let Outcome::Die(cause) = *outcome {
                if dead_ids.insert(agent.id) {
                    dead.push((agent.id, cause));
                }
            }
            // Every bite counts as a meal, even when another predator already
            // took the same prey this tick; the prey itself dies only once.
            if let Some(prey_id) = outcome.consumed_prey() {
                report.feedings += 1;
                let prey_eaten = match agent.kind {
                    Kind::Predator(state) => state.total_eaten,
                    Kind::Prey(_) => 0,
                };
                trace!(predator = %agent.id, prey = %prey_id, tick, "predator fed");
                self.events.push(SimulationEvent::Feeding {
                    tick,
                    predator_id: agent.id,
                    generation: agent.generation,
                    prey_id,
                    prey_eaten,
                });
                if dead_ids.insert(prey_id) {
                    dead.push((
                        prey_id,
                        DeathCause::Eaten {
                            predator: agent.id,
                        },
                    ));
                }
            }
        }

        // Births from parents that survived the tick.
        let mut living_prey = self
            .agents
            .iter()
            .filter(|a| a.is_prey() && !dead_ids.contains(&a.id))
            .count();
        let mut children = Vec::new();

        for (index, outcome) in outcomes.iter().enumerate() {
            if !matches!(outcome, Outcome::Reproduce { .. }) {
                continue;
            }
            let parent = &self.agents[index];
            if dead_ids.contains(&parent.id) {
                continue;
            }
            if parent.is_prey() {
                if parent.energy < self.params.prey.reproduction_cost {
                    continue;
                }
                if living_prey >= self.params.max_prey {
                    report.dropped_births += 1;
                    debug!(parent = %parent.id, tick, "prey cap reached, birth dropped");
                    continue;
                }
                living_prey += 1;
            }

            let child_id = self.ids.next_id();
            let (child, summary) = reproduction::offspring(
                parent,
                child_id,
                tick,
                &self.params,
                &mut self.pool,
                &mut self.rng,
            );
            self.record_birth(&child, summary, tick);

            let parent = &mut self.agents[index];
            parent.children += 1;
            let max_energy = parent.dna.max_energy;
            if let Kind::Prey(state) = &mut parent.kind {
                parent.energy -= self.params.prey.reproduction_cost;
                state.redraw_threshold(max_energy, &self.params.prey, &mut self.rng);
            }
            children.push(child);
        }

        // Removal is idempotent: ids that are no longer alive are ignored.
        if !dead.is_empty() {
            let (removed, alive): (Vec<Agent>, Vec<Agent>) = std::mem::take(&mut self.agents)
                .into_iter()
                .partition(|a| dead_ids.contains(&a.id));
            self.agents = alive;

            for (id, cause) in dead {
                let Some(agent) = removed.iter().find(|a| a.id == id) else {
                    continue;
                };
                self.record_death(agent, cause, tick);
                report.deaths += 1;
            }
            for agent in removed {
                self.pool.give(agent.vision.buffers);
            }
        }

        report.births = children.len();
        self.agents.extend(children);
    }

    fn record_birth(&mut self, child: &Agent, summary: MutationSummary, tick: u64) {
        if summary.significant {
            debug!(
                child = %child.id,
                generation = child.generation,
                brain_strength = summary.brain_strength,
                traits = summary.traits.len(),
                "significant mutation"
            );
        }
        self.events.push(SimulationEvent::Birth {
            tick,
            species: child.species(),
            child_id: child.id,
            parent_id: child.parent,
            generation: child.generation,
            mutation: Some(summary),
        });
    }

    fn record_death(&mut self, agent: &Agent, cause: DeathCause, tick: u64) {
        let prey_eaten = match agent.kind {
            Kind::Predator(state) => Some(state.total_eaten),
            Kind::Prey(_) => None,
        };
        debug!(
            id = %agent.id,
            species = ?agent.species(),
            age = agent.age,
            ?cause,
            "agent died"
        );
        self.events.push(SimulationEvent::Death {
            tick,
            id: agent.id,
            species: agent.species(),
            generation: agent.generation,
            age_ticks: agent.age,
            age_seconds: agent.age_seconds(self.params.ticks_per_second),
            cause,
            energy: agent.energy,
            children: agent.children,
            prey_eaten,
        });
    }
}
