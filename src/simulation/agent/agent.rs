//! Agent state shared by both species, plus the species-specific payloads.
//!
//! Agents have neural network brains, see through ray casting, and move,
//! feed, reproduce and die according to their species' lifecycle.

use geo::Point;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::super::brain::{Brain, Intent};
use super::super::dna::Dna;
use super::super::geometric_utils::{heading_vector, normalize_angle, wrap_around};
use super::super::locatable::Locatable;
use super::super::params::{Params, PreyParams};
use super::super::pool::VisionPool;
use super::perception::Perception;
use super::vision::{HitType, Vision};

/// Unique identifier of an agent; never reused within a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AgentId(pub u64);

impl std::fmt::Display for AgentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Issues monotonically increasing agent ids.
#[derive(Debug, Clone, Default)]
pub struct IdCounter {
    next: u64,
}

impl IdCounter {
    /// Creates a counter whose first id is 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a fresh id.
    pub fn next_id(&mut self) -> AgentId {
        let id = AgentId(self.next);
        self.next += 1;
        id
    }
}

/// The two species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Species {
    /// Grazing agents that flee predators.
    Prey,
    /// Hunting agents that eat prey.
    Predator,
}

impl Species {
    /// The species this species' vision classifies.
    pub fn detects(self) -> Species {
        match self {
            Species::Prey => Species::Predator,
            Species::Predator => Species::Prey,
        }
    }
}

/// Prey-specific state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PreyState {
    /// Energy at which this prey tries to reproduce.
    pub reproduction_threshold: f32,
}

impl PreyState {
    /// Fresh state with a randomized reproduction threshold.
    pub fn new(max_energy: f32, params: &PreyParams, rng: &mut impl Rng) -> Self {
        Self {
            reproduction_threshold: draw_threshold(max_energy, params, rng),
        }
    }

    /// Draws a new reproduction threshold, avoiding synchronized births.
    pub fn redraw_threshold(&mut self, max_energy: f32, params: &PreyParams, rng: &mut impl Rng) {
        self.reproduction_threshold = draw_threshold(max_energy, params, rng);
    }
}

fn draw_threshold(max_energy: f32, params: &PreyParams, rng: &mut impl Rng) -> f32 {
    let fraction =
        rng.random_range(params.threshold_min_fraction..=params.threshold_max_fraction);
    max_energy * fraction
}

/// Predator-specific state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PredatorState {
    /// Meals since the last reproduction.
    pub eaten_count: u32,
    /// Meals over the predator's lifetime.
    pub total_eaten: u32,
    /// Tick of the last meal (birth tick until the first meal).
    pub last_meal_tick: u64,
    /// Tick of the last bite, used for the eat cooldown.
    pub last_eat_tick: Option<u64>,
}

impl PredatorState {
    /// Fresh state for a predator born at `tick`.
    pub fn new(tick: u64) -> Self {
        Self {
            eaten_count: 0,
            total_eaten: 0,
            last_meal_tick: tick,
            last_eat_tick: None,
        }
    }
}

/// Species tag carrying the species-specific payload.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Kind {
    /// A prey.
    Prey(PreyState),
    /// A predator.
    Predator(PredatorState),
}

impl Kind {
    /// Species of this payload.
    pub fn species(&self) -> Species {
        match self {
            Kind::Prey(_) => Species::Prey,
            Kind::Predator(_) => Species::Predator,
        }
    }
}

/// Read-only snapshot of an agent's body, taken at the start of a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Body {
    /// Agent the body belongs to.
    pub id: AgentId,
    /// Species of the agent.
    pub species: Species,
    /// Centre of the body.
    pub pos: Point<f32>,
    /// Body radius.
    pub radius: f32,
}

impl Locatable for Body {
    fn pos(&self) -> Point<f32> {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

impl From<&Agent> for Body {
    fn from(agent: &Agent) -> Self {
        Self {
            id: agent.id,
            species: agent.species(),
            pos: agent.pos,
            radius: agent.radius,
        }
    }
}

/// Inputs an agent's update needs from the orchestrator.
#[derive(Debug, Clone, Copy)]
pub struct UpdateContext<'a> {
    /// Current tick.
    pub tick: u64,
    /// Simulation parameters.
    pub params: &'a Params,
    /// Prey bodies near the agent at the start of the tick (used by predators).
    pub nearby_prey: &'a [Body],
}

/// A simulated agent.
#[derive(Debug, Clone)]
pub struct Agent {
    /// Unique identifier.
    pub id: AgentId,
    /// Reproduction steps between this agent and the seeded population.
    pub generation: u32,
    /// Parent, if born through reproduction.
    pub parent: Option<AgentId>,
    /// Tick at which the agent was created.
    pub birth_tick: u64,
    /// Position, wrapped to the world bounds.
    pub pos: Point<f32>,
    /// Heading in radians, in `[0, 2π)`.
    pub angle: f32,
    /// Current speed.
    pub speed: f32,
    /// Last turn intent.
    pub angular_velocity: f32,
    /// Squash/stretch scalar for rendering.
    pub stretch: f32,
    /// Body radius.
    pub radius: f32,
    /// Current energy, in `[0, dna.max_energy]`.
    pub energy: f32,
    /// Heritable traits.
    pub dna: Dna,
    /// Vision configuration and latest cast.
    pub vision: Vision,
    /// Short-term memory of the detected species.
    pub perception: Perception,
    /// Neural network that controls steering.
    pub brain: Brain,
    /// Ticks alive.
    pub age: u64,
    /// Children spawned.
    pub children: u32,
    /// Species payload.
    pub kind: Kind,
}

impl Agent {
    /// Creates a seeded agent with founding DNA and a random brain and heading.
    #[allow(clippy::too_many_arguments)]
    pub fn new_random(
        id: AgentId,
        species: Species,
        pos: Point<f32>,
        tick: u64,
        params: &Params,
        pool: &mut VisionPool,
        rng: &mut impl Rng,
    ) -> Self {
        let dna = match species {
            Species::Prey => Dna::prey(&params.prey),
            Species::Predator => Dna::predator(&params.predator),
        };
        let brain = Brain::new(
            Perception::input_size(dna.num_rays),
            params.hidden_size,
            rng,
        );
        let angle = rng.random_range(0.0..std::f32::consts::TAU);
        Self::with_genome(id, species, pos, angle, dna, brain, tick, params, pool, rng)
    }

    /// Creates an agent from explicit DNA and brain.
    ///
    /// # Panics
    ///
    /// Panics if the brain's input width does not match the DNA's ray count.
    #[allow(clippy::too_many_arguments)]
    pub fn with_genome(
        id: AgentId,
        species: Species,
        pos: Point<f32>,
        angle: f32,
        dna: Dna,
        brain: Brain,
        tick: u64,
        params: &Params,
        pool: &mut VisionPool,
        rng: &mut impl Rng,
    ) -> Self {
        assert!(dna.num_rays >= 2, "agents need at least two rays");
        assert_eq!(
            brain.input_size(),
            Perception::input_size(dna.num_rays),
            "brain width does not match {} rays",
            dna.num_rays
        );

        let (radius, fov, view_range, initial_energy, kind) = match species {
            Species::Prey => (
                params.prey.radius,
                params.prey.fov,
                params.prey.view_range,
                params.prey.initial_energy,
                Kind::Prey(PreyState::new(dna.max_energy, &params.prey, rng)),
            ),
            Species::Predator => (
                params.predator.radius,
                params.predator.fov,
                params.predator.view_range,
                params.predator.initial_energy,
                Kind::Predator(PredatorState::new(tick)),
            ),
        };

        Self {
            id,
            generation: 0,
            parent: None,
            birth_tick: tick,
            pos: wrap_around(pos, params.box_width, params.box_height),
            angle: normalize_angle(angle),
            speed: 0.0,
            angular_velocity: 0.0,
            stretch: 1.0,
            radius,
            energy: initial_energy.clamp(0.0, dna.max_energy),
            dna,
            vision: Vision {
                fov,
                view_range,
                detects: species.detects(),
                buffers: pool.take(dna.num_rays),
            },
            perception: Perception::default(),
            brain,
            age: 0,
            children: 0,
            kind,
        }
    }

    /// Species of the agent.
    pub fn species(&self) -> Species {
        self.kind.species()
    }

    /// Returns `true` for prey.
    pub fn is_prey(&self) -> bool {
        matches!(self.kind, Kind::Prey(_))
    }

    /// Returns `true` for predators.
    pub fn is_predator(&self) -> bool {
        matches!(self.kind, Kind::Predator(_))
    }

    /// Hit type of the species this agent looks for.
    pub fn target(&self) -> HitType {
        self.vision.target()
    }

    /// Adds energy, clamped to the capacity.
    pub fn gain_energy(&mut self, amount: f32) {
        self.set_energy(self.energy + amount);
    }

    /// Removes energy, clamped at zero.
    pub fn consume_energy(&mut self, amount: f32) {
        self.set_energy(self.energy - amount);
    }

    /// Sets energy, clamped to `[0, max_energy]`.
    pub fn set_energy(&mut self, energy: f32) {
        self.energy = energy.clamp(0.0, self.dna.max_energy);
    }

    /// Refreshes perception memory and asks the brain for steering intents.
    pub fn think(&mut self) -> Intent {
        let target = self.target();
        self.perception.observe(&self.vision.buffers, target);
        let inputs = self.perception.inputs(&self.vision.buffers, target);
        self.brain.decide(&inputs)
    }

    /// Turns and moves according to `intent`, wrapping around the world.
    pub fn integrate(&mut self, intent: Intent, box_width: f32, box_height: f32) {
        self.angular_velocity = intent.turn;
        self.angle = normalize_angle(self.angle + intent.turn * self.dna.max_turn_speed);
        self.speed = intent.speed_fraction() * self.dna.max_speed;
        let step = heading_vector(self.angle) * self.speed;
        self.pos = wrap_around(self.pos + step, box_width, box_height);
        self.update_stretch();
    }

    /// Stops the agent in place.
    pub fn halt(&mut self) {
        self.speed = 0.0;
        self.angular_velocity = 0.0;
        self.stretch = 1.0;
    }

    // Stretch along the heading with speed, eased towards the target.
    fn update_stretch(&mut self) {
        let target = 1.0 + (self.speed / self.dna.max_speed).min(1.0) * 0.5;
        self.stretch += (target - self.stretch) * 0.2;
    }

    /// Age in simulated seconds.
    pub fn age_seconds(&self, ticks_per_second: u32) -> f32 {
        self.age as f32 / ticks_per_second.max(1) as f32
    }

    /// Display colour: the species hue, shifted a little every generation.
    pub fn color(&self) -> [u8; 3] {
        let (base_hue, saturation) = match self.species() {
            Species::Prey => (0.56, 0.6),
            Species::Predator => (0.0, 0.7),
        };
        let hue = (base_hue + self.generation as f32 * 0.015).fract();
        hsv_to_rgb(hue, saturation, 1.0)
    }
}

impl Locatable for Agent {
    fn pos(&self) -> Point<f32> {
        self.pos
    }

    fn radius(&self) -> f32 {
        self.radius
    }
}

fn hsv_to_rgb(hue: f32, saturation: f32, value: f32) -> [u8; 3] {
    let sector = (hue * 6.0).floor();
    let f = hue * 6.0 - sector;
    let p = value * (1.0 - saturation);
    let q = value * (1.0 - saturation * f);
    let t = value * (1.0 - saturation * (1.0 - f));
    let (r, g, b) = match sector as i32 % 6 {
        0 => (value, t, p),
        1 => (q, value, p),
        2 => (p, value, t),
        3 => (p, q, value),
        4 => (t, p, value),
        _ => (value, p, q),
    };
    [r, g, b].map(|c| (c * 255.0).round().clamp(0.0, 255.0) as u8)
}
