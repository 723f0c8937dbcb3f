//! Simulation parameters, their defaults, validation and JSON persistence.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::error::ParamsError;

/// Simulation parameters supplied once at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Params {
    /// Seed for the simulation's random number generator.
    pub seed: u64,
    /// Simulation area width.
    pub box_width: f32,
    /// Simulation area height.
    pub box_height: f32,
    /// Edge length of a spatial index cell.
    pub cell_size: f32,
    /// Number of prey placed at world seeding.
    pub n_prey: usize,
    /// Number of predators placed at world seeding.
    pub n_predator: usize,
    /// Hard cap on the living prey population.
    pub max_prey: usize,
    /// Vision is cast every `vision_throttle` ticks.
    pub vision_throttle: u64,
    /// Same-species overlap is resolved every `collision_interval` ticks.
    pub collision_interval: u64,
    /// Ticks per simulated second (used to report ages in seconds).
    pub ticks_per_second: u32,
    /// Hidden layer width of every brain.
    pub hidden_size: usize,
    /// Number of events retained by the event log before the oldest are dropped.
    pub event_log_capacity: usize,
    /// Maximum number of spare vision buffers cached per ray count.
    pub pool_capacity: usize,
    /// Prey physiology.
    pub prey: PreyParams,
    /// Predator physiology.
    pub predator: PredatorParams,
    /// Mutation constants applied at clone time.
    pub mutation: MutationParams,
}

/// Physiological constants for prey.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PreyParams {
    /// Body radius.
    pub radius: f32,
    /// Initial speed cap (heritable).
    pub max_speed: f32,
    /// Initial turn-rate cap in radians per tick (heritable).
    pub max_turn_speed: f32,
    /// Initial energy capacity (heritable).
    pub max_energy: f32,
    /// Energy of a newborn prey.
    pub initial_energy: f32,
    /// Energy regained per tick while resting.
    pub energy_regen: f32,
    /// Energy burned per tick while fleeing.
    pub burn_base: f32,
    /// Additional energy burned per unit of speed while fleeing.
    pub burn_per_speed: f32,
    /// Energy paid by the parent for each child.
    pub reproduction_cost: f32,
    /// Lower bound of the randomized reproduction threshold, as a fraction of `max_energy`.
    pub threshold_min_fraction: f32,
    /// Upper bound of the randomized reproduction threshold, as a fraction of `max_energy`.
    pub threshold_max_fraction: f32,
    /// Age in ticks after which a prey dies.
    pub max_age: u64,
    /// Whether prey die when their energy reaches zero.
    pub starvation_enabled: bool,
    /// Prey keep fleeing this many ticks after losing sight of a predator.
    pub flee_persistence_ticks: u32,
    /// Field of view in radians.
    pub fov: f32,
    /// Maximum vision distance.
    pub view_range: f32,
    /// Initial number of vision rays (heritable).
    pub num_rays: usize,
}

/// Physiological constants for predators.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredatorParams {
    /// Body radius.
    pub radius: f32,
    /// Initial speed cap (heritable).
    pub max_speed: f32,
    /// Initial turn-rate cap in radians per tick (heritable).
    pub max_turn_speed: f32,
    /// Initial energy capacity (heritable).
    pub max_energy: f32,
    /// Energy of a newborn predator.
    pub initial_energy: f32,
    /// Energy burned every tick.
    pub burn_base: f32,
    /// Additional energy burned per unit of speed.
    pub burn_per_speed: f32,
    /// Energy restored by one meal.
    pub meal_energy: f32,
    /// Maximum centre distance at which a prey can be bitten.
    pub bite_range: f32,
    /// Maximum angle between heading and prey direction for a bite, in radians.
    pub bite_angle: f32,
    /// Minimum ticks between two meals.
    pub eat_cooldown_ticks: u64,
    /// Meals needed before the next meal produces a child instead.
    pub eats_to_reproduce: u32,
    /// Ticks without a meal after which a predator starves.
    pub starvation_ticks: u64,
    /// Field of view in radians.
    pub fov: f32,
    /// Maximum vision distance.
    pub view_range: f32,
    /// Initial number of vision rays (heritable).
    pub num_rays: usize,
}

/// Mutation constants.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutationParams {
    /// Standard deviation of the Gaussian noise added to every brain parameter.
    pub weight_rate: f32,
    /// Mean absolute brain perturbation at which a mutation counts as significant.
    pub significant_strength: f32,
    /// Base probability that a single heritable trait mutates.
    pub trait_probability: f32,
    /// Relative standard deviation of a continuous trait mutation.
    pub trait_scale: f32,
    /// Lower bound for speed caps.
    pub min_speed: f32,
    /// Upper bound for speed caps.
    pub max_speed: f32,
    /// Lower bound for turn-rate caps.
    pub min_turn_speed: f32,
    /// Upper bound for turn-rate caps.
    pub max_turn_speed: f32,
    /// Lower bound for energy capacity.
    pub min_energy: f32,
    /// Upper bound for energy capacity.
    pub max_energy: f32,
    /// Fewest vision rays an agent may have.
    pub min_rays: usize,
    /// Most vision rays an agent may have.
    pub max_rays: usize,
}

impl Default for Params {
    fn default() -> Self {
        Self {
            seed: 0x5eed,
            box_width: 1440.0,
            box_height: 1000.0,
            cell_size: 50.0,
            n_prey: 100,
            n_predator: 5,
            max_prey: 100,
            vision_throttle: 3,
            collision_interval: 5,
            ticks_per_second: 30,
            hidden_size: 14,
            event_log_capacity: 4096,
            pool_capacity: 100,
            prey: PreyParams::default(),
            predator: PredatorParams::default(),
            mutation: MutationParams::default(),
        }
    }
}

impl Default for PreyParams {
    fn default() -> Self {
        Self {
            radius: 12.0,
            max_speed: 2.5,
            max_turn_speed: 0.15,
            max_energy: 100.0,
            initial_energy: 50.0,
            energy_regen: 0.25,
            burn_base: 0.5,
            burn_per_speed: 0.5,
            reproduction_cost: 60.0,
            threshold_min_fraction: 0.9,
            threshold_max_fraction: 1.0,
            max_age: 30 * 120,
            starvation_enabled: true,
            flee_persistence_ticks: 15,
            fov: std::f32::consts::TAU,
            view_range: 150.0,
            num_rays: 8,
        }
    }
}

impl Default for PredatorParams {
    fn default() -> Self {
        Self {
            radius: 12.0,
            max_speed: 2.2,
            max_turn_speed: 0.12,
            max_energy: 100.0,
            initial_energy: 100.0,
            burn_base: 0.05,
            burn_per_speed: 0.02,
            meal_energy: 60.0,
            bite_range: 26.0,
            bite_angle: 0.6,
            eat_cooldown_ticks: 30,
            eats_to_reproduce: 3,
            starvation_ticks: 30 * 20,
            fov: std::f32::consts::FRAC_PI_2,
            view_range: 250.0,
            num_rays: 9,
        }
    }
}

impl Default for MutationParams {
    fn default() -> Self {
        Self {
            weight_rate: 0.05,
            significant_strength: 0.05,
            trait_probability: 0.1,
            trait_scale: 0.1,
            min_speed: 0.5,
            max_speed: 8.0,
            min_turn_speed: 0.01,
            max_turn_speed: 1.0,
            min_energy: 10.0,
            max_energy: 500.0,
            min_rays: 3,
            max_rays: 24,
        }
    }
}

impl Params {
    /// Checks that every value can drive a simulation.
    pub fn validate(&self) -> Result<(), ParamsError> {
        if !(self.box_width > 0.0 && self.box_height > 0.0) {
            return Err(ParamsError::InvalidConfig("world bounds must be positive"));
        }
        if !(self.cell_size > 0.0) || !self.cell_size.is_finite() {
            return Err(ParamsError::InvalidConfig("cell_size must be positive"));
        }
        if self.vision_throttle == 0 {
            return Err(ParamsError::InvalidConfig("vision_throttle must be positive"));
        }
        if self.collision_interval == 0 {
            return Err(ParamsError::InvalidConfig(
                "collision_interval must be positive",
            ));
        }
        if self.ticks_per_second == 0 {
            return Err(ParamsError::InvalidConfig("ticks_per_second must be positive"));
        }
        if self.hidden_size == 0 {
            return Err(ParamsError::InvalidConfig("hidden_size must be positive"));
        }
        if self.n_prey > self.max_prey {
            return Err(ParamsError::InvalidConfig("n_prey exceeds max_prey"));
        }

        let prey = &self.prey;
        if prey.num_rays < 2 {
            return Err(ParamsError::InvalidConfig("prey need at least two rays"));
        }
        if !(prey.view_range > 0.0 && prey.fov > 0.0) {
            return Err(ParamsError::InvalidConfig("prey vision must be positive"));
        }
        if !(prey.max_energy > 0.0) || prey.reproduction_cost > prey.max_energy {
            return Err(ParamsError::InvalidConfig(
                "prey reproduction_cost must fit within max_energy",
            ));
        }
        if !(0.0..=1.0).contains(&prey.threshold_min_fraction)
            || !(0.0..=1.0).contains(&prey.threshold_max_fraction)
            || prey.threshold_min_fraction > prey.threshold_max_fraction
        {
            return Err(ParamsError::InvalidConfig(
                "prey threshold fractions must be an ordered range within [0, 1]",
            ));
        }

        let predator = &self.predator;
        if predator.num_rays < 2 {
            return Err(ParamsError::InvalidConfig("predators need at least two rays"));
        }
        if !(predator.view_range > 0.0 && predator.fov > 0.0) {
            return Err(ParamsError::InvalidConfig("predator vision must be positive"));
        }
        if !(predator.max_energy > 0.0) {
            return Err(ParamsError::InvalidConfig("predator max_energy must be positive"));
        }
        if predator.eats_to_reproduce == 0 {
            return Err(ParamsError::InvalidConfig(
                "predator eats_to_reproduce must be positive",
            ));
        }

        let mutation = &self.mutation;
        if mutation.min_rays < 2 || mutation.min_rays > mutation.max_rays {
            return Err(ParamsError::InvalidConfig(
                "mutation ray bounds must be an ordered range starting at two or more",
            ));
        }
        if mutation.weight_rate < 0.0 || mutation.trait_scale < 0.0 {
            return Err(ParamsError::InvalidConfig("mutation scales must be non-negative"));
        }
        if mutation.min_speed > mutation.max_speed
            || mutation.min_turn_speed > mutation.max_turn_speed
            || mutation.min_energy > mutation.max_energy
        {
            return Err(ParamsError::InvalidConfig("mutation trait bounds are inverted"));
        }

        Ok(())
    }

    /// Saves the params to a JSON file.
    pub fn save_to_file(&self, path: impl AsRef<Path>) -> Result<(), ParamsError> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Loads and validates params from a JSON file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, ParamsError> {
        let json = std::fs::read_to_string(path)?;
        let params: Self = serde_json::from_str(&json)?;
        params.validate()?;
        Ok(params)
    }
}
