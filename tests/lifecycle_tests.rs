#![allow(missing_docs)]
#![allow(clippy::float_cmp)]

use geo::Point;
use predprey::simulation::agent::{
    Agent, AgentId, Body, Kind, Perception, PreyState, Species, UpdateContext, predator, prey,
};
use predprey::simulation::events::{DeathCause, Outcome};
use predprey::simulation::geometric_utils::distance;
use predprey::simulation::params::Params;
use predprey::simulation::pool::VisionPool;
use predprey::simulation::reproduction::{mutation_multiplier, offspring};
use rand::SeedableRng;
use rand::rngs::SmallRng;

fn create_test_params() -> Params {
    Params {
        n_prey: 0,
        n_predator: 0,
        box_width: 500.0,
        box_height: 500.0,
        ..Params::default()
    }
}

fn create_agent(species: Species, params: &Params) -> (Agent, VisionPool, SmallRng) {
    let mut pool = VisionPool::new(8);
    let mut rng = SmallRng::seed_from_u64(7);
    let mut agent = Agent::new_random(
        AgentId(0),
        species,
        Point::new(250.0, 250.0),
        0,
        params,
        &mut pool,
        &mut rng,
    );
    agent.angle = 0.0;
    (agent, pool, rng)
}

fn update(agent: &mut Agent, tick: u64, params: &Params, nearby_prey: &[Body]) -> Outcome {
    let ctx = UpdateContext {
        tick,
        params,
        nearby_prey,
    };
    match agent.kind {
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
    }
}

fn prey_ahead(agent: &Agent, id: u64, gap: f32) -> Body {
    Body {
        id: AgentId(id),
        species: Species::Prey,
        pos: Point::new(agent.pos.x() + gap, agent.pos.y()),
        radius: 12.0,
    }
}

#[test]
fn test_new_agent_invariants() {
    let params = create_test_params();
    for species in [Species::Prey, Species::Predator] {
        let (agent, _, _) = create_agent(species, &params);

        assert_eq!(agent.species(), species);
        assert_eq!(agent.generation, 0);
        assert_eq!(agent.vision.num_rays(), agent.dna.num_rays);
        assert_eq!(
            agent.brain.input_size(),
            Perception::input_size(agent.dna.num_rays)
        );
        assert_eq!(agent.vision.detects, species.detects());
        assert!(agent.energy <= agent.dna.max_energy);
    }
}

#[test]
fn test_energy_is_clamped() {
    let params = create_test_params();
    let (mut agent, _, _) = create_agent(Species::Prey, &params);

    agent.gain_energy(1.0e6);
    assert_eq!(agent.energy, agent.dna.max_energy);

    agent.consume_energy(1.0e6);
    assert_eq!(agent.energy, 0.0);
}

#[test]
fn test_resting_prey_regenerates_without_moving() {
    let params = create_test_params();
    let (mut agent, _, _) = create_agent(Species::Prey, &params);
    let start = agent.pos;
    let energy = agent.energy;

    let outcome = update(&mut agent, 0, &params, &[]);

    assert_eq!(outcome, Outcome::None);
    assert_eq!(agent.pos, start);
    assert_eq!(agent.speed, 0.0);
    assert!((agent.energy - (energy + params.prey.energy_regen)).abs() < 1e-5);
    assert_eq!(agent.age, 1);
}

#[test]
fn test_full_prey_asks_to_reproduce() {
    let params = create_test_params();
    let (mut agent, _, _) = create_agent(Species::Prey, &params);
    agent.energy = agent.dna.max_energy;

    let outcome = update(&mut agent, 0, &params, &[]);
    assert_eq!(outcome, Outcome::Reproduce { consumed: None });
}

#[test]
fn test_prey_below_cost_does_not_ask_to_reproduce() {
    let params = create_test_params();
    let (mut agent, _, _) = create_agent(Species::Prey, &params);
    agent.dna.max_energy = 12.0;
    agent.energy = 12.0;
    agent.kind = Kind::Prey(PreyState {
        reproduction_threshold: 11.0,
    });

    let outcome = update(&mut agent, 0, &params, &[]);
    assert_eq!(outcome, Outcome::None);
    assert!((agent.energy - 12.0).abs() < 1e-6);
}

#[test]
fn test_prey_dies_of_old_age() {
    let params = create_test_params();
    let (mut agent, _, _) = create_agent(Species::Prey, &params);
    agent.age = params.prey.max_age;

    let outcome = update(&mut agent, 0, &params, &[]);
    assert_eq!(outcome, Outcome::Die(DeathCause::OldAge));
}

#[test]
fn test_predator_eats_prey_in_front() {
    let params = create_test_params();
    let (mut agent, _, _) = create_agent(Species::Predator, &params);
    let target = prey_ahead(&agent, 99, 10.0);

    let outcome = update(&mut agent, 5, &params, &[target]);

    assert_eq!(outcome, Outcome::Eat { prey: AgentId(99) });
    let Kind::Predator(state) = agent.kind else {
        panic!("species changed");
    };
    assert_eq!(state.eaten_count, 1);
    assert_eq!(state.total_eaten, 1);
    assert_eq!(state.last_meal_tick, 5);
    assert_eq!(state.last_eat_tick, Some(5));
}

#[test]
fn test_predator_ignores_prey_behind_it() {
    let params = create_test_params();
    let (mut agent, _, _) = create_agent(Species::Predator, &params);
    let behind = prey_ahead(&agent, 99, -20.0);

    let outcome = update(&mut agent, 5, &params, &[behind]);
    assert_eq!(outcome, Outcome::None);
}

#[test]
fn test_predator_respects_eat_cooldown() {
    let params = create_test_params();
    let (mut agent, _, _) = create_agent(Species::Predator, &params);

    let first = prey_ahead(&agent, 1, 10.0);
    assert_eq!(
        update(&mut agent, 0, &params, &[first]),
        Outcome::Eat { prey: AgentId(1) }
    );

    let second = prey_ahead(&agent, 2, 5.0);
    assert_eq!(update(&mut agent, 1, &params, &[second]), Outcome::None);
}

#[test]
fn test_predator_reproduces_on_threshold_meal() {
    let params = create_test_params();
    let (mut agent, _, _) = create_agent(Species::Predator, &params);
    if let Kind::Predator(state) = &mut agent.kind {
        state.eaten_count = params.predator.eats_to_reproduce - 1;
    }
    let target = prey_ahead(&agent, 99, 10.0);

    let outcome = update(&mut agent, 3, &params, &[target]);

    assert_eq!(
        outcome,
        Outcome::Reproduce {
            consumed: Some(AgentId(99))
        }
    );
    let Kind::Predator(state) = agent.kind else {
        panic!("species changed");
    };
    assert_eq!(state.eaten_count, 0);
    assert_eq!(state.total_eaten, 1);
}

#[test]
fn test_predator_starves_without_meals() {
    let params = create_test_params();
    let (mut agent, _, _) = create_agent(Species::Predator, &params);

    let tick = params.predator.starvation_ticks + 1;
    let outcome = update(&mut agent, tick, &params, &[]);
    assert_eq!(outcome, Outcome::Die(DeathCause::Starvation));
}

#[test]
fn test_mutation_multiplier_schedule() {
    assert_eq!(mutation_multiplier(0), 1.8);
    assert_eq!(mutation_multiplier(2), 1.8);
    assert_eq!(mutation_multiplier(3), 1.3);
    assert_eq!(mutation_multiplier(5), 1.3);
    assert_eq!(mutation_multiplier(6), 0.8);
    assert_eq!(mutation_multiplier(100), 0.8);
}

#[test]
fn test_offspring_without_mutation_copies_genome() {
    let mut params = create_test_params();
    params.mutation.weight_rate = 0.0;
    params.mutation.trait_probability = 0.0;
    let (parent, mut pool, mut rng) = create_agent(Species::Prey, &params);

    let (child, summary) = offspring(&parent, AgentId(1), 10, &params, &mut pool, &mut rng);

    assert_eq!(child.generation, parent.generation + 1);
    assert_eq!(child.parent, Some(parent.id));
    assert_eq!(child.birth_tick, 10);
    assert_eq!(child.brain, parent.brain);
    assert_eq!(child.dna, parent.dna);
    assert!(summary.traits.is_empty());
    assert!(!summary.significant);
    assert!((distance(child.pos, parent.pos) - 0.75 * parent.radius).abs() < 1e-3);
    assert_eq!(child.energy, params.prey.initial_energy);
}

#[test]
fn test_ray_mutation_keeps_brain_and_buffers_consistent() {
    let mut params = create_test_params();
    params.mutation.trait_probability = 1.0;
    let (parent, mut pool, mut rng) = create_agent(Species::Predator, &params);

    let (child, summary) = offspring(&parent, AgentId(1), 0, &params, &mut pool, &mut rng);

    assert_ne!(child.dna.num_rays, parent.dna.num_rays);
    assert_eq!(child.vision.num_rays(), child.dna.num_rays);
    assert_eq!(
        child.brain.input_size(),
        Perception::input_size(child.dna.num_rays)
    );
    assert!(summary.significant);
    assert!(!summary.traits.is_empty());
}
