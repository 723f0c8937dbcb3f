#![allow(missing_docs)]

use std::f32::consts::{FRAC_PI_2, FRAC_PI_4, TAU};

use geo::Point;
use predprey::simulation::agent::vision::{cast_rays, ray_angles};
use predprey::simulation::agent::{AgentId, Body, HitType, Perception, Species, VisionBuffers};
use predprey::simulation::pool::VisionPool;

const EPS: f32 = 1e-4;

fn body(id: u64, species: Species, x: f32, y: f32) -> Body {
    Body {
        id: AgentId(id),
        species,
        pos: Point::new(x, y),
        radius: 5.0,
    }
}

fn cast(candidates: &[Body], detects: Species, out: &mut VisionBuffers) {
    cast_rays(
        Point::new(0.0, 0.0),
        0.0,
        FRAC_PI_2,
        100.0,
        detects,
        candidates,
        out,
    );
}

#[test]
fn test_single_obstacle_reports_normalized_distance() {
    let candidates = [body(1, Species::Prey, 40.0, 0.0)];
    let mut buffers = VisionBuffers::new(5);
    cast(&candidates, Species::Prey, &mut buffers);

    assert!((buffers.distances[2] - 0.4).abs() < EPS);
    assert_eq!(buffers.hits[2], HitType::Prey);
    for ray in [0, 1, 3, 4] {
        assert!((buffers.distances[ray] - 1.0).abs() < EPS);
        assert_eq!(buffers.hits[ray], HitType::None);
    }
}

#[test]
fn test_closest_candidate_wins() {
    let candidates = [
        body(1, Species::Prey, 60.0, 0.0),
        body(2, Species::Prey, 30.0, 0.0),
    ];
    let mut buffers = VisionBuffers::new(5);
    cast(&candidates, Species::Prey, &mut buffers);

    assert!((buffers.distances[2] - 0.3).abs() < EPS);
}

#[test]
fn test_undetected_species_is_ignored() {
    let candidates = [body(1, Species::Predator, 40.0, 0.0)];
    let mut buffers = VisionBuffers::new(5);
    cast(&candidates, Species::Prey, &mut buffers);

    assert!(buffers.distances.iter().all(|d| (d - 1.0).abs() < EPS));
    assert_eq!(buffers.count_hits(HitType::Predator), 0);
}

#[test]
fn test_bodies_behind_or_out_of_range_are_not_seen() {
    let candidates = [
        body(1, Species::Prey, -40.0, 0.0),
        body(2, Species::Prey, 150.0, 0.0),
    ];
    let mut buffers = VisionBuffers::new(5);
    cast(&candidates, Species::Prey, &mut buffers);

    assert_eq!(buffers.count_hits(HitType::Prey), 0);
}

#[test]
fn test_partial_fov_spans_inclusive_range() {
    let angles = ray_angles(0.0, FRAC_PI_2, 3);
    assert_eq!(angles.len(), 3);
    assert!((angles[0] + FRAC_PI_4).abs() < EPS);
    assert!(angles[1].abs() < EPS);
    assert!((angles[2] - FRAC_PI_4).abs() < EPS);
}

#[test]
fn test_full_turn_has_no_seam_duplicate() {
    let heading = 0.3;
    let angles = ray_angles(heading, TAU, 8);

    assert!((angles[0] - heading).abs() < EPS);
    for pair in angles.windows(2) {
        assert!((pair[1] - pair[0] - TAU / 8.0).abs() < EPS);
    }
    // The last ray stops one step short of wrapping onto the first.
    assert!((angles[7] - angles[0] - 7.0 * TAU / 8.0).abs() < EPS);
}

#[test]
#[should_panic(expected = "at least two rays")]
fn test_single_ray_panics() {
    let _ = ray_angles(0.0, FRAC_PI_2, 1);
}

#[test]
fn test_pooled_buffers_match_fresh_buffers() {
    let clutter = [
        body(1, Species::Prey, 20.0, 5.0),
        body(2, Species::Prey, 50.0, -20.0),
    ];
    let scene = [body(3, Species::Prey, 70.0, 0.0)];

    let mut pool = VisionPool::new(4);
    let mut dirty = pool.take(5);
    cast(&clutter, Species::Prey, &mut dirty);
    pool.give(dirty);

    let mut reused = pool.take(5);
    assert_eq!(reused, VisionBuffers::new(5));
    cast(&scene, Species::Prey, &mut reused);

    let mut fresh = VisionBuffers::new(5);
    cast(&scene, Species::Prey, &mut fresh);

    assert_eq!(reused, fresh);
    let stats = pool.stats();
    assert_eq!(stats.allocations_made, 1);
    assert_eq!(stats.allocations_saved, 1);
    assert!((stats.reuse_rate - 0.5).abs() < EPS);
}

#[test]
fn test_pool_keeps_sizes_apart_and_respects_capacity() {
    let mut pool = VisionPool::new(1);
    pool.give(VisionBuffers::new(4));
    pool.give(VisionBuffers::new(4));
    pool.give(VisionBuffers::new(6));

    assert_eq!(pool.cached(), 2);
    assert_eq!(pool.take(6).len(), 6);
    assert_eq!(pool.take(6).len(), 6);
    assert_eq!(pool.stats().allocations_made, 1);

    pool.clear();
    assert_eq!(pool.cached(), 0);
    assert_eq!(pool.stats().allocations_saved, 0);
}

#[test]
fn test_perception_inputs_layout() {
    let mut buffers = VisionBuffers::new(4);
    buffers.distances[1] = 0.5;
    buffers.hits[1] = HitType::Prey;

    let mut perception = Perception::default();
    assert!(perception.memory().abs() < EPS);

    perception.observe(&buffers, HitType::Prey);
    let inputs = perception.inputs(&buffers, HitType::Prey);
    assert_eq!(inputs.len(), Perception::input_size(4));
    assert!((inputs[1] - 0.5).abs() < EPS);
    assert!(inputs[4].abs() < EPS, "something is in sight");
    assert!((inputs[5] - 1.0).abs() < EPS);
    assert!((inputs[6] - 0.25).abs() < EPS);

    buffers.reset();
    perception.observe(&buffers, HitType::Prey);
    let inputs = perception.inputs(&buffers, HitType::Prey);
    assert!((inputs[4] - 1.0).abs() < EPS);
    assert!((inputs[5] - 0.95).abs() < EPS);
    assert!(inputs[6].abs() < EPS);
    assert_eq!(perception.ticks_since_seen(), Some(1));
    assert!(perception.seen_within(1));
    assert!(!perception.seen_within(0));
}
