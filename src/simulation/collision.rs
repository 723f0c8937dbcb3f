//! Soft overlap resolution between agents of the same species.

use geo::Point;

use super::agent::{Agent, Body};
use super::geometric_utils::{distance, wrap_around};
use super::params::Params;
use super::spatial::SpatialIndex;

/// Pushes apart overlapping agents of the same species.
///
/// Every overlapping pair moves apart along the line between their centres
/// by half the overlap each. Displacements are computed from positions at the
/// time of the call and applied afterwards, so the result does not depend on
/// agent order. Coincident centres separate along the x axis.
///
/// # Returns
///
/// The number of overlapping pairs that were pushed apart.
pub fn resolve_overlaps(agents: &mut [Agent], params: &Params) -> usize {
    if agents.len() < 2 {
        return 0;
    }

    let snapshot: Vec<Body> = agents.iter().map(Body::from).collect();
    let mut grid = SpatialIndex::new(params.cell_size);
    for (index, body) in snapshot.iter().enumerate() {
        grid.insert(index, body);
    }
    let reach = 2.0 * snapshot.iter().map(|b| b.radius).fold(0.0_f32, f32::max);

    let mut displacements = vec![Point::new(0.0_f32, 0.0); snapshot.len()];
    let mut pairs = 0;

    for (i, body) in snapshot.iter().enumerate() {
        for j in grid.neighbors(body, Some(reach)) {
            if j <= i {
                continue;
            }
            let other = &snapshot[j];
            if other.species != body.species {
                continue;
            }

            let d = distance(body.pos, other.pos);
            let overlap = body.radius + other.radius - d;
            if overlap <= 0.0 {
                continue;
            }

            let direction = if d > f32::EPSILON {
                (other.pos - body.pos) / d
            } else {
                Point::new(1.0, 0.0)
            };
            let push = direction * (overlap / 2.0);
            displacements[i] = displacements[i] - push;
            displacements[j] = displacements[j] + push;
            pairs += 1;
        }
    }

    for (agent, displacement) in agents.iter_mut().zip(displacements) {
        agent.pos = wrap_around(
            agent.pos + displacement,
            params.box_width,
            params.box_height,
        );
    }

    pairs
}
