//! Geometric utility functions for distance calculations and spatial operations.

use std::f32::consts::{PI, TAU};

use geo::algorithm::Distance;
use geo::{Euclidean, Line, Point};

/// Calculates the minimum distance between a line segment and a circle center.
///
/// # Arguments
///
/// * `line_start` - Starting point of the line segment
/// * `line_end` - Ending point of the line segment
/// * `circle_center` - Center point of the circle
///
/// # Returns
///
/// The minimum Euclidean distance from the circle center to the line segment.
pub fn line_circle_distance(
    line_start: Point<f32>,
    line_end: Point<f32>,
    circle_center: Point<f32>,
) -> f32 {
    let line = Line::new(line_start, line_end);
    Euclidean.distance(&circle_center, &line)
}

/// Euclidean distance between two points.
pub fn distance(a: Point<f32>, b: Point<f32>) -> f32 {
    Euclidean.distance(&a, &b)
}

/// Wraps a position around the simulation box boundaries (toroidal topology).
///
/// # Arguments
///
/// * `v` - Position to wrap
/// * `box_width` - Width of the simulation box
/// * `box_height` - Height of the simulation box
pub fn wrap_around(v: Point<f32>, box_width: f32, box_height: f32) -> Point<f32> {
    Point::new(
        wrap_coordinate(v.x(), box_width),
        wrap_coordinate(v.y(), box_height),
    )
}

// rem_euclid can round up to exactly `extent` for tiny negative inputs.
fn wrap_coordinate(value: f32, extent: f32) -> f32 {
    let wrapped = value.rem_euclid(extent);
    if wrapped >= extent { 0.0 } else { wrapped }
}

/// Normalizes an angle to `[0, 2π)`.
pub fn normalize_angle(angle: f32) -> f32 {
    wrap_coordinate(angle, TAU)
}

/// Signed smallest difference `to - from`, in `[-π, π)`.
pub fn angle_difference(from: f32, to: f32) -> f32 {
    (to - from + PI).rem_euclid(TAU) - PI
}

/// Unit vector pointing along `angle`.
pub fn heading_vector(angle: f32) -> Point<f32> {
    Point::new(angle.cos(), angle.sin())
}
