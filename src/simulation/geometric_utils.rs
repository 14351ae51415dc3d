//! Geometric utility functions working in turns.
//!
//! Every angle in the simulation is measured in turns, where `1.0` is a full
//! rotation. These helpers are the only place that converts to radians.

use std::f64::consts::TAU;

use geo::algorithm::Distance;
use geo::{Coord, Euclidean, Point};

/// Sine of an angle given in turns.
pub fn sin(turns: f64) -> f64 {
    (turns * TAU).sin()
}

/// Cosine of an angle given in turns.
pub fn cos(turns: f64) -> f64 {
    (turns * TAU).cos()
}

/// Arcsine in turns. The ratio is clamped to `[-1, 1]`.
pub fn asin(ratio: f64) -> f64 {
    ratio.clamp(-1.0, 1.0).asin() / TAU
}

/// Arccosine in turns, in `[0, 0.5]`. The ratio is clamped to `[-1, 1]`.
pub fn acos(ratio: f64) -> f64 {
    ratio.clamp(-1.0, 1.0).acos() / TAU
}

/// Wraps an angle into `[0, 1)`.
pub fn normalize(turns: f64) -> f64 {
    let wrapped = turns.rem_euclid(1.0);
    // rem_euclid can round up to exactly 1.0 for tiny negative inputs
    if wrapped >= 1.0 { 0.0 } else { wrapped }
}

/// Reflects a heading off a vertical wall (left or right edge).
///
/// The horizontal component changes sign, so east (`0`) becomes west (`0.5`).
pub fn bounce_x(turns: f64) -> f64 {
    normalize(0.5 - turns)
}

/// Reflects a heading off a horizontal wall (top or bottom edge).
pub fn bounce_y(turns: f64) -> f64 {
    normalize(1.0 - turns)
}

/// Unit vector pointing along `turns`.
pub fn direction(turns: f64) -> Coord<f64> {
    Coord {
        x: cos(turns),
        y: sin(turns),
    }
}

/// Point at `distance` from `origin` along `turns`.
pub fn project(origin: Coord<f64>, turns: f64, distance: f64) -> Coord<f64> {
    origin + direction(turns) * distance
}

/// Heading of a vector in turns. The zero vector faces `0`.
///
/// Headings within machine epsilon of a full turn either side of east snap
/// to `0`, so a reflected eastward vector reads back as exactly east.
pub fn angle_of(x: f64, y: f64) -> f64 {
    let length = x.hypot(y);
    if length == 0.0 {
        return 0.0;
    }

    let turns = normalize(y.atan2(x) / TAU);
    if turns < f64::EPSILON || 1.0 - turns < f64::EPSILON {
        0.0
    } else {
        turns
    }
}

/// Euclidean distance between two points.
pub fn distance(a: Coord<f64>, b: Coord<f64>) -> f64 {
    Euclidean.distance(Point::from(a), Point::from(b))
}

/// Dot product of two vectors.
pub fn dot(a: Coord<f64>, b: Coord<f64>) -> f64 {
    a.x * b.x + a.y * b.y
}

/// Keeps a circle's centre inside `[0, extent]` along one axis.
///
/// When the circle is wider than the arena it is centred instead.
pub fn clamp_within(value: f64, radius: f64, extent: f64) -> f64 {
    if extent < radius * 2.0 {
        return extent / 2.0;
    }
    value.clamp(radius, extent - radius)
}
