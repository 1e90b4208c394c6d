// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Clipping lines to the unit square.

use nalgebra::{Point2, Vector2};
use smallvec::SmallVec;

/// Intervals shorter than this (in the line parameter) are dropped.
const MIN_INTERVAL: f64 = 1e-12;

/// Slack for the inside test of interval midpoints.
const INSIDE_TOLERANCE: f64 = 1e-12;

fn inside_unit_square(p: Point2<f64>) -> bool {
    (-INSIDE_TOLERANCE..=1.0 + INSIDE_TOLERANCE).contains(&p.x)
        && (-INSIDE_TOLERANCE..=1.0 + INSIDE_TOLERANCE).contains(&p.y)
}

/// Clips the parametric line `origin + λ·direction` to `[0, 1]²`.
///
/// Collects the line parameters where the line crosses each of the four
/// boundary lines, sorts them and keeps the interval whose midpoint lies in
/// the square. Returns the parameter range, or `None` if the line misses
/// the square or only touches a corner.
pub fn clip_parametric_line(origin: Point2<f64>, direction: Vector2<f64>) -> Option<(f64, f64)> {
    let mut crossings: SmallVec<[f64; 5]> = SmallVec::new();
    for boundary in [0.0, 1.0] {
        if direction.x != 0.0 {
            crossings.push((boundary - origin.x) / direction.x);
        }
        if direction.y != 0.0 {
            crossings.push((boundary - origin.y) / direction.y);
        }
    }
    crossings.sort_by(f64::total_cmp);

    crossings
        .windows(2)
        .filter(|w| w[1] - w[0] > MIN_INTERVAL)
        .find(|w| inside_unit_square(origin + direction * (0.5 * (w[0] + w[1]))))
        .map(|w| (w[0], w[1]))
}

/// Clips the implicit line `a·x + b·y + c = 0` to `[0, 1]²`.
///
/// Returns the end points of the visible segment.
pub fn clip_line_to_unit_square(a: f64, b: f64, c: f64) -> Option<(Point2<f64>, Point2<f64>)> {
    let norm2 = a * a + b * b;
    if norm2 == 0.0 {
        return None;
    }
    let origin = Point2::new(-a * c / norm2, -b * c / norm2);
    let direction = Vector2::new(-b, a);
    let (lo, hi) = clip_parametric_line(origin, direction)?;
    Some((origin + direction * lo, origin + direction * hi))
}
