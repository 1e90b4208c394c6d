// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bilinear cells and the intersection of two oriented hyperbolas.
//!
//! A bilinear function on the unit square
//!
//! ```text
//! f(s, t) = f0 + a·s + b·t + c·s·t
//! ```
//!
//! has a hyperbola (or a line, when `c = 0`) as its zero set. Two such
//! functions share at most two isolated zeros, found here in closed form.

use nalgebra::{Matrix2, Point2, Vector2};
use smallvec::SmallVec;

/// Coefficients below this fraction of the largest one are treated as zero.
pub const RELATIVE_ZERO: f64 = 1e-12;

/// Up to two isolated roots of a cell.
pub type CellRoots = SmallVec<[Point2<f64>; 2]>;

/// `f(s, t) = f0 + a·s + b·t + c·s·t`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HyperbolaCoefficients {
    pub f0: f64,
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

impl HyperbolaCoefficients {
    /// Fits the bilinear function through corner values at `(0,0)`, `(1,0)`,
    /// `(0,1)` and `(1,1)`.
    pub fn from_corners(f00: f64, f10: f64, f01: f64, f11: f64) -> Self {
        Self {
            f0: f00,
            a: f10 - f00,
            b: f01 - f00,
            c: f11 - f10 - f01 + f00,
        }
    }

    #[inline]
    pub fn value(&self, s: f64, t: f64) -> f64 {
        self.f0 + self.a * s + self.b * t + self.c * s * t
    }

    /// `(df/ds, df/dt)`.
    #[inline]
    pub fn gradient(&self, s: f64, t: f64) -> Vector2<f64> {
        Vector2::new(self.a + self.c * t, self.b + self.c * s)
    }

    fn as_array(&self) -> [f64; 4] {
        [self.f0, self.a, self.b, self.c]
    }

    pub(crate) fn max_abs(&self) -> f64 {
        self.as_array().iter().fold(0.0, |m, v| m.max(v.abs()))
    }
}

/// Division that reports a vanishing denominator instead of producing
/// infinities or NaN.
#[inline]
pub fn safe_divide(numerator: f64, denominator: f64) -> Option<f64> {
    let q = numerator / denominator;
    if denominator != 0.0 && q.is_finite() {
        Some(q)
    } else {
        None
    }
}

/// Solves `m · x = rhs`, or `None` if `m` is singular.
pub fn solve_2x2(m: &Matrix2<f64>, rhs: &Vector2<f64>) -> Option<Vector2<f64>> {
    let det = m.determinant();
    let x = safe_divide(rhs.x * m[(1, 1)] - rhs.y * m[(0, 1)], det)?;
    let y = safe_divide(m[(0, 0)] * rhs.y - m[(1, 0)] * rhs.x, det)?;
    Some(Vector2::new(x, y))
}

/// `true` if `f` and `g` are linearly dependent, so that their zero sets
/// coincide (or one of them vanishes identically). Such a pair has a curve
/// of common zeros rather than isolated roots.
pub fn is_degenerate_pair(f: &HyperbolaCoefficients, g: &HyperbolaCoefficients) -> bool {
    let scale = f.max_abs().max(g.max_abs());
    if scale == 0.0 {
        return true;
    }
    let p = f.as_array();
    let q = g.as_array();
    let tol = RELATIVE_ZERO * scale * scale;
    (0..4).all(|i| ((i + 1)..4).all(|j| (p[i] * q[j] - p[j] * q[i]).abs() <= tol))
}

/// Real roots of `q2·x² + q1·x + q0 = 0`.
fn quadratic_roots(q2: f64, q1: f64, q0: f64) -> SmallVec<[f64; 2]> {
    let mut roots = SmallVec::new();
    let scale = q2.abs().max(q1.abs()).max(q0.abs());
    if scale == 0.0 {
        return roots;
    }
    if q2.abs() <= RELATIVE_ZERO * scale {
        roots.extend(safe_divide(-q0, q1));
        return roots;
    }

    let mut disc = q1 * q1 - 4.0 * q2 * q0;
    if disc < 0.0 {
        if disc >= -RELATIVE_ZERO * scale * scale {
            disc = 0.0;
        } else {
            return roots;
        }
    }
    let root = disc.sqrt();
    let q = -0.5 * (q1 + q1.signum() * root);
    if q == 0.0 {
        // q1 and disc both vanish: double root at zero.
        roots.push(0.0);
        return roots;
    }
    roots.extend(safe_divide(q, q2));
    if disc > 0.0 {
        roots.extend(safe_divide(q0, q));
    }
    roots
}

/// Moves values within `tolerance` outside `[0, 1]` onto the boundary.
/// Returns `None` for values further out.
fn snap_to_unit(x: f64, tolerance: f64) -> Option<f64> {
    if (0.0..=1.0).contains(&x) {
        Some(x)
    } else if x < 0.0 && x >= -tolerance {
        Some(0.0)
    } else if x > 1.0 && x <= 1.0 + tolerance {
        Some(1.0)
    } else {
        None
    }
}

/// Isolated common zeros of two bilinear functions inside the unit square.
///
/// Roots that fall within `snap_tolerance` outside the square are snapped
/// onto its boundary. Degenerate pairs (see [`is_degenerate_pair`]) and
/// branches with vanishing denominators yield no roots.
pub fn oriented_hyperbola_intersections(
    f: &HyperbolaCoefficients,
    g: &HyperbolaCoefficients,
    snap_tolerance: f64,
) -> CellRoots {
    let mut roots = CellRoots::new();
    if is_degenerate_pair(f, g) {
        return roots;
    }

    let mut candidates: SmallVec<[(f64, f64); 2]> = SmallVec::new();
    let scale = f.max_abs().max(g.max_abs());
    let tiny = RELATIVE_ZERO * scale;

    if f.c.abs() <= tiny && g.c.abs() <= tiny {
        // Two lines.
        let m = Matrix2::new(f.a, f.b, g.a, g.b);
        if let Some(x) = solve_2x2(&m, &Vector2::new(-f.f0, -g.f0)) {
            candidates.push((x.x, x.y));
        }
    } else {
        // g.c·f - f.c·g cancels the s·t term: alpha + beta·s + gamma·t = 0.
        let alpha = g.c * f.f0 - f.c * g.f0;
        let beta = g.c * f.a - f.c * g.a;
        let gamma = g.c * f.b - f.c * g.b;
        // Substitute into whichever function keeps its s·t term best.
        let p = if f.c.abs() >= g.c.abs() { f } else { g };
        let line_scale = alpha.abs().max(beta.abs()).max(gamma.abs());

        if beta.abs() <= RELATIVE_ZERO * line_scale && gamma.abs() <= RELATIVE_ZERO * line_scale {
            // alpha is a nonzero constant: no common zero.
        } else if beta.abs() >= gamma.abs() {
            // s = s0 + s1·t
            if let (Some(s0), Some(s1)) = (safe_divide(-alpha, beta), safe_divide(-gamma, beta)) {
                let q2 = p.c * s1;
                let q1 = p.a * s1 + p.b + p.c * s0;
                let q0 = p.f0 + p.a * s0;
                for t in quadratic_roots(q2, q1, q0) {
                    candidates.push((s0 + s1 * t, t));
                }
            }
        } else if let (Some(t0), Some(t1)) = (safe_divide(-alpha, gamma), safe_divide(-beta, gamma)) {
            // t = t0 + t1·s
            let q2 = p.c * t1;
            let q1 = p.a + p.b * t1 + p.c * t0;
            let q0 = p.f0 + p.b * t0;
            for s in quadratic_roots(q2, q1, q0) {
                candidates.push((s, t0 + t1 * s));
            }
        }
    }

    for (s, t) in candidates {
        let (Some(s), Some(t)) = (
            snap_to_unit(s, snap_tolerance),
            snap_to_unit(t, snap_tolerance),
        ) else {
            continue;
        };
        let point = Point2::new(s, t);
        if roots
            .iter()
            .all(|r: &Point2<f64>| (r - point).norm() > snap_tolerance)
        {
            roots.push(point);
        }
    }
    roots
}
