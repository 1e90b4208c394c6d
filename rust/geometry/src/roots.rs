// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Common roots of two scalar patches.
//!
//! Both patches are scanned cell by cell. Within a cell each patch is
//! replaced by the bilinear function through its four control values, and
//! the two resulting hyperbolas are intersected in closed form. The bezier
//! variant then polishes each root with Newton-Raphson on the true patch
//! functions.

use nalgebra::{Matrix2, Point2, Vector2};

use crate::bilinear::{is_degenerate_pair, oriented_hyperbola_intersections, solve_2x2};
use crate::collector::LevelSetCollector;
use crate::error::{Error, Result};
use crate::grid::ControlGrid;

pub const DEFAULT_NEWTON_ITERATIONS: usize = 8;
pub const DEFAULT_NEWTON_TOLERANCE: f64 = 1e-10;
pub const DEFAULT_SNAP_TOLERANCE: f64 = 1e-10;

/// Roots closer than this in patch parameters are reported once.
const MERGE_TOLERANCE: f64 = 1e-8;

/// Tunables for the common-root intersectors.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct IntersectOptions {
    /// Maximum Newton-Raphson steps per root.
    pub newton_iterations: usize,
    /// A root is converged once both parameter steps are below this.
    pub newton_tolerance: f64,
    /// Cell roots this far outside the unit square are moved onto its edge.
    pub snap_tolerance: f64,
}

impl Default for IntersectOptions {
    fn default() -> Self {
        Self {
            newton_iterations: DEFAULT_NEWTON_ITERATIONS,
            newton_tolerance: DEFAULT_NEWTON_TOLERANCE,
            snap_tolerance: DEFAULT_SNAP_TOLERANCE,
        }
    }
}

impl IntersectOptions {
    pub fn with_newton_iterations(mut self, iterations: usize) -> Self {
        self.newton_iterations = iterations;
        self
    }

    pub fn with_newton_tolerance(mut self, tolerance: f64) -> Self {
        self.newton_tolerance = tolerance;
        self
    }

    pub fn with_snap_tolerance(mut self, tolerance: f64) -> Self {
        self.snap_tolerance = tolerance;
        self
    }
}

/// Summary of one common-root scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RootScan {
    /// Cells visited.
    pub cells: usize,
    /// Points written to the collector.
    pub roots: usize,
    /// Points that came from a converged Newton iteration.
    pub refined: usize,
    /// Cells where the two level sets overlap along a curve (or the whole
    /// cell) instead of crossing at isolated points. Nothing is emitted for
    /// them.
    pub degenerate_cells: usize,
}

/// Writes the common roots of `a = level_a` and `b = level_b`, using the
/// bilinear cell approximation only.
pub fn add_bilinear_common_roots<C>(
    collector: &mut C,
    a: &ControlGrid<'_>,
    level_a: f64,
    b: &ControlGrid<'_>,
    level_b: f64,
) -> Result<RootScan>
where
    C: LevelSetCollector + ?Sized,
{
    add_bilinear_common_roots_with_options(
        collector,
        a,
        level_a,
        b,
        level_b,
        &IntersectOptions::default(),
    )
}

pub fn add_bilinear_common_roots_with_options<C>(
    collector: &mut C,
    a: &ControlGrid<'_>,
    level_a: f64,
    b: &ControlGrid<'_>,
    level_b: f64,
    options: &IntersectOptions,
) -> Result<RootScan>
where
    C: LevelSetCollector + ?Sized,
{
    scan_common_roots(collector, (a, level_a), (b, level_b), options, false)
}

/// Writes the common roots of `a = level_a` and `b = level_b`, refining the
/// bilinear estimates with Newton-Raphson on the bezier functions.
///
/// Estimates whose iteration fails to converge are reported unrefined.
pub fn add_bezier_common_roots<C>(
    collector: &mut C,
    a: &ControlGrid<'_>,
    level_a: f64,
    b: &ControlGrid<'_>,
    level_b: f64,
) -> Result<RootScan>
where
    C: LevelSetCollector + ?Sized,
{
    add_bezier_common_roots_with_options(
        collector,
        a,
        level_a,
        b,
        level_b,
        &IntersectOptions::default(),
    )
}

pub fn add_bezier_common_roots_with_options<C>(
    collector: &mut C,
    a: &ControlGrid<'_>,
    level_a: f64,
    b: &ControlGrid<'_>,
    level_b: f64,
    options: &IntersectOptions,
) -> Result<RootScan>
where
    C: LevelSetCollector + ?Sized,
{
    scan_common_roots(collector, (a, level_a), (b, level_b), options, true)
}

fn scan_common_roots<C>(
    collector: &mut C,
    (a, level_a): (&ControlGrid<'_>, f64),
    (b, level_b): (&ControlGrid<'_>, f64),
    options: &IntersectOptions,
    refine: bool,
) -> Result<RootScan>
where
    C: LevelSetCollector + ?Sized,
{
    if a.counts() != b.counts() {
        return Err(Error::GridMismatch {
            left: a.counts(),
            right: b.counts(),
        });
    }

    let (ni, nj) = a.cell_count();
    let (du, dv) = (a.du(), a.dv());
    let mut scan = RootScan {
        cells: ni * nj,
        ..RootScan::default()
    };
    let mut emitted: Vec<Point2<f64>> = Vec::new();

    for j in 0..nj {
        for i in 0..ni {
            let f = a.cell(i, j, level_a);
            let g = b.cell(i, j, level_b);
            if is_degenerate_pair(&f, &g) {
                scan.degenerate_cells += 1;
                continue;
            }

            for local in oriented_hyperbola_intersections(&f, &g, options.snap_tolerance) {
                let estimate = Point2::new((i as f64 + local.x) * du, (j as f64 + local.y) * dv);
                let refined = if refine {
                    newton_refine((a, level_a), (b, level_b), estimate, options)
                } else {
                    None
                };
                let uv = refined.unwrap_or(estimate);

                if emitted.iter().any(|p| (p - uv).norm() <= MERGE_TOLERANCE) {
                    continue;
                }
                emitted.push(uv);
                collector.add_point(uv);
                scan.roots += 1;
                if refined.is_some() {
                    scan.refined += 1;
                }
            }
        }
    }

    tracing::debug!(
        cells = scan.cells,
        roots = scan.roots,
        refined = scan.refined,
        degenerate_cells = scan.degenerate_cells,
        "Scanned patches for common roots"
    );
    Ok(scan)
}

/// Newton-Raphson on `a(u, v) = level_a`, `b(u, v) = level_b` from `start`.
///
/// Each step is limited to one cell in each direction and the iterate is
/// kept inside the unit square. Returns `None` if the Jacobian becomes
/// singular or the iteration does not converge.
pub fn newton_refine(
    (a, level_a): (&ControlGrid<'_>, f64),
    (b, level_b): (&ControlGrid<'_>, f64),
    start: Point2<f64>,
    options: &IntersectOptions,
) -> Option<Point2<f64>> {
    let (max_du, max_dv) = (a.du(), a.dv());
    let (mut u, mut v) = (start.x, start.y);

    for _ in 0..options.newton_iterations {
        let (fa, fa_u, fa_v) = a.evaluate_with_derivatives(u, v);
        let (fb, fb_u, fb_v) = b.evaluate_with_derivatives(u, v);
        let jacobian = Matrix2::new(fa_u, fa_v, fb_u, fb_v);
        let step = solve_2x2(&jacobian, &Vector2::new(fa - level_a, fb - level_b))?;

        let du = step.x.clamp(-max_du, max_du);
        let dv = step.y.clamp(-max_dv, max_dv);
        u = (u - du).clamp(0.0, 1.0);
        v = (v - dv).clamp(0.0, 1.0);

        if du.abs() < options.newton_tolerance && dv.abs() < options.newton_tolerance {
            return Some(Point2::new(u, v));
        }
    }
    None
}
