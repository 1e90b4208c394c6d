// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Level sets of a single scalar patch.
//!
//! Each cell's bilinear function is classified as an implicit conic. A
//! hyperbola is cut at the cell edges and at its asymptote and emitted as
//! [`ConicArc`]s; line pairs and single lines are clipped to the cell and
//! emitted as segments. All output is in patch parameters.

use nalgebra::Point2;
use smallvec::SmallVec;

use crate::bilinear::{safe_divide, HyperbolaCoefficients};
use crate::clip::clip_line_to_unit_square;
use crate::collector::{ConicArc, LevelSetCollector};
use crate::conic::ConicClass;
use crate::grid::ControlGrid;

/// Arc pieces shorter than this (in cell parameters) are dropped.
const MIN_PIECE: f64 = 1e-12;

/// Summary of one level-surface scan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LevelScan {
    pub cells: usize,
    pub arcs: usize,
    pub segments: usize,
    /// Cells whose four control values all equal the level.
    pub degenerate_cells: usize,
    /// Cells left out because their classification was not one a bilinear
    /// function can have. Always zero unless classification is broken.
    pub skipped_cells: usize,
}

/// Maps cell-local `[0, 1]²` to patch parameters.
#[derive(Debug, Clone, Copy)]
struct CellFrame {
    origin: Point2<f64>,
    du: f64,
    dv: f64,
}

impl CellFrame {
    fn to_patch(self, s: f64, t: f64) -> Point2<f64> {
        Point2::new(self.origin.x + s * self.du, self.origin.y + t * self.dv)
    }
}

/// Writes the curves where the patch equals `level`.
pub fn add_bezier_level_surface<C>(collector: &mut C, grid: &ControlGrid<'_>, level: f64) -> LevelScan
where
    C: LevelSetCollector + ?Sized,
{
    let (ni, nj) = grid.cell_count();
    let (du, dv) = (grid.du(), grid.dv());
    let mut scan = LevelScan {
        cells: ni * nj,
        ..LevelScan::default()
    };

    for j in 0..nj {
        for i in 0..ni {
            let f = grid.cell(i, j, level);
            let frame = CellFrame {
                origin: Point2::new(i as f64 * du, j as f64 * dv),
                du,
                dv,
            };

            match f.classify() {
                ConicClass::Coincident => scan.degenerate_cells += 1,
                ConicClass::Hyperbola => {
                    scan.arcs += add_hyperbola_arcs(collector, &f, frame);
                }
                ConicClass::LinePair => {
                    scan.segments += add_line_pair(collector, &f, frame);
                }
                ConicClass::SingleLine => {
                    scan.segments += add_clipped_line(collector, f.a, f.b, f.f0, frame);
                }
                // Constant and away from the level.
                ConicClass::Empty => {}
                class @ (ConicClass::Ellipse | ConicClass::Parabola | ConicClass::Point) => {
                    tracing::warn!(i, j, ?class, "Skipped cell with non-bilinear conic class");
                    scan.skipped_cells += 1;
                }
            }
        }
    }

    tracing::debug!(
        cells = scan.cells,
        arcs = scan.arcs,
        segments = scan.segments,
        degenerate_cells = scan.degenerate_cells,
        skipped_cells = scan.skipped_cells,
        "Scanned patch for level set"
    );
    scan
}

fn add_clipped_line<C>(collector: &mut C, a: f64, b: f64, c: f64, frame: CellFrame) -> usize
where
    C: LevelSetCollector + ?Sized,
{
    match clip_line_to_unit_square(a, b, c) {
        Some((p, q)) => {
            collector.add_segment(frame.to_patch(p.x, p.y), frame.to_patch(q.x, q.y));
            1
        }
        None => 0,
    }
}

/// `f = c·(s - s0)·(t - t0)`: the lines `s = s0` and `t = t0`.
fn add_line_pair<C>(collector: &mut C, f: &HyperbolaCoefficients, frame: CellFrame) -> usize
where
    C: LevelSetCollector + ?Sized,
{
    let (Some(s0), Some(t0)) = (safe_divide(-f.b, f.c), safe_divide(-f.a, f.c)) else {
        return 0;
    };
    add_clipped_line(collector, 1.0, 0.0, -s0, frame) + add_clipped_line(collector, 0.0, 1.0, -t0, frame)
}

/// `f = 0` as `(s - s0)·(t - t0) = k`, split into pieces that stay inside
/// the cell on one side of the asymptote.
fn add_hyperbola_arcs<C>(collector: &mut C, f: &HyperbolaCoefficients, frame: CellFrame) -> usize
where
    C: LevelSetCollector + ?Sized,
{
    let (Some(s0), Some(t0), Some(k)) = (
        safe_divide(-f.b, f.c),
        safe_divide(-f.a, f.c),
        safe_divide(f.a * f.b - f.c * f.f0, f.c * f.c),
    ) else {
        return 0;
    };
    // Solved from f directly: with a small twist the centre is far away and
    // going through it cancels badly.
    let t_at = |s: f64| safe_divide(-(f.f0 + f.a * s), f.b + f.c * s);

    // Cell edges, the asymptote, and where the curve meets t = 0 and t = 1.
    let mut breaks: SmallVec<[f64; 5]> = SmallVec::new();
    breaks.push(0.0);
    breaks.push(1.0);
    breaks.push(s0);
    breaks.extend(safe_divide(-f.f0, f.a));
    breaks.extend(safe_divide(-(f.f0 + f.b), f.a + f.c));
    breaks.retain(|s| (0.0..=1.0).contains(s));
    breaks.sort_by(f64::total_cmp);

    let mut count = 0;
    for w in breaks.windows(2) {
        let (lo, hi) = (w[0], w[1]);
        if hi - lo <= MIN_PIECE {
            continue;
        }
        let Some(t_mid) = t_at(0.5 * (lo + hi)) else {
            continue;
        };
        if !(0.0..=1.0).contains(&t_mid) {
            continue;
        }
        collector.add_conic_arc(ConicArc {
            center: frame.to_patch(s0, t0),
            product: k * frame.du * frame.dv,
            u_start: frame.origin.x + lo * frame.du,
            u_end: frame.origin.x + hi * frame.du,
        });
        count += 1;
    }
    count
}
