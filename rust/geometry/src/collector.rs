// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Output sinks for intersection results.

use nalgebra::Point2;

/// A hyperbola arc `(u - uc)·(v - vc) = product` over `u ∈ [u_start, u_end]`,
/// in patch parameters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConicArc {
    pub center: Point2<f64>,
    pub product: f64,
    pub u_start: f64,
    pub u_end: f64,
}

impl ConicArc {
    /// Point on the arc at parameter `u`. `u` must not equal `center.x`.
    pub fn point_at(&self, u: f64) -> Point2<f64> {
        Point2::new(u, self.center.y + self.product / (u - self.center.x))
    }

    pub fn start(&self) -> Point2<f64> {
        self.point_at(self.u_start)
    }

    pub fn end(&self) -> Point2<f64> {
        self.point_at(self.u_end)
    }
}

/// Receives the geometry produced by the intersectors.
pub trait LevelSetCollector {
    fn add_point(&mut self, uv: Point2<f64>);
    fn add_conic_arc(&mut self, arc: ConicArc);
    fn add_segment(&mut self, start: Point2<f64>, end: Point2<f64>);
}

/// One item of intersection output.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelGeometry {
    Point(Point2<f64>),
    ConicArc(ConicArc),
    Segment(Point2<f64>, Point2<f64>),
}

/// Collector that stores everything in arrival order.
#[derive(Debug, Clone, Default)]
pub struct GeometryCollector {
    pub items: Vec<LevelGeometry>,
}

impl GeometryCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn clear(&mut self) {
        self.items.clear();
    }

    pub fn points(&self) -> impl Iterator<Item = Point2<f64>> + '_ {
        self.items.iter().filter_map(|item| match item {
            LevelGeometry::Point(p) => Some(*p),
            _ => None,
        })
    }

    pub fn arcs(&self) -> impl Iterator<Item = &ConicArc> + '_ {
        self.items.iter().filter_map(|item| match item {
            LevelGeometry::ConicArc(arc) => Some(arc),
            _ => None,
        })
    }

    pub fn segments(&self) -> impl Iterator<Item = (Point2<f64>, Point2<f64>)> + '_ {
        self.items.iter().filter_map(|item| match item {
            LevelGeometry::Segment(a, b) => Some((*a, *b)),
            _ => None,
        })
    }
}

impl LevelSetCollector for GeometryCollector {
    fn add_point(&mut self, uv: Point2<f64>) {
        self.items.push(LevelGeometry::Point(uv));
    }

    fn add_conic_arc(&mut self, arc: ConicArc) {
        self.items.push(LevelGeometry::ConicArc(arc));
    }

    fn add_segment(&mut self, start: Point2<f64>, end: Point2<f64>) {
        self.items.push(LevelGeometry::Segment(start, end));
    }
}
