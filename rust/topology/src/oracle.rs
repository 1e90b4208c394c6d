// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Caller-supplied subdivision criteria.

use nalgebra::Point2;

/// Decides how many edges an edge between two parametric points should
/// become.
///
/// A result above one means the edge needs more resolution. The oracle only
/// decides *whether* an edge is split; the split point is always the
/// midpoint.
pub trait SubdivisionOracle {
    /// Returns the number of edges required between `a` and `b`.
    fn compute_num_edges_required(&self, a: Point2<f64>, b: Point2<f64>) -> f64;
}

impl<F> SubdivisionOracle for F
where
    F: Fn(Point2<f64>, Point2<f64>) -> f64,
{
    #[inline]
    fn compute_num_edges_required(&self, a: Point2<f64>, b: Point2<f64>) -> f64 {
        self(a, b)
    }
}

/// Requires one edge per `max_length` of parametric distance.
#[derive(Debug, Clone, Copy)]
pub struct MaxEdgeLength {
    pub max_length: f64,
}

impl MaxEdgeLength {
    pub fn new(max_length: f64) -> Self {
        Self { max_length }
    }
}

impl SubdivisionOracle for MaxEdgeLength {
    fn compute_num_edges_required(&self, a: Point2<f64>, b: Point2<f64>) -> f64 {
        if self.max_length <= 0.0 {
            return 0.0;
        }
        (b - a).norm() / self.max_length
    }
}
