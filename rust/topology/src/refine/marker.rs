// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Edge marking: which edges does the oracle want split?

use rustc_hash::FxHashSet;

use crate::arena::PlanarGraph;
use crate::oracle::SubdivisionOracle;
use crate::refine::edge_set::EdgeSet;

/// Returns `true` if an oracle result asks for a split.
///
/// Non-finite results are treated as "no split".
#[inline]
pub fn requires_split(edges_required: f64, min_split_count: f64) -> bool {
    edges_required.is_finite() && edges_required > min_split_count
}

/// Evaluates the oracle once per non-fixed edge and returns the edges whose
/// required edge count exceeds `min_split_count`.
///
/// The decision for an edge depends only on the oracle's answer for that
/// edge, never on the order in which edges are visited.
pub fn mark_edges_to_split<O>(graph: &PlanarGraph, oracle: &O, min_split_count: f64) -> EdgeSet
where
    O: SubdivisionOracle + ?Sized,
{
    let mut visited = FxHashSet::default();
    let mut marked = EdgeSet::new();

    for node in graph.nodes() {
        if !visited.insert(node) {
            continue;
        }
        let mate = graph.edge_mate(node);
        visited.insert(mate);

        if graph.is_fixed_edge(node) || graph.is_fixed_edge(mate) {
            continue;
        }

        let required =
            oracle.compute_num_edges_required(graph.uv(node), graph.uv(graph.fsucc(node)));
        if requires_split(required, min_split_count) {
            marked.insert(graph, node);
        }
    }

    marked
}
