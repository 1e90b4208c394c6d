// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Adaptive edge refinement of a triangulated planar graph.
//!
//! One call to [`refine_surface`] runs these phases:
//!
//! 1. **Mark** every non-fixed edge the oracle wants split.
//! 2. **Classify** each interior triangle by its number of marked edges:
//!    one marked edge is split only if the face on the other side also sees
//!    exactly one; two marked edges register a home node for chain
//!    resolution; three marked edges are all split.
//! 3. **Resolve chains** of two-split triangles so that every other shared
//!    edge is split.
//! 4. **Split** each chosen edge at its midpoint.
//! 5. **Retriangulate** each face that received new vertices: a quad gets one
//!    diagonal, a pentagon two, a hexagon three.
//!
//! The result is still fully triangulated. Exterior faces are never
//! classified or retriangulated.

pub mod chain;
pub mod classify;
pub mod edge_set;
pub mod marker;

use rustc_hash::FxHashSet;

use crate::arena::PlanarGraph;
use crate::error::{Error, Result};
use crate::keys::NodeKey;
use crate::oracle::SubdivisionOracle;

pub use chain::{Chain, ChainStepper};
pub use classify::{classify_face, FaceClassification};
pub use edge_set::EdgeSet;
pub use marker::{mark_edges_to_split, requires_split};

/// Oracle results must exceed this to request a split: "more than one edge's
/// worth" with a little room for round-off.
pub const DEFAULT_MIN_SPLIT_COUNT: f64 = 1.0000001;

/// Edges are always split at their parametric midpoint.
pub const SPLIT_FRACTION: f64 = 0.5;

/// Tunables for [`refine_surface_with_options`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RefineOptions {
    /// Oracle results above this mark an edge for splitting.
    pub min_split_count: f64,
}

impl Default for RefineOptions {
    fn default() -> Self {
        Self {
            min_split_count: DEFAULT_MIN_SPLIT_COUNT,
        }
    }
}

impl RefineOptions {
    pub fn with_min_split_count(mut self, min_split_count: f64) -> Self {
        self.min_split_count = min_split_count;
        self
    }
}

/// Counts gathered during one refinement call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefineStats {
    /// Edges the oracle asked to split.
    pub marked_edges: usize,
    /// Two-split triangles that entered chain resolution.
    pub home_vertices: usize,
    /// Chains walked.
    pub chains: usize,
    /// Edges physically split.
    pub split_edges: usize,
    /// Faces added by retriangulation.
    pub new_faces: usize,
}

/// Refines `graph` so that the oracle's requests are met by one round of
/// midpoint splits. Returns the number of edges split.
///
/// # Errors
///
/// Returns [`Error::NonTriangularFace`] without touching the graph if an
/// interior face is not a triangle.
///
/// # Panics
///
/// Panics if a face ends up with a split pattern the marking phases can
/// never produce; that is a bug, not an input condition.
pub fn refine_surface<O>(graph: &mut PlanarGraph, oracle: &O) -> Result<usize>
where
    O: SubdivisionOracle + ?Sized,
{
    refine_surface_with_options(graph, oracle, &RefineOptions::default())
}

/// [`refine_surface`] with explicit options.
pub fn refine_surface_with_options<O>(
    graph: &mut PlanarGraph,
    oracle: &O,
    options: &RefineOptions,
) -> Result<usize>
where
    O: SubdivisionOracle + ?Sized,
{
    refine_surface_with_stats(graph, oracle, options).map(|stats| stats.split_edges)
}

/// [`refine_surface`] returning per-phase counts.
pub fn refine_surface_with_stats<O>(
    graph: &mut PlanarGraph,
    oracle: &O,
    options: &RefineOptions,
) -> Result<RefineStats>
where
    O: SubdivisionOracle + ?Sized,
{
    validate_triangles(graph)?;

    let mut stats = RefineStats::default();

    let marked = mark_edges_to_split(graph, oracle, options.min_split_count);
    stats.marked_edges = marked.len();
    tracing::debug!(marked = marked.len(), "Marked edges for refinement");
    if marked.is_empty() {
        return Ok(stats);
    }

    let Selection {
        mut split,
        homes,
        home_order,
    } = select_edges(graph, &marked);
    stats.home_vertices = home_order.len();
    tracing::debug!(
        selected = split.len(),
        homes = home_order.len(),
        "Classified triangles"
    );

    stats.chains = resolve_chains(graph, homes, &home_order, &mut split);
    tracing::debug!(chains = stats.chains, split = split.len(), "Resolved two-split chains");

    let new_vertices = split_edges(graph, &split)?;
    stats.split_edges = split.len();

    stats.new_faces = retriangulate(graph, &new_vertices)?;
    tracing::info!(
        marked = stats.marked_edges,
        split = stats.split_edges,
        new_faces = stats.new_faces,
        "Refined planar graph"
    );

    Ok(stats)
}

fn validate_triangles(graph: &PlanarGraph) -> Result<()> {
    for seed in graph.face_seeds() {
        if graph.is_exterior(seed) {
            continue;
        }
        let edges = graph.face_edge_count(seed);
        if edges != 3 {
            return Err(Error::NonTriangularFace { node: seed, edges });
        }
    }
    Ok(())
}

struct Selection {
    split: EdgeSet,
    homes: FxHashSet<NodeKey>,
    home_order: Vec<NodeKey>,
}

/// Phase 2: one pass over the interior triangles.
fn select_edges(graph: &PlanarGraph, marked: &EdgeSet) -> Selection {
    let mut split = EdgeSet::new();
    let mut homes = FxHashSet::default();
    let mut home_order = Vec::new();
    let is_marked = |n: NodeKey| marked.contains(n);

    for seed in graph.face_seeds() {
        if graph.is_exterior(seed) {
            continue;
        }
        let class = classify_face(graph, seed, is_marked);
        match (class.marked, class.last_marked, class.last_unmarked) {
            (0, _, _) => {}
            (1, Some(node), _) => {
                // Only split if the other side agrees on a lone marked edge.
                let mate = graph.edge_mate(node);
                if graph.is_exterior(mate) || classify_face(graph, mate, is_marked).marked == 1 {
                    split.insert(graph, node);
                }
            }
            (2, _, Some(unmarked)) => {
                let home = graph.fsucc(graph.fsucc(unmarked));
                if homes.insert(home) {
                    home_order.push(home);
                }
            }
            _ => {
                for node in graph.face_nodes(seed) {
                    split.insert(graph, node);
                }
            }
        }
    }

    Selection {
        split,
        homes,
        home_order,
    }
}

/// Phase 3: choose alternating shared edges along each two-split chain.
fn resolve_chains(
    graph: &PlanarGraph,
    mut homes: FxHashSet<NodeKey>,
    home_order: &[NodeKey],
    split: &mut EdgeSet,
) -> usize {
    let mut chains = 0;
    for &start in home_order {
        if !homes.contains(&start) {
            continue;
        }
        let chain = Chain::trace(graph, &homes, start);
        for edge in chain.alternate_edges() {
            split.insert(graph, edge);
        }
        for &(home, _) in &chain.links {
            homes.remove(&home);
        }
        // A trace always includes its start; make sure the loop progresses.
        homes.remove(&start);
        chains += 1;
    }
    chains
}

/// Phase 4: split every selected edge at its midpoint. Returns the new
/// vertex nodes (both sides of each split).
fn split_edges(graph: &mut PlanarGraph, split: &EdgeSet) -> Result<FxHashSet<NodeKey>> {
    let mut new_vertices = FxHashSet::default();
    for &node in split.edges() {
        let (in_face, in_mate_face) = graph.split_edge(node, SPLIT_FRACTION)?;
        new_vertices.insert(in_face);
        new_vertices.insert(in_mate_face);
    }
    Ok(new_vertices)
}

/// Phase 5: cut each split triangle back into triangles. Returns the number
/// of faces added.
fn retriangulate(graph: &mut PlanarGraph, new_vertices: &FxHashSet<NodeKey>) -> Result<usize> {
    let mut new_faces = 0;
    for seed in graph.face_seeds() {
        if graph.is_exterior(seed) {
            continue;
        }
        let class = classify_face(graph, seed, |n| new_vertices.contains(&n));
        match (class.marked, class.total, class.last_marked) {
            (0, 3, _) => {}
            (1, 4, Some(node)) => {
                split_quad(graph, node)?;
                new_faces += 1;
            }
            (2, 5, Some(node)) => {
                split_pentagon(graph, new_vertices, node)?;
                new_faces += 2;
            }
            (3, 6, Some(node)) => {
                split_hexagon(graph, new_vertices, node)?;
                new_faces += 3;
            }
            (marked, total, _) => panic!(
                "face at {seed:?} has {marked} new vertices and {total} edges after splitting"
            ),
        }
    }
    Ok(new_faces)
}

/// Quad with one new vertex: connect it to the opposite corner.
fn split_quad(graph: &mut PlanarGraph, new_vertex: NodeKey) -> Result<()> {
    let opposite = graph.fsucc(graph.fsucc(new_vertex));
    graph.join(new_vertex, opposite)?;
    Ok(())
}

/// Pentagon with two new vertices: cut off the corner between them, then
/// split the remaining quad.
fn split_pentagon(
    graph: &mut PlanarGraph,
    new_vertices: &FxHashSet<NodeKey>,
    any_new: NodeKey,
) -> Result<()> {
    // Order the pair so that `second` is two face steps after `first`.
    let mut first = any_new;
    let mut second = graph.fsucc(graph.fsucc(first));
    if !new_vertices.contains(&second) {
        second = first;
        first = graph.fsucc(graph.fsucc(graph.fsucc(second)));
    }
    assert!(
        new_vertices.contains(&first) && new_vertices.contains(&second),
        "pentagon new vertices are not two steps apart"
    );

    let (at_first, _) = graph.join(first, second)?;
    let corner = graph.fsucc(second);
    graph.join(at_first, corner)?;
    Ok(())
}

/// Hexagon with three new vertices: connect them pairwise, leaving the
/// center triangle and three corner triangles.
fn split_hexagon(
    graph: &mut PlanarGraph,
    new_vertices: &FxHashSet<NodeKey>,
    any_new: NodeKey,
) -> Result<()> {
    let n1 = any_new;
    let n2 = graph.fsucc(graph.fsucc(n1));
    let n3 = graph.fsucc(graph.fsucc(n2));
    assert!(
        new_vertices.contains(&n2) && new_vertices.contains(&n3),
        "hexagon does not alternate new and original vertices"
    );

    let (c1, _) = graph.join(n1, n2)?;
    graph.join(n2, n3)?;
    graph.join(n3, c1)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use nalgebra::Point2;

    use super::*;

    fn interior_seeds(graph: &PlanarGraph) -> Vec<NodeKey> {
        graph
            .face_seeds()
            .into_iter()
            .filter(|&s| !graph.is_exterior(s))
            .collect()
    }

    /// Deterministic edge scores in `[0, 2)` that depend only on the edge
    /// midpoint, so both half-edges agree.
    fn scrambled_oracle(seed: u32) -> impl Fn(Point2<f64>, Point2<f64>) -> f64 {
        move |a: Point2<f64>, b: Point2<f64>| {
            let m = nalgebra::center(&a, &b);
            let h = (m.x * 12.9898 + m.y * 78.233 + f64::from(seed) * 0.618).sin() * 43758.5453;
            h.fract().abs() * 2.0
        }
    }

    #[test]
    fn selected_edges_agree_from_both_faces() {
        for seed in 0..40 {
            let mut graph = PlanarGraph::grid(5, 4).unwrap();
            if seed % 2 == 0 {
                graph.fix_boundary();
            }
            let oracle = scrambled_oracle(seed);

            let marked = mark_edges_to_split(&graph, &oracle, DEFAULT_MIN_SPLIT_COUNT);
            let Selection {
                mut split,
                homes,
                home_order,
            } = select_edges(&graph, &marked);
            resolve_chains(&graph, homes, &home_order, &mut split);

            for node in graph.nodes() {
                let mate = graph.edge_mate(node);
                assert_eq!(split.contains(node), split.contains(mate), "seed {seed}");
                if split.contains(node) {
                    assert!(marked.contains(node), "seed {seed}: unmarked edge selected");
                    assert!(!graph.is_fixed_edge(node), "seed {seed}: fixed edge selected");
                }
            }
            for face in interior_seeds(&graph) {
                let selected = graph
                    .face_nodes(face)
                    .iter()
                    .filter(|&&n| split.contains(n))
                    .count();
                assert!(selected <= 3, "seed {seed}: {selected} edges selected in a triangle");
            }

            let stats =
                refine_surface_with_stats(&mut graph, &oracle, &RefineOptions::default()).unwrap();
            assert_eq!(stats.split_edges, split.len(), "seed {seed}");
            assert!(graph.interior_face_sizes().iter().all(|&n| n == 3));
            graph.check_topology().unwrap();
        }
    }

    #[test]
    fn no_marks_is_a_no_op() {
        let mut graph = PlanarGraph::grid(3, 3).unwrap();
        let nodes = graph.node_count();
        let split = refine_surface(&mut graph, &|_: Point2<f64>, _: Point2<f64>| 1.0).unwrap();
        assert_eq!(split, 0);
        assert_eq!(graph.node_count(), nodes);
    }

    #[test]
    fn options_raise_the_threshold() {
        let mut graph = PlanarGraph::grid(2, 2).unwrap();
        let options = RefineOptions::default().with_min_split_count(5.0);
        let oracle = |_: Point2<f64>, _: Point2<f64>| 3.0;
        let split = refine_surface_with_options(&mut graph, &oracle, &options).unwrap();
        assert_eq!(split, 0);
    }

    #[test]
    fn rejects_non_triangular_faces() {
        let points = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let mut graph = PlanarGraph::from_polygon(&points).unwrap();
        let err = refine_surface(&mut graph, &|_: Point2<f64>, _: Point2<f64>| 4.0).unwrap_err();
        assert!(matches!(err, Error::NonTriangularFace { edges: 4, .. }));
        assert_eq!(graph.node_count(), 8);
    }

    #[test]
    fn all_edges_marked_quadruples_triangles() {
        let mut graph = PlanarGraph::grid(2, 2).unwrap();
        let edges = graph.edge_count();
        let stats = refine_surface_with_stats(
            &mut graph,
            &|_: Point2<f64>, _: Point2<f64>| 3.0,
            &RefineOptions::default(),
        )
        .unwrap();

        assert_eq!(stats.split_edges, edges);
        assert_eq!(stats.new_faces, 8 * 3);
        assert_eq!(interior_seeds(&graph).len(), 32);
        assert!(graph.interior_face_sizes().iter().all(|&n| n == 3));
        graph.check_topology().unwrap();
    }

    #[test]
    fn lone_marked_edge_needs_agreement() {
        // Mark only the diagonal of a single square: both triangles see one
        // marked edge, so the diagonal is split and each becomes two.
        let mut graph = PlanarGraph::grid(1, 1).unwrap();
        let oracle = |a: Point2<f64>, b: Point2<f64>| if (b - a).norm() > 1.2 { 2.0 } else { 0.0 };
        let split = refine_surface(&mut graph, &oracle).unwrap();
        assert_eq!(split, 1);
        assert_eq!(interior_seeds(&graph).len(), 4);
        assert!(graph.interior_face_sizes().iter().all(|&n| n == 3));
    }

    #[test]
    fn lone_mark_rejected_when_neighbor_disagrees() {
        // Two triangles share the diagonal. Triangle A sees only the
        // diagonal marked; triangle B sees the diagonal and one more edge.
        let points = [
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ];
        let mut graph = PlanarGraph::from_triangles(&points, &[[0, 1, 2], [0, 2, 3]]).unwrap();
        let left_edge = |a: Point2<f64>, b: Point2<f64>| a.x == 0.0 && b.x == 0.0;
        let diagonal = |a: Point2<f64>, b: Point2<f64>| (b - a).norm() > 1.2;
        let oracle = move |a: Point2<f64>, b: Point2<f64>| {
            if diagonal(a, b) || left_edge(a, b) {
                2.0
            } else {
                0.0
            }
        };

        let marked = mark_edges_to_split(&graph, &oracle, DEFAULT_MIN_SPLIT_COUNT);
        assert_eq!(marked.len(), 2);
        let selection = select_edges(&graph, &marked);
        // The lone diagonal of triangle A is not accepted directly; triangle
        // B becomes a home for chain resolution instead.
        assert!(selection.split.is_empty());
        assert_eq!(selection.home_order.len(), 1);

        let split = refine_surface(&mut graph, &oracle).unwrap();
        assert_eq!(split, 1);
        assert!(graph.interior_face_sizes().iter().all(|&n| n == 3));
        graph.check_topology().unwrap();
    }

    #[test]
    fn stats_count_homes_and_chains() {
        // One row of two squares with a fixed boundary. Only the two
        // diagonals and the shared vertical edge can be marked. The lower
        // right and upper left triangles see two marked edges each and form
        // one chain across the vertical edge; the other two see one marked
        // edge whose neighbor disagrees.
        let mut graph = PlanarGraph::grid(2, 1).unwrap();
        graph.fix_boundary();
        let stats = refine_surface_with_stats(
            &mut graph,
            &|_: Point2<f64>, _: Point2<f64>| 2.0,
            &RefineOptions::default(),
        )
        .unwrap();

        assert_eq!(stats.marked_edges, 3);
        assert_eq!(stats.home_vertices, 2);
        assert_eq!(stats.chains, 1);
        assert_eq!(stats.split_edges, 1);
        assert_eq!(stats.new_faces, 2);
        assert_eq!(interior_seeds(&graph).len(), 6);
        assert!(graph.interior_face_sizes().iter().all(|&n| n == 3));
        graph.check_topology().unwrap();
    }
}
