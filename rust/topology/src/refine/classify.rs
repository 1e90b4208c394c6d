// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Per-face counts of marked nodes.

use crate::arena::PlanarGraph;
use crate::keys::NodeKey;

/// Result of one pass around a face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceClassification {
    /// Nodes for which the predicate held.
    pub marked: usize,
    /// Nodes (equivalently edges) in the face.
    pub total: usize,
    /// The last marked node met, walking forward from the seed.
    pub last_marked: Option<NodeKey>,
    /// The last unmarked node met, walking forward from the seed.
    pub last_unmarked: Option<NodeKey>,
}

/// Walks the face of `seed` once and counts the nodes accepted by
/// `is_marked`.
///
/// The anchors are the *last* hits of the walk, not the first. Callers
/// depend on that: for a triangle with one unmarked edge, two face steps
/// past `last_unmarked` is the vertex between the two marked edges.
pub fn classify_face<F>(graph: &PlanarGraph, seed: NodeKey, mut is_marked: F) -> FaceClassification
where
    F: FnMut(NodeKey) -> bool,
{
    let mut class = FaceClassification {
        marked: 0,
        total: 0,
        last_marked: None,
        last_unmarked: None,
    };

    let mut current = seed;
    loop {
        class.total += 1;
        if is_marked(current) {
            class.marked += 1;
            class.last_marked = Some(current);
        } else {
            class.last_unmarked = Some(current);
        }
        current = graph.fsucc(current);
        if current == seed {
            return class;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_last_anchors() {
        let graph = PlanarGraph::grid(1, 1).unwrap();
        let seed = graph
            .face_seeds()
            .into_iter()
            .find(|&s| !graph.is_exterior(s))
            .unwrap();
        let nodes = graph.face_nodes(seed);

        let class = classify_face(&graph, seed, |n| n != nodes[2]);
        assert_eq!(class.total, 3);
        assert_eq!(class.marked, 2);
        assert_eq!(class.last_marked, Some(nodes[1]));
        assert_eq!(class.last_unmarked, Some(nodes[2]));

        let none = classify_face(&graph, seed, |_| false);
        assert_eq!(none.marked, 0);
        assert_eq!(none.last_marked, None);
        assert_eq!(none.last_unmarked, Some(nodes[2]));
    }

    #[test]
    fn works_on_any_polygon() {
        let graph = PlanarGraph::grid(2, 1).unwrap();
        let exterior = graph
            .face_seeds()
            .into_iter()
            .find(|&s| graph.is_exterior(s))
            .unwrap();
        let class = classify_face(&graph, exterior, |_| true);
        assert_eq!(class.total, 6);
        assert_eq!(class.marked, 6);
    }
}
