// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! A set of undirected edges addressed through either of their half-edges.

use rustc_hash::FxHashSet;

use crate::arena::PlanarGraph;
use crate::keys::NodeKey;

/// Undirected edge set.
///
/// Inserting either half-edge of an edge adds both halves to the membership
/// test, so an edge is recorded once no matter which side reports it. The
/// representative kept for each edge is the half-edge that was inserted
/// first, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct EdgeSet {
    members: FxHashSet<NodeKey>,
    edges: Vec<NodeKey>,
}

impl EdgeSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds the edge leaving `node`. Returns `false` if the edge was already
    /// present through either half.
    pub fn insert(&mut self, graph: &PlanarGraph, node: NodeKey) -> bool {
        if self.members.contains(&node) {
            return false;
        }
        self.members.insert(node);
        self.members.insert(graph.edge_mate(node));
        self.edges.push(node);
        true
    }

    /// Returns `true` if the edge leaving `node` is in the set.
    #[inline]
    pub fn contains(&self, node: NodeKey) -> bool {
        self.members.contains(&node)
    }

    /// Number of undirected edges.
    pub fn len(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }

    /// One representative half-edge per edge, in insertion order.
    pub fn edges(&self) -> &[NodeKey] {
        &self.edges
    }
}
