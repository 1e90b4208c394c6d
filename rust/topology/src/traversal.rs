// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Circulation around faces, vertices and edges.
//!
//! All navigation is derived from the two stored links (`fsucc`, `vsucc`).
//! Predecessors are found by walking the loop, which is cheap for the small
//! faces and vertex stars that refinement works on.

use rustc_hash::FxHashSet;
use smallvec::SmallVec;

use crate::arena::PlanarGraph;
use crate::keys::NodeKey;

/// Node list of one face or vertex loop. Triangles and their split
/// polygons (up to hexagons) stay on the stack.
pub type NodeLoop = SmallVec<[NodeKey; 6]>;

impl PlanarGraph {
    /// Returns the next node around the face.
    #[inline]
    pub fn fsucc(&self, key: NodeKey) -> NodeKey {
        self.nodes[key].fsucc
    }

    /// Returns the next node around the vertex.
    #[inline]
    pub fn vsucc(&self, key: NodeKey) -> NodeKey {
        self.nodes[key].vsucc
    }

    /// Returns the previous node around the face.
    pub fn fpred(&self, key: NodeKey) -> NodeKey {
        let mut current = key;
        loop {
            let next = self.fsucc(current);
            if next == key {
                return current;
            }
            current = next;
        }
    }

    /// Returns the previous node around the vertex.
    #[inline]
    pub fn vpred(&self, key: NodeKey) -> NodeKey {
        self.fsucc(self.edge_mate(key))
    }

    /// Returns the node on the other side of the edge leaving `key`; it sits
    /// at the far vertex of that edge.
    #[inline]
    pub fn edge_mate(&self, key: NodeKey) -> NodeKey {
        self.vsucc(self.fsucc(key))
    }

    /// Returns the node on the other side of the edge arriving at `key`; it
    /// sits at the far vertex of that edge.
    #[inline]
    pub fn reverse_edge_mate(&self, key: NodeKey) -> NodeKey {
        self.fsucc(self.vsucc(key))
    }

    /// Returns the nodes of the face containing `seed`, starting at `seed`.
    pub fn face_nodes(&self, seed: NodeKey) -> NodeLoop {
        let mut nodes = NodeLoop::new();
        let mut current = seed;
        loop {
            nodes.push(current);
            current = self.fsucc(current);
            if current == seed {
                return nodes;
            }
        }
    }

    /// Returns the number of edges (equivalently nodes) around a face.
    pub fn face_edge_count(&self, seed: NodeKey) -> usize {
        let mut count = 0;
        let mut current = seed;
        loop {
            count += 1;
            current = self.fsucc(current);
            if current == seed {
                return count;
            }
        }
    }

    /// Returns the nodes around the vertex of `seed`, starting at `seed`.
    pub fn vertex_nodes(&self, seed: NodeKey) -> NodeLoop {
        let mut nodes = NodeLoop::new();
        let mut current = seed;
        loop {
            nodes.push(current);
            current = self.vsucc(current);
            if current == seed {
                return nodes;
            }
        }
    }

    /// Returns one seed node per face, in slot order of the first node seen.
    pub fn face_seeds(&self) -> Vec<NodeKey> {
        let mut visited = FxHashSet::default();
        let mut seeds = Vec::new();
        for key in self.nodes.keys() {
            if visited.contains(&key) {
                continue;
            }
            seeds.push(key);
            let mut current = key;
            loop {
                visited.insert(current);
                current = self.fsucc(current);
                if current == key {
                    break;
                }
            }
        }
        seeds
    }

    /// Returns one seed node per vertex.
    pub fn vertex_seeds(&self) -> Vec<NodeKey> {
        let mut visited = FxHashSet::default();
        let mut seeds = Vec::new();
        for key in self.nodes.keys() {
            if visited.contains(&key) {
                continue;
            }
            seeds.push(key);
            let mut current = key;
            loop {
                visited.insert(current);
                current = self.vsucc(current);
                if current == key {
                    break;
                }
            }
        }
        seeds
    }

    /// Returns one node per undirected edge.
    pub fn edge_seeds(&self) -> Vec<NodeKey> {
        let mut visited = FxHashSet::default();
        let mut seeds = Vec::new();
        for key in self.nodes.keys() {
            if visited.insert(key) {
                visited.insert(self.edge_mate(key));
                seeds.push(key);
            }
        }
        seeds
    }

    /// Returns the number of faces, exterior faces included.
    pub fn face_count(&self) -> usize {
        self.face_seeds().len()
    }

    /// Returns the number of vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertex_seeds().len()
    }

    /// Returns `true` if `a` and `b` lie in the same face loop.
    pub fn same_face(&self, a: NodeKey, b: NodeKey) -> bool {
        let mut current = a;
        loop {
            if current == b {
                return true;
            }
            current = self.fsucc(current);
            if current == a {
                return false;
            }
        }
    }

    /// Returns the edge counts of all interior (non-exterior) faces.
    pub fn interior_face_sizes(&self) -> Vec<usize> {
        self.face_seeds()
            .into_iter()
            .filter(|&seed| !self.is_exterior(seed))
            .map(|seed| self.face_edge_count(seed))
            .collect()
    }
}
