// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Topological edits: edge creation, edge split and face join.
//!
//! Each edit rewires a constant number of `fsucc`/`vsucc` links so that the
//! derived `edge_mate` relation stays an involution. Callers never touch the
//! links directly.

use nalgebra::Point2;
use rustc_hash::FxHashSet;

use crate::arena::{NodeData, PlanarGraph};
use crate::error::{Error, Result};
use crate::keys::{NodeKey, NodeMask};

impl PlanarGraph {
    pub(crate) fn insert_node(&mut self, uv: Point2<f64>, mask: NodeMask) -> NodeKey {
        let key = self.nodes.insert(NodeData {
            fsucc: NodeKey::default(),
            vsucc: NodeKey::default(),
            uv,
            mask,
        });
        let node = &mut self.nodes[key];
        node.fsucc = key;
        node.vsucc = key;
        key
    }

    /// Creates an isolated edge from `a` to `b`.
    ///
    /// Returns the node at `a` and the node at `b`. Both lie in the same
    /// two-node face loop, and each is alone in its vertex loop.
    pub fn make_edge(&mut self, a: Point2<f64>, b: Point2<f64>) -> (NodeKey, NodeKey) {
        let na = self.insert_node(a, NodeMask::empty());
        let nb = self.insert_node(b, NodeMask::empty());
        self.nodes[na].fsucc = nb;
        self.nodes[nb].fsucc = na;
        (na, nb)
    }

    /// Inserts a vertex on the edge leaving `key`, at `fraction` of the way
    /// from `key` to `fsucc(key)`.
    ///
    /// Returns `(in_face, in_mate_face)`: the new node in `key`'s face and the
    /// new node in the face of `key`'s edge mate. Both receive the
    /// interpolated coordinate and inherit the mask of the node that now
    /// precedes them in their face.
    pub fn split_edge(&mut self, key: NodeKey, fraction: f64) -> Result<(NodeKey, NodeKey)> {
        self.require(key)?;
        let next = self.fsucc(key);
        let mate = self.edge_mate(key);
        let mate_next = self.fsucc(mate);

        let uv = self.point_at_fraction(key, fraction);
        let p = self.insert_node(uv, self.mask(key));
        let q = self.insert_node(uv, self.mask(mate));

        // key -> p -> next, mate -> q -> mate_next
        self.nodes[key].fsucc = p;
        self.nodes[p].fsucc = next;
        self.nodes[mate].fsucc = q;
        self.nodes[q].fsucc = mate_next;

        // The new vertex loop is {p, q}.
        self.nodes[p].vsucc = q;
        self.nodes[q].vsucc = p;

        Ok((p, q))
    }

    /// Returns the point at `fraction` along the edge leaving `key`.
    pub fn point_at_fraction(&self, key: NodeKey, fraction: f64) -> Point2<f64> {
        let a = self.uv(key);
        let b = self.uv(self.fsucc(key));
        a + (b - a) * fraction
    }

    /// Inserts an edge between the vertices of `a` and `b`, which must be
    /// non-adjacent nodes of the same face. The face is split in two.
    ///
    /// Returns `(at_a, at_b)`: the new node at `a`'s vertex, whose face
    /// successor is `b`, and the new node at `b`'s vertex, whose face
    /// successor is `a`. Edge masks are not inherited; face masks
    /// (`EXTERIOR`) are.
    pub fn join(&mut self, a: NodeKey, b: NodeKey) -> Result<(NodeKey, NodeKey)> {
        self.require(a)?;
        self.require(b)?;
        if a == b || self.fsucc(a) == b || self.fsucc(b) == a {
            return Err(Error::AdjacentNodes(a, b));
        }
        if !self.same_face(a, b) {
            return Err(Error::NotSameFace(a, b));
        }

        let pred_a = self.fpred(a);
        let pred_b = self.fpred(b);
        let face_mask = self.mask(a) - NodeMask::EDGE_MASKS;

        let c = self.insert_node(self.uv(a), face_mask);
        let d = self.insert_node(self.uv(b), face_mask);

        // Faces: (c -> b ... pred_a -> c) and (d -> a ... pred_b -> d).
        self.nodes[pred_a].fsucc = c;
        self.nodes[c].fsucc = b;
        self.nodes[pred_b].fsucc = d;
        self.nodes[d].fsucc = a;

        // edge_mate(c) = vsucc(b) must be d, edge_mate(d) = vsucc(a) must be c.
        let after_a = self.vsucc(a);
        let after_b = self.vsucc(b);
        self.nodes[a].vsucc = c;
        self.nodes[c].vsucc = after_a;
        self.nodes[b].vsucc = d;
        self.nodes[d].vsucc = after_b;

        Ok((c, d))
    }

    /// Verifies that every link points at a live node, that `fsucc` and
    /// `vsucc` are permutations, and that `edge_mate` is an involution
    /// pairing nodes at opposite ends of an edge.
    pub fn check_topology(&self) -> Result<()> {
        let mut face_targets = FxHashSet::default();
        let mut vertex_targets = FxHashSet::default();
        for (key, node) in &self.nodes {
            if !self.nodes.contains_key(node.fsucc) {
                return Err(Error::BrokenTopology(key, "dangling face successor"));
            }
            if !self.nodes.contains_key(node.vsucc) {
                return Err(Error::BrokenTopology(key, "dangling vertex successor"));
            }
            // Injective on a finite set, so every face and vertex walk closes.
            if !face_targets.insert(node.fsucc) {
                return Err(Error::BrokenTopology(key, "face successor is shared"));
            }
            if !vertex_targets.insert(node.vsucc) {
                return Err(Error::BrokenTopology(key, "vertex successor is shared"));
            }
        }
        for key in self.nodes.keys() {
            let mate = self.edge_mate(key);
            if mate == key {
                return Err(Error::BrokenTopology(key, "edge is its own mate"));
            }
            if self.edge_mate(mate) != key {
                return Err(Error::BrokenTopology(key, "edge mate is not an involution"));
            }
            if self.fpred(self.fsucc(key)) != key {
                return Err(Error::BrokenTopology(key, "face loop is not a cycle"));
            }
        }
        Ok(())
    }
}
