// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Arena-based storage for the planar half-edge graph.
//!
//! The [`PlanarGraph`] owns every node in a slot map with stable, generational
//! keys. A node is one end of a directed edge: it sits in exactly one face
//! loop (linked by `fsucc`) and one vertex loop (linked by `vsucc`). The two
//! nodes of an undirected edge are tied together implicitly:
//!
//! ```text
//! edge_mate(n)         = vsucc(fsucc(n))
//! reverse_edge_mate(n) = fsucc(vsucc(n))
//! ```
//!
//! so only two links per node are stored. All circulation is derived from
//! them (see `traversal.rs`).

use nalgebra::Point2;
use slotmap::SlotMap;

use crate::error::{Error, Result};
use crate::keys::{NodeKey, NodeMask};

/// Data stored for a node.
#[derive(Debug, Clone)]
pub struct NodeData {
    /// Next node around the face.
    pub fsucc: NodeKey,
    /// Next node around the vertex.
    pub vsucc: NodeKey,
    /// Parametric coordinate of the node's vertex.
    pub uv: Point2<f64>,
    /// Persistent attributes.
    pub mask: NodeMask,
}

/// The central arena that owns all half-edge nodes.
///
/// # Example
///
/// ```
/// use geomkit_topology::PlanarGraph;
/// use nalgebra::Point2;
///
/// let mut graph = PlanarGraph::new();
/// let (a, b) = graph.make_edge(Point2::new(0.0, 0.0), Point2::new(1.0, 0.0));
///
/// assert_eq!(graph.node_count(), 2);
/// assert_eq!(graph.edge_mate(a), b);
/// ```
#[derive(Debug, Clone)]
pub struct PlanarGraph {
    pub(crate) nodes: SlotMap<NodeKey, NodeData>,
}

impl PlanarGraph {
    /// Creates a new, empty graph.
    pub fn new() -> Self {
        Self {
            nodes: SlotMap::with_key(),
        }
    }

    /// Returns the node data for the given key, or `None` if not found.
    pub fn node(&self, key: NodeKey) -> Option<&NodeData> {
        self.nodes.get(key)
    }

    /// Returns `true` if the key references a live node.
    pub fn contains(&self, key: NodeKey) -> bool {
        self.nodes.contains_key(key)
    }

    pub(crate) fn require(&self, key: NodeKey) -> Result<&NodeData> {
        self.nodes.get(key).ok_or(Error::NodeNotFound(key))
    }

    /// Returns the number of nodes (half-edges).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Returns the number of undirected edges.
    pub fn edge_count(&self) -> usize {
        self.nodes.len() / 2
    }

    /// Iterates over all node keys in slot order.
    pub fn nodes(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.nodes.keys()
    }

    // --- Coordinates ---

    /// Returns the parametric coordinate of a node.
    ///
    /// # Panics
    ///
    /// Panics if the key is stale.
    pub fn uv(&self, key: NodeKey) -> Point2<f64> {
        self.nodes[key].uv
    }

    /// Sets the parametric coordinate of a node.
    ///
    /// Only this node is updated; the other nodes of the same vertex keep
    /// their own copy. Use [`PlanarGraph::set_uv_around_vertex`] to move the
    /// whole vertex.
    pub fn set_uv(&mut self, key: NodeKey, uv: Point2<f64>) {
        self.nodes[key].uv = uv;
    }

    /// Sets the coordinate of every node around the vertex of `key`.
    pub fn set_uv_around_vertex(&mut self, key: NodeKey, uv: Point2<f64>) {
        let mut current = key;
        loop {
            self.nodes[current].uv = uv;
            current = self.nodes[current].vsucc;
            if current == key {
                break;
            }
        }
    }

    // --- Masks ---

    /// Returns the persistent mask of a node.
    pub fn mask(&self, key: NodeKey) -> NodeMask {
        self.nodes[key].mask
    }

    /// Returns `true` if the node carries any of the given mask bits.
    pub fn has_mask(&self, key: NodeKey, mask: NodeMask) -> bool {
        self.nodes[key].mask.intersects(mask)
    }

    /// Sets mask bits on one node.
    pub fn set_mask(&mut self, key: NodeKey, mask: NodeMask) {
        self.nodes[key].mask.insert(mask);
    }

    /// Clears mask bits on one node.
    pub fn clear_mask(&mut self, key: NodeKey, mask: NodeMask) {
        self.nodes[key].mask.remove(mask);
    }

    /// Sets mask bits on both nodes of the edge starting at `key`.
    pub fn set_mask_around_edge(&mut self, key: NodeKey, mask: NodeMask) {
        let mate = self.edge_mate(key);
        self.set_mask(key, mask);
        self.set_mask(mate, mask);
    }

    /// Sets mask bits on every node of the face containing `key`.
    pub fn set_mask_around_face(&mut self, key: NodeKey, mask: NodeMask) {
        for node in self.face_nodes(key) {
            self.set_mask(node, mask);
        }
    }

    /// Returns `true` if the edge starting at `key` is fixed and must never
    /// be split.
    pub fn is_fixed_edge(&self, key: NodeKey) -> bool {
        self.has_mask(key, NodeMask::BOUNDARY)
    }

    /// Returns `true` if the node lies in an exterior face.
    pub fn is_exterior(&self, key: NodeKey) -> bool {
        self.has_mask(key, NodeMask::EXTERIOR)
    }
}

impl Default for PlanarGraph {
    fn default() -> Self {
        Self::new()
    }
}
