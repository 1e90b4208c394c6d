// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Error types for planar graph operations.

use crate::keys::NodeKey;

/// Result type alias for planar graph operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during planar graph operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A referenced node was not found in the arena.
    #[error("node not found: {0:?}")]
    NodeNotFound(NodeKey),

    /// A join was requested between nodes of different faces.
    #[error("nodes {0:?} and {1:?} are not in the same face")]
    NotSameFace(NodeKey, NodeKey),

    /// A join was requested between nodes that are already connected by a
    /// face edge (or are the same node).
    #[error("nodes {0:?} and {1:?} are adjacent in their face")]
    AdjacentNodes(NodeKey, NodeKey),

    /// A face references an out-of-range or repeated vertex index, or has
    /// fewer than three vertices.
    #[error("face {0} has an invalid vertex index list")]
    InvalidFace(usize),

    /// The same directed edge is used by two faces (inconsistent
    /// orientation or a non-manifold edge).
    #[error("directed edge ({0}, {1}) is used by more than one face")]
    NonManifoldEdge(usize, usize),

    /// A boundary vertex has more than one outgoing boundary edge.
    #[error("vertex {0} is a non-manifold boundary vertex")]
    NonManifoldVertex(usize),

    /// Refinement found an interior face that is not a triangle.
    #[error("interior face at node {node:?} has {edges} edges, expected 3")]
    NonTriangularFace { node: NodeKey, edges: usize },

    /// Graph links are inconsistent (broken mate or loop).
    #[error("inconsistent topology at node {0:?}: {1}")]
    BrokenTopology(NodeKey, &'static str),

    /// A snapshot references a node index that does not exist.
    #[error("invalid snapshot: {0}")]
    InvalidSnapshot(String),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),
}
