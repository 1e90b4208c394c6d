// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON serialization for planar graphs.
//!
//! Node keys are mapped to dense indices in slot order, so a snapshot is
//! portable across processes and stable for a given graph.

use nalgebra::Point2;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::arena::{NodeData, PlanarGraph};
use crate::error::{Error, Result};
use crate::keys::{NodeKey, NodeMask};

/// Serializable representation of a planar graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphSnapshot {
    pub nodes: Vec<NodeSnapshot>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeSnapshot {
    pub u: f64,
    pub v: f64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub mask: u32,
    pub fsucc: usize,
    pub vsucc: usize,
}

fn is_zero(bits: &u32) -> bool {
    *bits == 0
}

impl PlanarGraph {
    /// Serializes the graph to a JSON string.
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(&self.to_snapshot())
            .map_err(|e| Error::Serialization(e.to_string()))
    }

    /// Deserializes a graph from a JSON string.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot: GraphSnapshot =
            serde_json::from_str(json).map_err(|e| Error::Serialization(e.to_string()))?;
        Self::from_snapshot(&snapshot)
    }

    /// Creates a snapshot with nodes numbered in slot order.
    pub fn to_snapshot(&self) -> GraphSnapshot {
        let ids: FxHashMap<NodeKey, usize> = self
            .nodes
            .keys()
            .enumerate()
            .map(|(i, k)| (k, i))
            .collect();

        let nodes = self
            .nodes
            .values()
            .map(|n| NodeSnapshot {
                u: n.uv.x,
                v: n.uv.y,
                mask: n.mask.bits(),
                fsucc: ids[&n.fsucc],
                vsucc: ids[&n.vsucc],
            })
            .collect();

        GraphSnapshot { nodes }
    }

    /// Rebuilds a graph from a snapshot and checks its topology.
    ///
    /// Unknown mask bits are dropped.
    pub fn from_snapshot(snap: &GraphSnapshot) -> Result<Self> {
        let count = snap.nodes.len();
        for (i, n) in snap.nodes.iter().enumerate() {
            if n.fsucc >= count || n.vsucc >= count {
                return Err(Error::InvalidSnapshot(format!(
                    "node {i} links to a node outside 0..{count}"
                )));
            }
        }

        let mut graph = PlanarGraph::new();
        let keys: Vec<NodeKey> = snap
            .nodes
            .iter()
            .map(|n| {
                graph.nodes.insert(NodeData {
                    fsucc: NodeKey::default(),
                    vsucc: NodeKey::default(),
                    uv: Point2::new(n.u, n.v),
                    mask: NodeMask::from_bits_truncate(n.mask),
                })
            })
            .collect();

        for (key, n) in keys.iter().zip(&snap.nodes) {
            let node = &mut graph.nodes[*key];
            node.fsucc = keys[n.fsucc];
            node.vsucc = keys[n.vsucc];
        }

        graph
            .check_topology()
            .map_err(|e| Error::InvalidSnapshot(e.to_string()))?;
        Ok(graph)
    }
}
