// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Key and mask types for arena-based graph storage.
//!
//! Every half-edge node gets a unique, type-safe key for O(1) lookup in the
//! arena. Keys are created by `slotmap::SlotMap` and remain valid even after
//! other nodes are inserted (generational indices).

use bitflags::bitflags;
use slotmap::new_key_type;

new_key_type! {
    /// Key for a half-edge node: one directed edge end, sitting in exactly
    /// one face loop and one vertex loop.
    pub struct NodeKey;
}

bitflags! {
    /// Persistent per-node attributes.
    ///
    /// Transient markings used by refinement (visited, marked, home, new
    /// vertex) are plain sets owned by the algorithm, not mask bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct NodeMask: u32 {
        /// The node lies in the exterior (unbounded) face.
        const EXTERIOR = 1 << 0;
        /// The node's outgoing edge is a fixed boundary/constraint edge.
        const BOUNDARY = 1 << 1;
    }
}

impl NodeMask {
    /// Masks that describe the edge rather than the face side, and therefore
    /// belong on both half-edges of an edge.
    pub const EDGE_MASKS: NodeMask = NodeMask::BOUNDARY;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn masks_are_disjoint() {
        assert!(!NodeMask::EXTERIOR.intersects(NodeMask::BOUNDARY));
        assert_eq!(NodeMask::default(), NodeMask::empty());
    }

    #[test]
    fn edge_masks_exclude_exterior() {
        assert!(NodeMask::EDGE_MASKS.contains(NodeMask::BOUNDARY));
        assert!(!NodeMask::EDGE_MASKS.contains(NodeMask::EXTERIOR));
    }
}
