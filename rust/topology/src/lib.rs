// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! # GeomKit Topology
//!
//! Planar half-edge ("vertex-use") graph over a parametric domain, with
//! adaptive edge refinement of triangulated regions.
//!
//! Every node is one end of a directed edge and carries two links: `fsucc`
//! around its face and `vsucc` around its vertex. Nodes live in a slot map
//! arena and are addressed by generational [`NodeKey`]s, so edits never
//! invalidate other nodes.
//!
//! [`refine_surface`] asks a [`SubdivisionOracle`] which edges are too long,
//! splits a consistent subset of them at their midpoints and retriangulates
//! the affected faces so that every interior face is a triangle again.
//!
//! ## Example
//!
//! ```
//! use geomkit_topology::{refine_surface, MaxEdgeLength, PlanarGraph};
//!
//! let mut graph = PlanarGraph::grid(4, 4).unwrap();
//! graph.fix_boundary();
//!
//! let split = refine_surface(&mut graph, &MaxEdgeLength::new(0.9)).unwrap();
//! assert!(split > 0);
//! assert!(graph.interior_face_sizes().iter().all(|&n| n == 3));
//! ```

pub mod arena;
pub mod builders;
pub mod construction;
pub mod error;
pub mod keys;
pub mod oracle;
pub mod refine;
pub mod serialization;
pub mod traversal;

pub use arena::{NodeData, PlanarGraph};
pub use error::{Error, Result};
pub use keys::{NodeKey, NodeMask};
pub use oracle::{MaxEdgeLength, SubdivisionOracle};
pub use refine::{
    refine_surface, refine_surface_with_options, refine_surface_with_stats, RefineOptions,
    RefineStats, DEFAULT_MIN_SPLIT_COUNT, SPLIT_FRACTION,
};
pub use serialization::{GraphSnapshot, NodeSnapshot};
pub use traversal::NodeLoop;
