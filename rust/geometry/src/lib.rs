// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! GeomKit Geometry
//!
//! Intersections of scalar tensor-product bezier patches given as strided
//! grids of control values:
//!
//! - [`add_bezier_level_surface`] traces where one patch equals a level, as
//!   hyperbola arcs and line segments.
//! - [`add_bezier_common_roots`] and [`add_bilinear_common_roots`] find the
//!   isolated points where two patches reach their levels simultaneously.
//!
//! Both work cell by cell on the bilinear control polygon, so every cell is
//! handled in closed form. Results go to a [`LevelSetCollector`].
//!
//! ```
//! use geomkit_geometry::{add_bezier_common_roots, ControlGrid, GeometryCollector};
//!
//! // u and v sampled on a 2 x 2 grid.
//! let u = [0.0, 1.0, 0.0, 1.0];
//! let v = [0.0, 0.0, 1.0, 1.0];
//! let a = ControlGrid::row_major(&u, 2, 2).unwrap();
//! let b = ControlGrid::row_major(&v, 2, 2).unwrap();
//!
//! let mut out = GeometryCollector::new();
//! let scan = add_bezier_common_roots(&mut out, &a, 0.25, &b, 0.5).unwrap();
//! assert_eq!(scan.roots, 1);
//! ```

pub mod bilinear;
pub mod clip;
pub mod collector;
pub mod conic;
pub mod error;
pub mod grid;
pub mod level_surface;
pub mod roots;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Vector2};

pub use bilinear::{oriented_hyperbola_intersections, safe_divide, HyperbolaCoefficients};
pub use clip::clip_line_to_unit_square;
pub use collector::{ConicArc, GeometryCollector, LevelGeometry, LevelSetCollector};
pub use conic::{ConicClass, ImplicitConic};
pub use error::{Error, Result};
pub use grid::ControlGrid;
pub use level_surface::{add_bezier_level_surface, LevelScan};
pub use roots::{
    add_bezier_common_roots, add_bezier_common_roots_with_options, add_bilinear_common_roots,
    add_bilinear_common_roots_with_options, IntersectOptions, RootScan,
};
