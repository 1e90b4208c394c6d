// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Builders that construct a planar graph from indexed polygons.
//!
//! Each input face becomes one interior face loop. Directed edges that have
//! no reverse partner form the boundary; the builder closes them with
//! `EXTERIOR` nodes so that every node has an edge mate.

use nalgebra::Point2;
use rustc_hash::FxHashMap;

use crate::arena::PlanarGraph;
use crate::error::{Error, Result};
use crate::keys::{NodeKey, NodeMask};

impl PlanarGraph {
    /// Builds a graph from an indexed triangle list.
    ///
    /// Triangles should share a consistent orientation (counter-clockwise by
    /// convention); a directed edge used twice is rejected.
    ///
    /// # Example
    ///
    /// ```
    /// use geomkit_topology::PlanarGraph;
    /// use nalgebra::Point2;
    ///
    /// let points = [
    ///     Point2::new(0.0, 0.0),
    ///     Point2::new(1.0, 0.0),
    ///     Point2::new(1.0, 1.0),
    ///     Point2::new(0.0, 1.0),
    /// ];
    /// let graph = PlanarGraph::from_triangles(&points, &[[0, 1, 2], [0, 2, 3]]).unwrap();
    ///
    /// assert_eq!(graph.edge_count(), 5);
    /// assert_eq!(graph.face_count(), 3); // two triangles and the exterior
    /// ```
    pub fn from_triangles(points: &[Point2<f64>], triangles: &[[usize; 3]]) -> Result<Self> {
        let faces: Vec<&[usize]> = triangles.iter().map(|t| t.as_slice()).collect();
        Self::from_faces(points, &faces)
    }

    /// Builds a graph with a single interior polygon.
    pub fn from_polygon(points: &[Point2<f64>]) -> Result<Self> {
        let indices: Vec<usize> = (0..points.len()).collect();
        Self::from_faces(points, &[indices.as_slice()])
    }

    /// Builds a graph from indexed polygons of any size.
    pub fn from_faces(points: &[Point2<f64>], faces: &[&[usize]]) -> Result<Self> {
        let mut graph = PlanarGraph::new();

        // Directed edge (from, to) -> node at `from` whose outgoing edge it is.
        let mut directed: FxHashMap<(usize, usize), NodeKey> = FxHashMap::default();
        // Directed edges in creation order, for deterministic exterior layout.
        let mut interior: Vec<((usize, usize), NodeKey)> = Vec::new();

        for (face_index, face) in faces.iter().enumerate() {
            validate_face(face_index, face, points.len())?;

            let corners: Vec<NodeKey> = face
                .iter()
                .map(|&v| graph.insert_node(points[v], NodeMask::empty()))
                .collect();

            let n = face.len();
            for k in 0..n {
                graph.nodes[corners[k]].fsucc = corners[(k + 1) % n];
                let edge = (face[k], face[(k + 1) % n]);
                if directed.insert(edge, corners[k]).is_some() {
                    return Err(Error::NonManifoldEdge(edge.0, edge.1));
                }
                interior.push((edge, corners[k]));
            }
        }

        // Close every boundary edge with an exterior node running the other way.
        let mut exterior_by_start: FxHashMap<usize, NodeKey> = FxHashMap::default();
        let mut exterior: Vec<((usize, usize), NodeKey)> = Vec::new();
        for &((from, to), _) in &interior {
            if directed.contains_key(&(to, from)) {
                continue;
            }
            let node = graph.insert_node(points[to], NodeMask::EXTERIOR);
            if exterior_by_start.insert(to, node).is_some() {
                return Err(Error::NonManifoldVertex(to));
            }
            exterior.push(((to, from), node));
        }

        for &((_, to), node) in &exterior {
            let next = *exterior_by_start
                .get(&to)
                .ok_or(Error::NonManifoldVertex(to))?;
            graph.nodes[node].fsucc = next;
        }
        directed.extend(exterior.iter().copied());

        // vsucc(fsucc(x)) = mate(x) fixes every vertex loop.
        for &((from, to), node) in interior.iter().chain(exterior.iter()) {
            let mate = directed[&(to, from)];
            let next = graph.fsucc(node);
            graph.nodes[next].vsucc = mate;
        }

        Ok(graph)
    }

    /// Builds an `nx` × `ny` grid of unit squares, each split into two
    /// counter-clockwise triangles along its lower-left to upper-right
    /// diagonal.
    pub fn grid(nx: usize, ny: usize) -> Result<Self> {
        let mut points = Vec::with_capacity((nx + 1) * (ny + 1));
        for j in 0..=ny {
            for i in 0..=nx {
                points.push(Point2::new(i as f64, j as f64));
            }
        }

        let index = |i: usize, j: usize| j * (nx + 1) + i;
        let mut triangles = Vec::with_capacity(2 * nx * ny);
        for j in 0..ny {
            for i in 0..nx {
                let p00 = index(i, j);
                let p10 = index(i + 1, j);
                let p11 = index(i + 1, j + 1);
                let p01 = index(i, j + 1);
                triangles.push([p00, p10, p11]);
                triangles.push([p00, p11, p01]);
            }
        }

        Self::from_triangles(&points, &triangles)
    }

    /// Marks every edge between an interior face and the exterior as fixed.
    ///
    /// Returns the number of edges marked.
    pub fn fix_boundary(&mut self) -> usize {
        let boundary: Vec<NodeKey> = self
            .nodes
            .keys()
            .filter(|&k| self.is_exterior(k) && !self.is_exterior(self.edge_mate(k)))
            .collect();
        for &node in &boundary {
            self.set_mask_around_edge(node, NodeMask::BOUNDARY);
        }
        boundary.len()
    }
}

fn validate_face(face_index: usize, face: &[usize], point_count: usize) -> Result<()> {
    if face.len() < 3 {
        return Err(Error::InvalidFace(face_index));
    }
    for (k, &v) in face.iter().enumerate() {
        if v >= point_count || face[..k].contains(&v) {
            return Err(Error::InvalidFace(face_index));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_square() -> Vec<Point2<f64>> {
        vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(1.0, 1.0),
            Point2::new(0.0, 1.0),
        ]
    }

    #[test]
    fn two_triangles_share_diagonal() {
        let graph = PlanarGraph::from_triangles(&unit_square(), &[[0, 1, 2], [0, 2, 3]]).unwrap();

        assert_eq!(graph.node_count(), 10);
        assert_eq!(graph.edge_count(), 5);
        assert_eq!(graph.vertex_count(), 4);
        assert_eq!(graph.face_count(), 3);
        graph.check_topology().unwrap();

        let mut sizes = graph.interior_face_sizes();
        sizes.sort_unstable();
        assert_eq!(sizes, vec![3, 3]);
    }

    #[test]
    fn exterior_face_is_boundary_loop() {
        let graph = PlanarGraph::from_triangles(&unit_square(), &[[0, 1, 2], [0, 2, 3]]).unwrap();
        let exterior: Vec<NodeKey> = graph
            .face_seeds()
            .into_iter()
            .filter(|&s| graph.is_exterior(s))
            .collect();
        assert_eq!(exterior.len(), 1);
        assert_eq!(graph.face_edge_count(exterior[0]), 4);
    }

    #[test]
    fn euler_characteristic_of_grid() {
        let graph = PlanarGraph::grid(3, 2).unwrap();
        let v = graph.vertex_count() as i64;
        let e = graph.edge_count() as i64;
        let f = graph.face_count() as i64;
        assert_eq!(v, 12);
        assert_eq!(f, 13);
        assert_eq!(v - e + f, 2);
        graph.check_topology().unwrap();
    }

    #[test]
    fn rejects_bad_index() {
        let err = PlanarGraph::from_triangles(&unit_square(), &[[0, 1, 7]]).unwrap_err();
        assert!(matches!(err, Error::InvalidFace(0)));

        let err = PlanarGraph::from_triangles(&unit_square(), &[[0, 1, 1]]).unwrap_err();
        assert!(matches!(err, Error::InvalidFace(0)));
    }

    #[test]
    fn rejects_inconsistent_orientation() {
        let err =
            PlanarGraph::from_triangles(&unit_square(), &[[0, 1, 2], [0, 1, 3]]).unwrap_err();
        assert!(matches!(err, Error::NonManifoldEdge(0, 1)));
    }

    #[test]
    fn rejects_bowtie_vertex() {
        let points = vec![
            Point2::new(0.0, 0.0),
            Point2::new(1.0, 0.0),
            Point2::new(0.0, 1.0),
            Point2::new(-1.0, 0.0),
            Point2::new(0.0, -1.0),
        ];
        let err = PlanarGraph::from_triangles(&points, &[[0, 1, 2], [0, 3, 4]]).unwrap_err();
        assert!(matches!(err, Error::NonManifoldVertex(0)));
    }

    #[test]
    fn fix_boundary_marks_outer_edges_only() {
        let mut graph = PlanarGraph::grid(1, 1).unwrap();
        assert_eq!(graph.fix_boundary(), 4);

        let fixed = graph
            .edge_seeds()
            .into_iter()
            .filter(|&n| graph.is_fixed_edge(n))
            .count();
        assert_eq!(fixed, 4);
        for node in graph.nodes() {
            assert_eq!(graph.is_fixed_edge(node), graph.is_fixed_edge(graph.edge_mate(node)));
        }
    }

    #[test]
    fn polygon_has_one_interior_face() {
        let graph = PlanarGraph::from_polygon(&unit_square()).unwrap();
        assert_eq!(graph.interior_face_sizes(), vec![4]);
        assert_eq!(graph.face_count(), 2);
    }
}
