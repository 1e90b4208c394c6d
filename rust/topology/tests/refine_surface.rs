// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end refinement scenarios.

use std::f64::consts::PI;

use geomkit_topology::{
    refine_surface, refine_surface_with_stats, MaxEdgeLength, NodeKey, PlanarGraph,
    RefineOptions,
};
use nalgebra::Point2;

fn interior_faces(graph: &PlanarGraph) -> Vec<NodeKey> {
    graph
        .face_seeds()
        .into_iter()
        .filter(|&s| !graph.is_exterior(s))
        .collect()
}

fn assert_triangulated(graph: &PlanarGraph) {
    let sizes = graph.interior_face_sizes();
    assert!(
        sizes.iter().all(|&n| n == 3),
        "non-triangular faces remain: {sizes:?}"
    );
    graph.check_topology().unwrap();
}

/// Half the edge length: long edges ask for a split, short ones do not.
fn half_length(a: Point2<f64>, b: Point2<f64>) -> f64 {
    (b - a).norm() / 2.0
}

/// `n` thin triangles between a row of points at y = 0 and a row at y = 10.
fn strip(n: usize) -> PlanarGraph {
    let bottom = n / 2 + 1;
    let mut points: Vec<Point2<f64>> = (0..=bottom).map(|k| Point2::new(k as f64, 0.0)).collect();
    points.extend((0..=bottom).map(|k| Point2::new(k as f64 + 0.5, 10.0)));
    let a = |k: usize| k;
    let b = |k: usize| bottom + 1 + k;

    let triangles: Vec<[usize; 3]> = (0..n)
        .map(|t| {
            let k = t / 2;
            if t % 2 == 0 {
                [a(k), a(k + 1), b(k)]
            } else {
                [a(k + 1), b(k + 1), b(k)]
            }
        })
        .collect();
    PlanarGraph::from_triangles(&points, &triangles).unwrap()
}

/// A closed band of `2 * segments` thin triangles between an outer circle of
/// radius 11 and an inner circle of radius 1.
fn ring(segments: usize) -> PlanarGraph {
    let angle = |k: f64| 2.0 * PI * k / segments as f64;
    let mut points: Vec<Point2<f64>> = (0..segments)
        .map(|k| {
            let t = angle(k as f64);
            Point2::new(11.0 * t.cos(), 11.0 * t.sin())
        })
        .collect();
    points.extend((0..segments).map(|k| {
        let t = angle(k as f64 + 0.5);
        Point2::new(t.cos(), t.sin())
    }));
    let outer = |k: usize| k % segments;
    let inner = |k: usize| segments + k % segments;

    let mut triangles = Vec::with_capacity(2 * segments);
    for k in 0..segments {
        triangles.push([outer(k), outer(k + 1), inner(k)]);
        triangles.push([outer(k + 1), inner(k + 1), inner(k)]);
    }
    PlanarGraph::from_triangles(&points, &triangles).unwrap()
}

#[test]
fn oracle_at_or_below_one_changes_nothing() {
    let mut graph = PlanarGraph::grid(4, 3).unwrap();
    let nodes = graph.node_count();
    let edges = graph.edge_count();
    let before = graph.to_snapshot();

    let split = refine_surface(&mut graph, &|_: Point2<f64>, _: Point2<f64>| 1.0).unwrap();

    assert_eq!(split, 0);
    assert_eq!(graph.node_count(), nodes);
    assert_eq!(graph.edge_count(), edges);
    assert_eq!(graph.to_snapshot(), before);
}

#[test]
fn single_boundary_edge_splits_one_triangle() {
    // One square, two triangles. Only the bottom edge is long; its other
    // side is the exterior, so the lone mark is accepted.
    let mut graph = PlanarGraph::grid(1, 1).unwrap();
    let bottom = |a: Point2<f64>, b: Point2<f64>| {
        if a.y == 0.0 && b.y == 0.0 {
            2.0
        } else {
            0.0
        }
    };

    let split = refine_surface(&mut graph, &bottom).unwrap();

    assert_eq!(split, 1);
    assert_eq!(interior_faces(&graph).len(), 3);
    assert_eq!(graph.vertex_count(), 5);
    assert_triangulated(&graph);
}

#[test]
fn fully_marked_triangle_becomes_four() {
    let points = [
        Point2::new(0.0, 0.0),
        Point2::new(4.0, 0.0),
        Point2::new(0.0, 4.0),
    ];
    let mut graph = PlanarGraph::from_triangles(&points, &[[0, 1, 2]]).unwrap();

    let split = refine_surface(&mut graph, &|_: Point2<f64>, _: Point2<f64>| 5.0).unwrap();

    assert_eq!(split, 3);
    assert_eq!(interior_faces(&graph).len(), 4);
    assert_eq!(graph.vertex_count(), 6);
    assert_triangulated(&graph);
}

#[test]
fn strip_chain_splits_every_other_edge() {
    for n in 1..=9 {
        let mut graph = strip(n);
        let stats =
            refine_surface_with_stats(&mut graph, &half_length, &RefineOptions::default())
                .unwrap();

        assert_eq!(stats.marked_edges, n + 1, "strip of {n}");
        assert_eq!(stats.home_vertices, n, "strip of {n}");
        assert_eq!(stats.chains, 1, "strip of {n}");
        assert_eq!(stats.split_edges, (n + 1) / 2, "strip of {n}");
        // Every triangle got exactly one split, so each became two.
        assert_eq!(interior_faces(&graph).len(), 2 * n, "strip of {n}");
        assert_triangulated(&graph);
    }
}

#[test]
fn closed_ring_splits_half_its_spokes() {
    let mut graph = ring(64);
    let stats =
        refine_surface_with_stats(&mut graph, &half_length, &RefineOptions::default()).unwrap();

    assert_eq!(stats.home_vertices, 128);
    assert_eq!(stats.chains, 1);
    assert_eq!(stats.split_edges, 64);
    assert_eq!(interior_faces(&graph).len(), 256);
    assert_triangulated(&graph);
}

#[test]
fn repeated_refinement_stays_triangulated() {
    let mut graph = PlanarGraph::grid(3, 3).unwrap();
    graph.fix_boundary();
    let oracle = MaxEdgeLength::new(0.3);

    let mut total = 0;
    for _ in 0..3 {
        total += refine_surface(&mut graph, &oracle).unwrap();
        assert_triangulated(&graph);
    }
    assert!(total > 0);

    // Fixed edges are never split, so the boundary keeps its twelve edges.
    let fixed = graph
        .edge_seeds()
        .into_iter()
        .filter(|&n| graph.is_fixed_edge(n))
        .count();
    assert_eq!(fixed, 12);
}

#[test]
fn split_vertices_land_on_edge_midpoints() {
    let points = [
        Point2::new(0.0, 0.0),
        Point2::new(2.0, 0.0),
        Point2::new(0.0, 2.0),
    ];
    let mut graph = PlanarGraph::from_triangles(&points, &[[0, 1, 2]]).unwrap();
    refine_surface(&mut graph, &|_: Point2<f64>, _: Point2<f64>| 3.0).unwrap();

    let mut uvs: Vec<(f64, f64)> = graph
        .vertex_seeds()
        .into_iter()
        .map(|n| {
            let p = graph.uv(n);
            (p.x, p.y)
        })
        .collect();
    uvs.sort_by(|a, b| a.partial_cmp(b).unwrap());

    assert_eq!(
        uvs,
        vec![
            (0.0, 0.0),
            (0.0, 1.0),
            (0.0, 2.0),
            (1.0, 0.0),
            (1.0, 1.0),
            (2.0, 0.0),
        ]
    );
}

#[test]
fn non_finite_oracle_results_never_split() {
    let mut graph = PlanarGraph::grid(2, 2).unwrap();
    let nodes = graph.node_count();
    let oracle = |a: Point2<f64>, _: Point2<f64>| if a.x < 1.0 { f64::NAN } else { f64::INFINITY };
    assert_eq!(refine_surface(&mut graph, &oracle).unwrap(), 0);
    assert_eq!(graph.node_count(), nodes);
}

/// Edge scores in `[0, 2)` from a hash of the midpoint.
fn scrambled(seed: u32) -> impl Fn(Point2<f64>, Point2<f64>) -> f64 {
    move |a: Point2<f64>, b: Point2<f64>| {
        let m = nalgebra::center(&a, &b);
        let h = (m.x * 12.9898 + m.y * 78.233 + f64::from(seed) * 0.618).sin() * 43758.5453;
        h.fract().abs() * 2.0
    }
}

#[test]
fn scrambled_oracles_keep_the_mesh_triangulated() {
    for seed in 0..25 {
        let mut graph = PlanarGraph::grid(4, 4).unwrap();
        graph.fix_boundary();
        let oracle = scrambled(seed);
        let mut faces = interior_faces(&graph).len();

        for round in 0..3 {
            let stats = refine_surface_with_stats(&mut graph, &oracle, &RefineOptions::default())
                .unwrap_or_else(|e| panic!("seed {seed} round {round}: {e}"));
            assert_triangulated(&graph);
            let now = interior_faces(&graph).len();
            assert_eq!(now, faces + stats.new_faces, "seed {seed} round {round}");
            faces = now;
        }
        let fixed = graph
            .edge_seeds()
            .into_iter()
            .filter(|&n| graph.is_fixed_edge(n))
            .count();
        assert_eq!(fixed, 16, "seed {seed}");
    }
}
