// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Walking chains of two-split triangles.
//!
//! A triangle with exactly two marked edges has a *home* node: the corner
//! between its two marked edges. Thin triangles in a ruled strip share their
//! marked edges with their neighbors, so the homes form chains. Splitting
//! every marked edge would put two new vertices in each triangle; splitting
//! every other shared edge gives each triangle exactly one.
//!
//! From a home node `h` the next triangle lies across either its outgoing
//! edge ("right") or its incoming edge ("left"):
//!
//! | direction | vertex step (keeps direction) | edge step (flips direction) |
//! |-----------|-------------------------------|-----------------------------|
//! | right     | `vpred(h)`                    | `edge_mate(h)`              |
//! | left      | `vsucc(h)`                    | `reverse_edge_mate(h)`      |
//!
//! A vertex step stays at the same vertex. An edge step lands at the far end
//! of the shared edge, where the local sense of left and right is reversed.

use rustc_hash::FxHashSet;

use crate::arena::PlanarGraph;
use crate::keys::NodeKey;

/// Cursor over a chain of home nodes.
#[derive(Debug, Clone)]
pub struct ChainStepper<'a> {
    graph: &'a PlanarGraph,
    homes: &'a FxHashSet<NodeKey>,
    current: NodeKey,
    stepping_right: bool,
}

impl<'a> ChainStepper<'a> {
    /// Starts at `start`, stepping right.
    pub fn new(graph: &'a PlanarGraph, homes: &'a FxHashSet<NodeKey>, start: NodeKey) -> Self {
        Self {
            graph,
            homes,
            current: start,
            stepping_right: true,
        }
    }

    pub fn current(&self) -> NodeKey {
        self.current
    }

    pub fn is_stepping_right(&self) -> bool {
        self.stepping_right
    }

    /// Turns around in place.
    pub fn reverse(&mut self) {
        self.stepping_right = !self.stepping_right;
    }

    /// Moves to the home node of the next triangle in the current direction.
    ///
    /// Returns `false` (and stays put) at the end of the chain.
    pub fn move_to_neighbor(&mut self) -> bool {
        let (vertex_step, edge_step) = if self.stepping_right {
            (
                self.graph.vpred(self.current),
                self.graph.edge_mate(self.current),
            )
        } else {
            (
                self.graph.vsucc(self.current),
                self.graph.reverse_edge_mate(self.current),
            )
        };

        if self.homes.contains(&vertex_step) {
            self.current = vertex_step;
            true
        } else if self.homes.contains(&edge_step) {
            self.current = edge_step;
            self.stepping_right = !self.stepping_right;
            true
        } else {
            false
        }
    }

    /// Steps until the chain ends or the walk comes back to where it began.
    ///
    /// Returns the number of steps taken. A closed chain returns its length
    /// with the cursor back on the starting node.
    pub fn move_to_end_of_chain(&mut self) -> usize {
        let start = self.current;
        let mut steps = 0;
        while steps < self.homes.len() && self.move_to_neighbor() {
            steps += 1;
            if self.current == start {
                break;
            }
        }
        steps
    }

    /// The node whose outgoing edge is the edge shared with the next
    /// triangle in the current direction.
    pub fn leading_edge(&self) -> NodeKey {
        if self.stepping_right {
            self.current
        } else {
            self.graph.fpred(self.current)
        }
    }

    /// The node whose outgoing edge is the edge shared with the previous
    /// triangle in the current direction.
    pub fn trailing_edge(&self) -> NodeKey {
        if self.stepping_right {
            self.graph.fpred(self.current)
        } else {
            self.current
        }
    }
}

/// A chain laid out from one end to the other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chain {
    /// `(home, leading_edge)` for each triangle, in walk order.
    pub links: Vec<(NodeKey, NodeKey)>,
    /// `true` if the chain closes on itself.
    pub closed: bool,
}

impl Chain {
    /// Walks out the chain through `start`.
    ///
    /// Open chains are laid out from one true end to the other; closed
    /// chains start and end at `start`.
    pub fn trace(graph: &PlanarGraph, homes: &FxHashSet<NodeKey>, start: NodeKey) -> Self {
        let mut stepper = ChainStepper::new(graph, homes, start);

        let first = stepper.move_to_end_of_chain();
        let closed = first > 0 && stepper.current() == start;

        stepper.reverse();
        let steps = stepper.move_to_end_of_chain();
        stepper.reverse();

        let triangles = if closed { steps } else { steps + 1 };
        let mut links = Vec::with_capacity(triangles);
        for i in 0..triangles {
            links.push((stepper.current(), stepper.leading_edge()));
            if i + 1 < triangles && !stepper.move_to_neighbor() {
                break;
            }
        }

        Self { links, closed }
    }

    pub fn len(&self) -> usize {
        self.links.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty()
    }

    /// Leading edges of triangles 0, 2, 4, ….
    ///
    /// On an open chain of N triangles this yields ⌈N/2⌉ edges and gives each
    /// triangle exactly one of them: the last triangle's leading edge is the
    /// chain's outer end edge.
    pub fn alternate_edges(&self) -> impl Iterator<Item = NodeKey> + '_ {
        self.links.iter().step_by(2).map(|&(_, edge)| edge)
    }
}
