//! Radial tree layout
//!
//!     The breadth-first spanning forest of the tree layout, drawn on concentric rings: a single
//!     root sits at the centre, several roots share the first ring around an empty centre. Each
//!     node owns a wedge proportional to the number of leaves below it and sits in the middle of
//!     that wedge; its children split the wedge among themselves.
//!
//!     The first ring is wide enough that the narrowest wedge still fits the widest node plus
//!     `node_spacing`, and rings are `level_distance` apart beyond the widest node, so no two
//!     nodes overlap.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use crate::attributed::AttributedGraph;
use crate::geometry::Point;
use crate::params::RadialParams;
use crate::strategy::tree::SpanningForest;
use crate::strategy::LayoutStrategy;

#[derive(Debug, Clone)]
pub struct RadialTreeLayout {
    params: RadialParams,
}

impl RadialTreeLayout {
    pub fn new(params: RadialParams) -> Self {
        Self { params }
    }

    fn ring_radii(&self, rings: usize, leaves: usize, max_diagonal: f64) -> Vec<f64> {
        let step = self.params.level_distance + max_diagonal;
        let first = if leaves > 1 {
            let chord = max_diagonal + self.params.node_spacing;
            step.max(chord / (2.0 * (PI / leaves as f64).sin()))
        } else {
            step
        };
        (0..=rings)
            .map(|ring| match ring {
                0 => 0.0,
                _ => first + (ring - 1) as f64 * step,
            })
            .collect()
    }
}

impl LayoutStrategy for RadialTreeLayout {
    fn name(&self) -> &'static str {
        "radial_tree"
    }

    fn compute_positions(&self, graph: &mut AttributedGraph) {
        if graph.is_empty() {
            return;
        }
        let forest = SpanningForest::build(graph);
        let count = graph.node_count();
        let ring_offset = usize::from(forest.roots.len() > 1);

        let mut leaves = vec![0usize; count];
        for node in forest.order.iter().rev() {
            let children = &forest.children[node.index()];
            leaves[node.index()] = if children.is_empty() {
                1
            } else {
                children.iter().map(|child| leaves[child.index()]).sum()
            };
        }
        let total: usize = forest.roots.iter().map(|root| leaves[root.index()]).sum();
        let radii = self.ring_radii(forest.max_depth() + ring_offset, total, graph.max_diagonal());

        // Wedge start and width per node.
        let mut wedge = vec![(0.0, 0.0); count];
        let mut start = -FRAC_PI_2;
        for root in &forest.roots {
            let width = TAU * leaves[root.index()] as f64 / total as f64;
            wedge[root.index()] = (start, width);
            start += width;
        }
        for node in &forest.order {
            let (mut start, _) = wedge[node.index()];
            for child in &forest.children[node.index()] {
                let width = TAU * leaves[child.index()] as f64 / total as f64;
                wedge[child.index()] = (start, width);
                start += width;
            }
        }

        for index in graph.node_indices() {
            let radius = radii[forest.depth[index.index()] + ring_offset];
            let (start, width) = wedge[index.index()];
            let angle = start + width / 2.0;
            graph.set_position(index, Point::new(radius * angle.cos(), radius * angle.sin()));
        }
    }
}
