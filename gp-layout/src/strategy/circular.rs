//! Circular layout
//!
//!     Nodes are spread evenly on one circle in index order, the first at the top, going
//!     clockwise. The radius makes the chord between neighbours at least the widest node
//!     diagonal plus `node_spacing`, so nodes never overlap. A single node sits at the centre.
//!
//!     This is also the initial layout of a graph whose nodes have never been placed.

use crate::attributed::AttributedGraph;
use crate::geometry::Point;
use crate::params::CircularParams;
use crate::strategy::{circle_points, LayoutStrategy};

#[derive(Debug, Clone, Default)]
pub struct CircularLayout {
    params: CircularParams,
}

impl CircularLayout {
    pub fn new(params: CircularParams) -> Self {
        Self { params }
    }

    pub fn radius(&self, count: usize, max_diagonal: f64) -> f64 {
        if count < 2 {
            return 0.0;
        }
        let chord = max_diagonal + self.params.node_spacing;
        chord / (2.0 * (std::f64::consts::PI / count as f64).sin())
    }
}

impl LayoutStrategy for CircularLayout {
    fn name(&self) -> &'static str {
        "circular"
    }

    fn compute_positions(&self, graph: &mut AttributedGraph) {
        let count = graph.node_count();
        let radius = self.radius(count, graph.max_diagonal());
        let indices: Vec<_> = graph.node_indices().collect();
        if count == 1 {
            graph.set_position(indices[0], Point::ORIGIN);
            return;
        }
        for (index, point) in indices.into_iter().zip(circle_points(count, radius)) {
            graph.set_position(index, point);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Size;

    fn nodes(count: usize) -> AttributedGraph {
        let mut graph = AttributedGraph::new();
        for i in 0..count {
            graph.add_node(format!("n{}", i), String::new(), Size::new(40.0, 24.0));
        }
        graph
    }

    #[test]
    fn test_first_node_on_top() {
        let mut graph = nodes(4);
        CircularLayout::default().compute_positions(&mut graph);
        let first = graph.nodes()[0].position;
        assert!(first.x.abs() < 1e-9);
        assert!(first.y < 0.0);
        // Clockwise with y pointing down: the second node is to the right.
        assert!(graph.nodes()[1].position.x > 0.0);
    }

    #[test]
    fn test_neighbours_are_far_enough_apart() {
        let mut graph = nodes(12);
        let layout = CircularLayout::default();
        layout.compute_positions(&mut graph);
        let diagonal = Size::new(40.0, 24.0).diagonal();
        let positions: Vec<Point> = graph.nodes().iter().map(|node| node.position).collect();
        for pair in positions.windows(2) {
            assert!(pair[0].distance(pair[1]) >= diagonal + 30.0 - 1e-9);
        }
    }

    #[test]
    fn test_single_node_at_centre() {
        let mut graph = nodes(1);
        CircularLayout::default().compute_positions(&mut graph);
        assert_eq!(graph.nodes()[0].position, Point::ORIGIN);
    }
}
