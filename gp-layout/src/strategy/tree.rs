//! Levelled tree layout
//!
//!     A breadth-first spanning forest is grown from the graph roots; nodes the roots cannot
//!     reach start trees of their own, in index order. Each subtree is given a span across the
//!     levels wide enough for all its descendants, children are centred under their parent and
//!     every level is as deep as its deepest node. Edges outside the spanning forest do not
//!     influence placement.

use std::collections::VecDeque;

use crate::attributed::{AttributedGraph, NodeIndex};
use crate::params::TreeParams;
use crate::strategy::{LayoutDirection, LayoutStrategy};

#[derive(Debug, Clone)]
pub struct TreeLayout {
    params: TreeParams,
    direction: LayoutDirection,
}

impl TreeLayout {
    pub fn new(params: TreeParams, direction: LayoutDirection) -> Self {
        Self { params, direction }
    }
}

/// Spanning forest of a graph, in breadth-first order.
#[derive(Debug, Default)]
pub(crate) struct SpanningForest {
    pub roots: Vec<NodeIndex>,
    pub children: Vec<Vec<NodeIndex>>,
    pub depth: Vec<usize>,
    /// Every node once, parents before children.
    pub order: Vec<NodeIndex>,
}

impl SpanningForest {
    /// Grows the forest along outgoing edges, falling back to incoming ones so that a node
    /// only reachable against edge direction still hangs below its neighbour.
    pub fn build(graph: &AttributedGraph) -> Self {
        let count = graph.node_count();
        let mut forest = SpanningForest {
            roots: Vec::new(),
            children: vec![Vec::new(); count],
            depth: vec![0; count],
            order: Vec::with_capacity(count),
        };
        let mut visited = vec![false; count];
        let starts: Vec<NodeIndex> = graph
            .roots()
            .into_iter()
            .chain(graph.node_indices())
            .collect();

        for start in starts {
            if visited[start.index()] {
                continue;
            }
            forest.roots.push(start);
            visited[start.index()] = true;
            let mut queue = VecDeque::from([start]);
            while let Some(node) = queue.pop_front() {
                forest.order.push(node);
                let next: Vec<NodeIndex> = graph
                    .successors(node)
                    .iter()
                    .chain(graph.predecessors(node))
                    .copied()
                    .collect();
                for child in next {
                    if visited[child.index()] {
                        continue;
                    }
                    visited[child.index()] = true;
                    forest.children[node.index()].push(child);
                    forest.depth[child.index()] = forest.depth[node.index()] + 1;
                    queue.push_back(child);
                }
            }
        }
        forest
    }

    pub fn max_depth(&self) -> usize {
        self.depth.iter().copied().max().unwrap_or(0)
    }
}

impl LayoutStrategy for TreeLayout {
    fn name(&self) -> &'static str {
        "tree"
    }

    fn compute_positions(&self, graph: &mut AttributedGraph) {
        if graph.is_empty() {
            return;
        }
        let forest = SpanningForest::build(graph);
        let count = graph.node_count();
        let gap = self.params.sibling_distance;

        let mut cross_extent = vec![0.0; count];
        let mut level_extent = vec![0.0_f64; forest.max_depth() + 1];
        for index in graph.node_indices() {
            let (cross, main) = self.direction.extents(graph.size(index));
            cross_extent[index.index()] = cross;
            let depth = forest.depth[index.index()];
            level_extent[depth] = level_extent[depth].max(main);
        }

        // Subtree spans, leaves first.
        let mut span = vec![0.0; count];
        for node in forest.order.iter().rev() {
            let children = &forest.children[node.index()];
            let below: f64 = children.iter().map(|child| span[child.index()]).sum::<f64>()
                + gap * children.len().saturating_sub(1) as f64;
            span[node.index()] = cross_extent[node.index()].max(below);
        }

        let mut level_center = Vec::with_capacity(level_extent.len());
        let mut offset = 0.0;
        for extent in &level_extent {
            level_center.push(offset + extent / 2.0);
            offset += extent + self.params.level_distance;
        }

        let mut cross = vec![0.0; count];
        let mut left = 0.0;
        for root in &forest.roots {
            cross[root.index()] = left + span[root.index()] / 2.0;
            left += span[root.index()] + gap;
        }
        for node in &forest.order {
            let children = &forest.children[node.index()];
            if children.is_empty() {
                continue;
            }
            let total: f64 = children.iter().map(|child| span[child.index()]).sum::<f64>()
                + gap * (children.len() - 1) as f64;
            let mut start = cross[node.index()] - total / 2.0;
            for child in children {
                cross[child.index()] = start + span[child.index()] / 2.0;
                start += span[child.index()] + gap;
            }
        }

        for index in graph.node_indices() {
            let main = level_center[forest.depth[index.index()]];
            graph.set_position(index, self.direction.orient(cross[index.index()], main));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::{Point, Size};

    fn chain_with_branch() -> AttributedGraph {
        // a -> b, a -> c, c -> d
        let mut graph = AttributedGraph::new();
        let ids = ["a", "b", "c", "d"];
        let nodes: Vec<_> = ids
            .iter()
            .map(|id| graph.add_node(id.to_string(), id.to_string(), Size::new(20.0, 20.0)))
            .collect();
        graph.add_edge(nodes[0], nodes[1], String::new());
        graph.add_edge(nodes[0], nodes[2], String::new());
        graph.add_edge(nodes[2], nodes[3], String::new());
        graph
    }

    #[test]
    fn test_levels_follow_depth() {
        let mut graph = chain_with_branch();
        TreeLayout::new(TreeParams::default(), LayoutDirection::TopToBottom)
            .compute_positions(&mut graph);
        let y: Vec<f64> = graph.nodes().iter().map(|node| node.position.y).collect();
        assert_eq!(y, vec![10.0, 90.0, 90.0, 170.0]);
        // The parent sits centred over its two children.
        let a = graph.nodes()[0].position.x;
        let b = graph.nodes()[1].position.x;
        let c = graph.nodes()[2].position.x;
        assert!((a - (b + c) / 2.0).abs() < 1e-9);
        assert_eq!(graph.nodes()[3].position.x, c);
    }

    #[test]
    fn test_left_to_right_swaps_axes() {
        let mut vertical = chain_with_branch();
        let mut horizontal = chain_with_branch();
        TreeLayout::new(TreeParams::default(), LayoutDirection::TopToBottom)
            .compute_positions(&mut vertical);
        TreeLayout::new(TreeParams::default(), LayoutDirection::LeftToRight)
            .compute_positions(&mut horizontal);
        for (v, h) in vertical.nodes().iter().zip(horizontal.nodes()) {
            assert_eq!(h.position, Point::new(v.position.y, v.position.x));
        }
    }

    #[test]
    fn test_unreachable_nodes_start_new_trees() {
        let mut graph = chain_with_branch();
        graph.add_node("lonely".into(), String::new(), Size::new(20.0, 20.0));
        let forest = SpanningForest::build(&graph);
        assert_eq!(forest.roots.len(), 2);
        assert_eq!(forest.order.len(), 5);
    }
}
