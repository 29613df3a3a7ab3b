//! Layered (Sugiyama style) layout
//!
//!     Ranks
//!
//!         Nodes are visited in topological order (Kahn); a node's rank is one more than the
//!         highest rank among its predecessors. Nodes on cycles, which Kahn never releases,
//!         are appended in index order so every node gets a rank. Self loops are ignored.
//!
//!     Ordering
//!
//!         Within a rank nodes start in index order and are then sorted by the barycenter of
//!         their neighbours' positions: downward sweeps look at predecessors, upward sweeps at
//!         successors. Ties keep the current order, so the result is stable.
//!
//!     Placement
//!
//!         Ranks are stacked along the layout direction, each as deep as its deepest node and
//!         separated by `rank_spacing`. Nodes of a rank are packed side by side with
//!         `node_spacing` between them and every rank is centred on the widest one.

use std::collections::VecDeque;

use crate::attributed::{AttributedGraph, NodeIndex};
use crate::params::LayeredParams;
use crate::strategy::{LayoutDirection, LayoutStrategy};

#[derive(Debug, Clone)]
pub struct LayeredLayout {
    params: LayeredParams,
    direction: LayoutDirection,
}

impl LayeredLayout {
    pub fn new(params: LayeredParams, direction: LayoutDirection) -> Self {
        Self { params, direction }
    }
}

impl LayoutStrategy for LayeredLayout {
    fn name(&self) -> &'static str {
        "layered"
    }

    fn compute_positions(&self, graph: &mut AttributedGraph) {
        if graph.is_empty() {
            return;
        }
        let ranks = compute_ranks(graph);
        let mut buckets = rank_buckets(graph, &ranks);
        order_rank_nodes(graph, &mut buckets, self.params.ordering_sweeps);

        let extents: Vec<(f64, f64)> = graph
            .node_indices()
            .map(|index| self.direction.extents(graph.size(index)))
            .collect();
        let widths: Vec<f64> = buckets
            .iter()
            .map(|bucket| {
                bucket.iter().map(|node| extents[node.index()].0).sum::<f64>()
                    + self.params.node_spacing * bucket.len().saturating_sub(1) as f64
            })
            .collect();
        let widest = widths.iter().copied().fold(0.0, f64::max);

        let mut main_cursor = 0.0;
        for (bucket, width) in buckets.iter().zip(&widths) {
            let depth = bucket
                .iter()
                .map(|node| extents[node.index()].1)
                .fold(0.0, f64::max);
            let mut cross_cursor = (widest - width) / 2.0;
            for node in bucket {
                let (cross, _) = extents[node.index()];
                let position = self
                    .direction
                    .orient(cross_cursor + cross / 2.0, main_cursor + depth / 2.0);
                graph.set_position(*node, position);
                cross_cursor += cross + self.params.node_spacing;
            }
            main_cursor += depth + self.params.rank_spacing;
        }
    }
}

/// Longest-path rank of every node, indexed by node.
pub(crate) fn compute_ranks(graph: &AttributedGraph) -> Vec<usize> {
    let count = graph.node_count();
    let mut indegree: Vec<usize> = graph
        .node_indices()
        .map(|index| {
            graph
                .predecessors(index)
                .iter()
                .filter(|source| **source != index)
                .count()
        })
        .collect();

    let mut queue: VecDeque<NodeIndex> = graph
        .node_indices()
        .filter(|index| indegree[index.index()] == 0)
        .collect();
    let mut order = Vec::with_capacity(count);
    let mut seen = vec![false; count];
    while let Some(node) = queue.pop_front() {
        order.push(node);
        seen[node.index()] = true;
        for next in graph.successors(node) {
            if *next == node {
                continue;
            }
            indegree[next.index()] -= 1;
            if indegree[next.index()] == 0 {
                queue.push_back(*next);
            }
        }
    }
    if order.len() < count {
        log::trace!(
            "layered: {} node(s) on cycles ranked in index order",
            count - order.len()
        );
        order.extend(graph.node_indices().filter(|index| !seen[index.index()]));
    }

    let mut ranks = vec![0; count];
    for node in order {
        let rank = ranks[node.index()];
        for next in graph.successors(node) {
            if *next != node {
                ranks[next.index()] = ranks[next.index()].max(rank + 1);
            }
        }
    }
    ranks
}

fn rank_buckets(graph: &AttributedGraph, ranks: &[usize]) -> Vec<Vec<NodeIndex>> {
    let top = ranks.iter().copied().max().unwrap_or(0);
    let mut buckets = vec![Vec::new(); top + 1];
    for node in graph.node_indices() {
        buckets[ranks[node.index()]].push(node);
    }
    // Cycle fallback can leave a rank empty.
    buckets.retain(|bucket| !bucket.is_empty());
    buckets
}

fn order_rank_nodes(graph: &AttributedGraph, buckets: &mut [Vec<NodeIndex>], sweeps: usize) {
    if buckets.len() <= 1 {
        return;
    }
    let mut positions = vec![0usize; graph.node_count()];
    update_positions(buckets, &mut positions);

    for _ in 0..sweeps {
        for rank in 1..buckets.len() {
            sort_bucket(&mut buckets[rank], &positions, move |node| graph.predecessors(node));
            update_positions(buckets, &mut positions);
        }
        for rank in (0..buckets.len() - 1).rev() {
            sort_bucket(&mut buckets[rank], &positions, move |node| graph.successors(node));
            update_positions(buckets, &mut positions);
        }
    }
}

fn update_positions(buckets: &[Vec<NodeIndex>], positions: &mut [usize]) {
    for bucket in buckets {
        for (at, node) in bucket.iter().enumerate() {
            positions[node.index()] = at;
        }
    }
}

fn sort_bucket<'g>(
    bucket: &mut [NodeIndex],
    positions: &[usize],
    neighbors: impl Fn(NodeIndex) -> &'g [NodeIndex],
) {
    if bucket.len() <= 1 {
        return;
    }
    let mut scored: Vec<(f64, usize, NodeIndex)> = bucket
        .iter()
        .enumerate()
        .map(|(current, node)| {
            let list: Vec<usize> = neighbors(*node)
                .iter()
                .filter(|other| *other != node)
                .map(|other| positions[other.index()])
                .collect();
            let score = if list.is_empty() {
                current as f64
            } else {
                list.iter().sum::<usize>() as f64 / list.len() as f64
            };
            (score, current, *node)
        })
        .collect();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
    for (slot, (_, _, node)) in bucket.iter_mut().zip(scored) {
        *slot = node;
    }
}
