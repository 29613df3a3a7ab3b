//! Planar layout
//!
//!     A barycentric (Tutte) drawing snapped to a grid, one connected component at a time.
//!
//!     Each component gets a convex frame: the shortest cycle closed by a back edge of a
//!     depth-first search (such a cycle has no chords) or, for a tree, its leaves in
//!     depth-first order. Frame nodes are spread on a circle and every other node is moved to
//!     the barycenter of its neighbours, `iterations` times. When the component is 3-connected
//!     and planar and the frame bounds a face, the result has no crossings; otherwise it is
//!     still a straight-line drawing inside the same frame.
//!
//!     Centres are then snapped to a square grid whose pitch is the widest node diagonal plus
//!     `node_spacing`. A node whose cell is taken moves to the nearest free cell around it, so
//!     no two nodes overlap; the snapped drawing follows the embedding only approximately.
//!     Components are packed left to right, `component_spacing` apart.

use std::collections::HashSet;

use crate::attributed::{AttributedGraph, NodeIndex};
use crate::geometry::{Point, Rect};
use crate::params::PlanarParams;
use crate::strategy::{circle_points, LayoutStrategy};

type Cell = (i64, i64);

#[derive(Debug, Clone, Default)]
pub struct PlanarLayout {
    params: PlanarParams,
}

impl PlanarLayout {
    pub fn new(params: PlanarParams) -> Self {
        Self { params }
    }

    /// Places the frame on a circle and relaxes the interior towards neighbour barycenters.
    fn embed(
        &self,
        component: &Component,
        adjacency: &[Vec<usize>],
        pitch: f64,
        positions: &mut [Point],
    ) {
        let sides = component.frame.len();
        let radius = if sides < 2 {
            0.0
        } else {
            let chord_radius = pitch / (2.0 * (std::f64::consts::PI / sides as f64).sin());
            chord_radius.max(pitch * (component.len() as f64).sqrt())
        };
        for (&node, point) in component.frame.iter().zip(circle_points(sides, radius)) {
            positions[node] = point;
        }
        for &node in &component.interior {
            positions[node] = Point::ORIGIN;
        }

        for _ in 0..self.params.iterations {
            for &node in &component.interior {
                let neighbours = &adjacency[node];
                if neighbours.is_empty() {
                    continue;
                }
                let sum = neighbours
                    .iter()
                    .fold(Point::ORIGIN, |sum, &other| sum + positions[other]);
                positions[node] = sum * (1.0 / neighbours.len() as f64);
            }
        }
    }
}

impl LayoutStrategy for PlanarLayout {
    fn name(&self) -> &'static str {
        "planar"
    }

    fn compute_positions(&self, graph: &mut AttributedGraph) {
        let indices: Vec<NodeIndex> = graph.node_indices().collect();
        let adjacency: Vec<Vec<usize>> = indices
            .iter()
            .map(|index| {
                graph
                    .neighbors(*index)
                    .into_iter()
                    .map(NodeIndex::index)
                    .collect()
            })
            .collect();
        let pitch = (graph.max_diagonal() + self.params.node_spacing).max(1.0);
        let mut positions = vec![Point::ORIGIN; indices.len()];

        let mut cursor = 0.0;
        for component in components(&adjacency) {
            self.embed(&component, &adjacency, pitch, &mut positions);
            snap_to_grid(component.placement_order(), &mut positions, pitch);

            let Some(bounds) = component
                .frame
                .iter()
                .chain(&component.interior)
                .map(|&node| Rect::from_center(positions[node], graph.size(indices[node])))
                .reduce(|acc, rect| acc.union(&rect))
            else {
                continue;
            };
            let offset = Point::new(cursor - bounds.x, -bounds.y);
            for &node in component.frame.iter().chain(&component.interior) {
                graph.set_position(indices[node], positions[node] + offset);
            }
            cursor += bounds.width + self.params.component_spacing;
        }
    }
}

/// One connected component: its frame in drawing order and every other node.
#[derive(Debug, PartialEq)]
struct Component {
    frame: Vec<usize>,
    interior: Vec<usize>,
}

impl Component {
    fn len(&self) -> usize {
        self.frame.len() + self.interior.len()
    }

    /// Frame first, so the outline keeps its cells when the interior is crowded.
    fn placement_order(&self) -> impl Iterator<Item = usize> + '_ {
        self.frame.iter().chain(&self.interior).copied()
    }
}

/// Connected components in index order, found by an iterative depth-first search that also
/// remembers the shortest cycle closed by a back edge.
fn components(adjacency: &[Vec<usize>]) -> Vec<Component> {
    let count = adjacency.len();
    let mut visited = vec![false; count];
    let mut parent: Vec<Option<usize>> = vec![None; count];
    let mut depth = vec![0usize; count];
    let mut result = Vec::new();

    for start in 0..count {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        let mut nodes = vec![start];
        // (descendant, ancestor) of the shortest back edge so far.
        let mut shortest: Option<(usize, usize)> = None;
        let mut stack = vec![(start, 0usize)];

        while let Some(&(node, next)) = stack.last() {
            let Some(&other) = adjacency[node].get(next) else {
                stack.pop();
                continue;
            };
            if let Some(top) = stack.last_mut() {
                top.1 += 1;
            }
            if !visited[other] {
                visited[other] = true;
                parent[other] = Some(node);
                depth[other] = depth[node] + 1;
                nodes.push(other);
                stack.push((other, 0));
            } else if parent[node] != Some(other) && depth[other] < depth[node] {
                let length = depth[node] - depth[other];
                if shortest.map_or(true, |(low, high)| length < depth[low] - depth[high]) {
                    shortest = Some((node, other));
                }
            }
        }

        let frame = match shortest {
            Some((descendant, ancestor)) => {
                let mut cycle = vec![descendant];
                let mut node = descendant;
                while node != ancestor {
                    match parent[node] {
                        Some(up) => {
                            cycle.push(up);
                            node = up;
                        }
                        None => break,
                    }
                }
                cycle
            }
            None => nodes
                .iter()
                .copied()
                .filter(|&node| adjacency[node].len() <= 1)
                .collect(),
        };
        let in_frame: HashSet<usize> = frame.iter().copied().collect();
        let interior = nodes
            .into_iter()
            .filter(|node| !in_frame.contains(node))
            .collect();
        result.push(Component { frame, interior });
    }
    result
}

fn snap_to_grid(order: impl Iterator<Item = usize>, positions: &mut [Point], pitch: f64) {
    let mut taken: HashSet<Cell> = HashSet::new();
    for node in order {
        let point = positions[node];
        let cell = nearest_free_cell(point, pitch, &taken);
        taken.insert(cell);
        positions[node] = Point::new(cell.0 as f64 * pitch, cell.1 as f64 * pitch);
    }
}

/// The cell under `point` when it is free, else the free cell closest to `point` on the
/// smallest square ring around it.
fn nearest_free_cell(point: Point, pitch: f64, taken: &HashSet<Cell>) -> Cell {
    let target = ((point.x / pitch).round() as i64, (point.y / pitch).round() as i64);
    if !taken.contains(&target) {
        return target;
    }
    let distance = |cell: &Cell| {
        let dx = cell.0 as f64 * pitch - point.x;
        let dy = cell.1 as f64 * pitch - point.y;
        dx * dx + dy * dy
    };
    let mut ring = 1;
    loop {
        let free = ring_cells(target, ring)
            .filter(|cell| !taken.contains(cell))
            .min_by(|a, b| distance(a).total_cmp(&distance(b)));
        if let Some(cell) = free {
            return cell;
        }
        ring += 1;
    }
}

fn ring_cells(center: Cell, ring: i64) -> impl Iterator<Item = Cell> {
    (-ring..=ring)
        .flat_map(move |dy| (-ring..=ring).map(move |dx| (dx, dy)))
        .filter(move |(dx, dy)| dx.abs().max(dy.abs()) == ring)
        .map(move |(dx, dy)| (center.0 + dx, center.1 + dy))
}
