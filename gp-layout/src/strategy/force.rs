//! Force-directed layouts
//!
//!     Both strategies treat nodes as mutually repelling particles and edges as attracting
//!     links, and move every node by its net force for a fixed number of iterations.
//!
//!     [SpringLayout] uses Hooke springs with a rest length against inverse-square repulsion,
//!     each move capped by `max_step`. [FruchtermanReingoldLayout] uses `k²/d` repulsion and
//!     `d²/k` attraction with a temperature that cools linearly to zero.
//!
//!     Current positions are the starting point, which lets a user nudge a drawing and re-run
//!     the layout. When two nodes share a position (a freshly created graph has every node at
//!     the origin) all nodes are first spread on a circle. Coincident pairs are pushed apart
//!     along a direction derived from their indices, so runs are deterministic.

use crate::attributed::AttributedGraph;
use crate::geometry::Point;
use crate::params::{FruchtermanReingoldParams, SpringParams};
use crate::strategy::{circle_points, LayoutStrategy};

/// Distances below this are treated as coincident.
const MIN_DISTANCE: f64 = 0.01;

#[derive(Debug, Clone)]
pub struct SpringLayout {
    params: SpringParams,
}

impl SpringLayout {
    pub fn new(params: SpringParams) -> Self {
        Self { params }
    }
}

impl LayoutStrategy for SpringLayout {
    fn name(&self) -> &'static str {
        "spring"
    }

    fn compute_positions(&self, graph: &mut AttributedGraph) {
        let mut positions = seed_positions(graph, self.params.spring_length);
        let links = links(graph);
        let params = &self.params;

        for _ in 0..params.iterations {
            let mut forces = repulsion(&positions, |distance| {
                params.repulsion / (distance * distance)
            });
            for &(source, sink) in &links {
                let (direction, distance) = separation(&positions, sink, source);
                let pull = direction * (params.spring_constant * (distance - params.spring_length));
                forces[source] = forces[source] + pull;
                forces[sink] = forces[sink] - pull;
            }
            for (position, force) in positions.iter_mut().zip(&forces) {
                *position = *position + capped(*force, params.max_step);
            }
        }
        write_back(graph, &positions);
    }
}

#[derive(Debug, Clone)]
pub struct FruchtermanReingoldLayout {
    params: FruchtermanReingoldParams,
}

impl FruchtermanReingoldLayout {
    pub fn new(params: FruchtermanReingoldParams) -> Self {
        Self { params }
    }
}

impl LayoutStrategy for FruchtermanReingoldLayout {
    fn name(&self) -> &'static str {
        "fruchterman_reingold"
    }

    fn compute_positions(&self, graph: &mut AttributedGraph) {
        let k = self.params.optimal_distance.max(MIN_DISTANCE);
        let mut positions = seed_positions(graph, k);
        let links = links(graph);
        let iterations = self.params.iterations;

        for iteration in 0..iterations {
            let temperature =
                self.params.initial_temperature * (1.0 - iteration as f64 / iterations as f64);
            let mut forces = repulsion(&positions, |distance| k * k / distance);
            for &(source, sink) in &links {
                let (direction, distance) = separation(&positions, sink, source);
                let pull = direction * (distance * distance / k);
                forces[source] = forces[source] + pull;
                forces[sink] = forces[sink] - pull;
            }
            for (position, force) in positions.iter_mut().zip(&forces) {
                *position = *position + capped(*force, temperature);
            }
        }
        write_back(graph, &positions);
    }
}

/// Edges as index pairs, without self loops.
fn links(graph: &AttributedGraph) -> Vec<(usize, usize)> {
    graph
        .edges()
        .iter()
        .filter(|edge| edge.source != edge.sink)
        .map(|edge| (edge.source.index(), edge.sink.index()))
        .collect()
}

/// Current positions, or a circle around the origin when some of them coincide.
fn seed_positions(graph: &AttributedGraph, spacing: f64) -> Vec<Point> {
    let positions: Vec<Point> = graph.nodes().iter().map(|node| node.position).collect();
    let coincide = positions.iter().enumerate().any(|(i, a)| {
        positions[i + 1..]
            .iter()
            .any(|b| a.distance(*b) < MIN_DISTANCE)
    });
    if !coincide {
        return positions;
    }
    let count = positions.len();
    let step = spacing.max(graph.max_diagonal());
    let radius = (count as f64 * step / std::f64::consts::TAU).max(step / 2.0);
    circle_points(count, radius).collect()
}

/// Unit vector from `from` to `to` and their distance. Coincident points get a
/// direction chosen from their indices and the minimum distance.
fn separation(positions: &[Point], to: usize, from: usize) -> (Point, f64) {
    let delta = positions[to] - positions[from];
    let distance = delta.length();
    if distance < MIN_DISTANCE {
        let angle = (from * 31 + to * 17) as f64;
        return (Point::new(angle.cos(), angle.sin()), MIN_DISTANCE);
    }
    (delta * (1.0 / distance), distance)
}

fn repulsion(positions: &[Point], strength: impl Fn(f64) -> f64) -> Vec<Point> {
    let mut forces = vec![Point::ORIGIN; positions.len()];
    for i in 0..positions.len() {
        for j in i + 1..positions.len() {
            let (direction, distance) = separation(positions, i, j);
            let push = direction * strength(distance);
            forces[i] = forces[i] + push;
            forces[j] = forces[j] - push;
        }
    }
    forces
}

fn capped(force: Point, limit: f64) -> Point {
    let length = force.length();
    if !length.is_finite() || length <= limit.max(0.0) {
        return if length.is_finite() { force } else { Point::ORIGIN };
    }
    force * (limit / length)
}

fn write_back(graph: &mut AttributedGraph, positions: &[Point]) {
    let indices: Vec<_> = graph.node_indices().collect();
    for (index, position) in indices.into_iter().zip(positions) {
        graph.set_position(index, *position);
    }
}
