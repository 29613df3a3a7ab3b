//! Plane geometry for graph drawings
//!
//!     Coordinates are `f64`, y grows downwards. A node's position is the centre of its shape;
//!     rectangles are stored by their top-left corner.
//!
//! Edge Clipping
//!
//!     Edges are drawn between the points where the straight line joining two node centres
//!     leaves each node's outline, so arrows end at the shape and not at its centre. See
//!     [boundary_point] for the per-shape intersection.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

use crate::metrics::{node_size, LabelMetrics};
use crate::model::{Graph, GraphError};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ORIGIN: Point = Point { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn length(self) -> f64 {
        self.x.hypot(self.y)
    }

    pub fn distance(self, other: Point) -> f64 {
        (self - other).length()
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    pub fn is_origin(self) -> bool {
        self == Point::ORIGIN
    }
}

impl Add for Point {
    type Output = Point;

    fn add(self, other: Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }
}

impl Sub for Point {
    type Output = Point;

    fn sub(self, other: Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }
}

impl Mul<f64> for Point {
    type Output = Point;

    fn mul(self, factor: f64) -> Point {
        Point::new(self.x * factor, self.y * factor)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Length of the diagonal, the widest extent of the node in any direction.
    pub fn diagonal(self) -> f64 {
        self.width.hypot(self.height)
    }
}

/// Axis-aligned rectangle, stored by its top-left corner.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn from_center(center: Point, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    pub fn left(&self) -> f64 {
        self.x
    }

    pub fn top(&self) -> f64 {
        self.y
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Smallest rectangle containing both.
    pub fn union(&self, other: &Rect) -> Rect {
        let left = self.left().min(other.left());
        let top = self.top().min(other.top());
        let right = self.right().max(other.right());
        let bottom = self.bottom().max(other.bottom());
        Rect::new(left, top, right - left, bottom - top)
    }

    /// Grows the rectangle by `margin` on every side.
    pub fn pad(&self, margin: f64) -> Rect {
        Rect::new(
            self.x - margin,
            self.y - margin,
            self.width + 2.0 * margin,
            self.height + 2.0 * margin,
        )
    }

    pub fn contains_rect(&self, other: &Rect) -> bool {
        const EPSILON: f64 = 1e-6;
        other.left() >= self.left() - EPSILON
            && other.top() >= self.top() - EPSILON
            && other.right() <= self.right() + EPSILON
            && other.bottom() <= self.bottom() + EPSILON
    }

    pub fn intersects(&self, other: &Rect) -> bool {
        self.left() < other.right()
            && other.left() < self.right()
            && self.top() < other.bottom()
            && other.top() < self.bottom()
    }
}

/// Outline of a node, as drawn by the graph editor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeShape {
    #[default]
    Ellipse,
    Rectangle,
    RoundedRectangle,
}

impl NodeShape {
    /// Corner radius of a rounded rectangle, relative to its shorter half-side.
    pub const CORNER_RATIO: f64 = 0.25;
}

/// A straight edge segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Segment {
    pub start: Point,
    pub end: Point,
}

impl Segment {
    pub fn length(&self) -> f64 {
        self.start.distance(self.end)
    }
}

/// The point where the ray from `center` towards `toward` crosses the outline of a node of
/// the given shape and size. Returns `center` when the two points coincide or the node has no
/// extent.
pub fn boundary_point(shape: NodeShape, center: Point, size: Size, toward: Point) -> Point {
    let direction = toward - center;
    let half_width = size.width / 2.0;
    let half_height = size.height / 2.0;
    if direction.length() == 0.0 || half_width <= 0.0 || half_height <= 0.0 {
        return center;
    }

    let t = match shape {
        NodeShape::Ellipse => ellipse_scale(direction, half_width, half_height),
        NodeShape::Rectangle => rectangle_scale(direction, half_width, half_height),
        NodeShape::RoundedRectangle => {
            rounded_rectangle_scale(direction, half_width, half_height)
        }
    };
    center + direction * t
}

/// The drawn line of an edge: from where it leaves its source outline to where it enters its
/// target outline. A self loop yields the zero-length segment at the top of its node, where the
/// renderer anchors the loop.
pub fn edge_line(
    graph: &Graph,
    edge_id: &str,
    metrics: &dyn LabelMetrics,
) -> Result<Segment, GraphError> {
    let edge = graph
        .edge(edge_id)
        .ok_or_else(|| GraphError::UnknownEdge(edge_id.to_string()))?;
    let endpoint = |id: &str| {
        graph.node(id).ok_or_else(|| GraphError::MissingEndpoint {
            edge: edge.id.clone(),
            node: id.to_string(),
        })
    };
    let source = endpoint(&edge.from)?;
    let target = endpoint(&edge.to)?;
    let source_size = node_size(metrics, &source.label, source.shape);

    if edge.is_loop() {
        let top = source.position - Point::new(0.0, 1.0);
        let anchor = boundary_point(source.shape, source.position, source_size, top);
        return Ok(Segment {
            start: anchor,
            end: anchor,
        });
    }

    let target_size = node_size(metrics, &target.label, target.shape);
    Ok(Segment {
        start: boundary_point(source.shape, source.position, source_size, target.position),
        end: boundary_point(target.shape, target.position, target_size, source.position),
    })
}

fn ellipse_scale(direction: Point, a: f64, b: f64) -> f64 {
    1.0 / ((direction.x / a).powi(2) + (direction.y / b).powi(2)).sqrt()
}

fn rectangle_scale(direction: Point, a: f64, b: f64) -> f64 {
    let tx = if direction.x == 0.0 {
        f64::INFINITY
    } else {
        a / direction.x.abs()
    };
    let ty = if direction.y == 0.0 {
        f64::INFINITY
    } else {
        b / direction.y.abs()
    };
    tx.min(ty)
}

fn rounded_rectangle_scale(direction: Point, a: f64, b: f64) -> f64 {
    let t = rectangle_scale(direction, a, b);
    let radius = a.min(b) * NodeShape::CORNER_RATIO;
    let hit = direction * t;
    let inner_x = a - radius;
    let inner_y = b - radius;
    if hit.x.abs() <= inner_x || hit.y.abs() <= inner_y {
        return t;
    }

    // The ray leaves through a rounded corner: intersect it with the corner circle.
    let corner = Point::new(inner_x.copysign(hit.x), inner_y.copysign(hit.y));
    let qa = direction.x * direction.x + direction.y * direction.y;
    let qb = -2.0 * (direction.x * corner.x + direction.y * corner.y);
    let qc = corner.x * corner.x + corner.y * corner.y - radius * radius;
    let discriminant = qb * qb - 4.0 * qa * qc;
    if discriminant < 0.0 {
        return t;
    }
    (-qb + discriminant.sqrt()) / (2.0 * qa)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Point, b: Point) -> bool {
        a.distance(b) < 1e-9
    }

    #[test]
    fn test_rectangle_boundary() {
        let center = Point::new(10.0, 10.0);
        let size = Size::new(40.0, 20.0);
        let right = boundary_point(NodeShape::Rectangle, center, size, Point::new(100.0, 10.0));
        assert!(close(right, Point::new(30.0, 10.0)));
        let below = boundary_point(NodeShape::Rectangle, center, size, Point::new(10.0, 50.0));
        assert!(close(below, Point::new(10.0, 20.0)));
        let corner = boundary_point(NodeShape::Rectangle, center, size, Point::new(50.0, 30.0));
        assert!(close(corner, Point::new(30.0, 20.0)));
    }

    #[test]
    fn test_ellipse_boundary() {
        let size = Size::new(40.0, 20.0);
        let right = boundary_point(NodeShape::Ellipse, Point::ORIGIN, size, Point::new(5.0, 0.0));
        assert!(close(right, Point::new(20.0, 0.0)));
        let diagonal =
            boundary_point(NodeShape::Ellipse, Point::ORIGIN, size, Point::new(30.0, 30.0));
        let on_outline = (diagonal.x / 20.0).powi(2) + (diagonal.y / 10.0).powi(2);
        assert!((on_outline - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_rounded_corner_is_inside_rectangle_corner() {
        let size = Size::new(40.0, 40.0);
        let toward = Point::new(100.0, 100.0);
        let sharp = boundary_point(NodeShape::Rectangle, Point::ORIGIN, size, toward);
        let rounded = boundary_point(NodeShape::RoundedRectangle, Point::ORIGIN, size, toward);
        assert!(rounded.length() < sharp.length());
        // Radius 5, corner centre (15, 15): the hit lies on that circle.
        let from_corner = rounded.distance(Point::new(15.0, 15.0));
        assert!((from_corner - 5.0).abs() < 1e-9);
    }

    #[test]
    fn test_rounded_side_matches_rectangle() {
        let size = Size::new(40.0, 20.0);
        let toward = Point::new(100.0, 0.0);
        assert_eq!(
            boundary_point(NodeShape::RoundedRectangle, Point::ORIGIN, size, toward),
            boundary_point(NodeShape::Rectangle, Point::ORIGIN, size, toward)
        );
    }

    #[test]
    fn test_degenerate_inputs_return_center() {
        let center = Point::new(3.0, 4.0);
        assert_eq!(
            boundary_point(NodeShape::Ellipse, center, Size::new(10.0, 10.0), center),
            center
        );
        assert_eq!(
            boundary_point(NodeShape::Rectangle, center, Size::default(), Point::ORIGIN),
            center
        );
    }

    #[test]
    fn test_edge_line_ends_at_outlines() {
        use crate::metrics::MonospaceMetrics;
        use crate::model::{Edge, Node};

        let metrics = MonospaceMetrics::default();
        let mut graph = Graph::new();
        graph
            .add_node(Node::new("a", "").at(0.0, 0.0).with_shape(NodeShape::Rectangle))
            .unwrap();
        graph.add_node(Node::new("b", "").at(100.0, 0.0)).unwrap();
        graph.add_edge(Edge::new("ab", "a", "b")).unwrap();
        graph.add_edge(Edge::new("aa", "a", "a")).unwrap();

        // Empty labels give 24x24 nodes.
        let line = edge_line(&graph, "ab", &metrics).unwrap();
        assert!(close(line.start, Point::new(12.0, 0.0)));
        assert!(close(line.end, Point::new(88.0, 0.0)));
        assert!((line.length() - 76.0).abs() < 1e-9);

        let anchor = edge_line(&graph, "aa", &metrics).unwrap();
        assert!(close(anchor.start, Point::new(0.0, -12.0)));
        assert_eq!(anchor.length(), 0.0);

        assert_eq!(
            edge_line(&graph, "zz", &metrics),
            Err(GraphError::UnknownEdge("zz".to_string()))
        );
    }

    #[test]
    fn test_union_and_pad() {
        let a = Rect::new(0.0, 0.0, 10.0, 10.0);
        let b = Rect::new(20.0, -5.0, 5.0, 5.0);
        let union = a.union(&b);
        assert_eq!(union, Rect::new(0.0, -5.0, 25.0, 15.0));
        assert_eq!(union.pad(2.0), Rect::new(-2.0, -7.0, 29.0, 19.0));
        assert!(union.contains_rect(&a));
        assert!(union.contains_rect(&b));
    }
}
