//! Graph model
//!
//!     The graph as the editor holds it: nodes with a label, a position and a shape, edges with
//!     a label, and the canvas the drawing lives on. The mutation API keeps two invariants:
//!
//!         - ids are unique across nodes and edges together;
//!         - every edge endpoint names an existing node.
//!
//!     Deserialization goes through the same checks, so a `Graph` read from JSON or YAML holds
//!     them as well.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use thiserror::Error;

use crate::geometry::{NodeShape, Point, Rect};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GraphError {
    #[error("Duplicate id {0}")]
    DuplicateId(String),
    #[error("Edge {edge} refers to missing node {node}")]
    MissingEndpoint { edge: String, node: String },
    #[error("Unknown node {0}")]
    UnknownNode(String),
    #[error("Unknown edge {0}")]
    UnknownEdge(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,
    #[serde(default)]
    pub label: String,
    /// Centre of the node.
    #[serde(default)]
    pub position: Point,
    #[serde(default)]
    pub root: bool,
    #[serde(default)]
    pub shape: NodeShape,
}

impl Node {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            position: Point::ORIGIN,
            root: false,
            shape: NodeShape::default(),
        }
    }

    pub fn at(mut self, x: f64, y: f64) -> Self {
        self.position = Point::new(x, y);
        self
    }

    pub fn with_shape(mut self, shape: NodeShape) -> Self {
        self.shape = shape;
        self
    }

    pub fn as_root(mut self) -> Self {
        self.root = true;
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub id: String,
    pub from: String,
    pub to: String,
    #[serde(default)]
    pub label: String,
}

impl Edge {
    pub fn new(id: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            from: from.into(),
            to: to.into(),
            label: String::new(),
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    pub fn is_loop(&self) -> bool {
        self.from == self.to
    }
}

/// Serialized form of a [Graph]. Converting it back checks the invariants.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphData {
    #[serde(default)]
    pub nodes: Vec<Node>,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub canvas: Rect,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphData", into = "GraphData")]
pub struct Graph {
    nodes: Vec<Node>,
    edges: Vec<Edge>,
    canvas: Rect,
    ids: HashSet<String>,
}

impl Graph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.nodes.iter().find(|node| node.id == id)
    }

    pub fn edge(&self, id: &str) -> Option<&Edge> {
        self.edges.iter().find(|edge| edge.id == id)
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn canvas(&self) -> Rect {
        self.canvas
    }

    pub(crate) fn set_canvas(&mut self, canvas: Rect) {
        self.canvas = canvas;
    }

    pub fn contains_id(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    pub fn add_node(&mut self, node: Node) -> Result<(), GraphError> {
        if self.ids.contains(&node.id) {
            return Err(GraphError::DuplicateId(node.id));
        }
        self.ids.insert(node.id.clone());
        self.nodes.push(node);
        Ok(())
    }

    pub fn add_edge(&mut self, edge: Edge) -> Result<(), GraphError> {
        if self.ids.contains(&edge.id) {
            return Err(GraphError::DuplicateId(edge.id));
        }
        for endpoint in [&edge.from, &edge.to] {
            if self.node(endpoint).is_none() {
                return Err(GraphError::MissingEndpoint {
                    edge: edge.id.clone(),
                    node: endpoint.clone(),
                });
            }
        }
        self.ids.insert(edge.id.clone());
        self.edges.push(edge);
        Ok(())
    }

    /// Removes a node together with every edge touching it.
    pub fn remove_node(&mut self, id: &str) -> Result<Node, GraphError> {
        let index = self
            .nodes
            .iter()
            .position(|node| node.id == id)
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))?;
        let node = self.nodes.remove(index);
        self.ids.remove(&node.id);
        let ids = &mut self.ids;
        self.edges.retain(|edge| {
            let keep = edge.from != node.id && edge.to != node.id;
            if !keep {
                ids.remove(&edge.id);
            }
            keep
        });
        Ok(node)
    }

    pub fn remove_edge(&mut self, id: &str) -> Result<Edge, GraphError> {
        let index = self
            .edges
            .iter()
            .position(|edge| edge.id == id)
            .ok_or_else(|| GraphError::UnknownEdge(id.to_string()))?;
        let edge = self.edges.remove(index);
        self.ids.remove(&edge.id);
        Ok(edge)
    }

    pub fn set_position(&mut self, id: &str, position: Point) -> Result<(), GraphError> {
        let node = self
            .nodes
            .iter_mut()
            .find(|node| node.id == id)
            .ok_or_else(|| GraphError::UnknownNode(id.to_string()))?;
        node.position = position;
        Ok(())
    }

    pub fn set_label(&mut self, id: &str, label: impl Into<String>) -> Result<(), GraphError> {
        let label = label.into();
        if let Some(node) = self.nodes.iter_mut().find(|node| node.id == id) {
            node.label = label;
            return Ok(());
        }
        if let Some(edge) = self.edges.iter_mut().find(|edge| edge.id == id) {
            edge.label = label;
            return Ok(());
        }
        Err(GraphError::UnknownNode(id.to_string()))
    }

    /// True when the graph has nodes and none of them has been placed yet.
    pub fn needs_initial_layout(&self) -> bool {
        !self.nodes.is_empty() && self.nodes.iter().all(|node| node.position.is_origin())
    }

    /// Writes positions back, in node order. Only the layout engine does this.
    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.iter_mut()
    }
}

impl TryFrom<GraphData> for Graph {
    type Error = GraphError;

    fn try_from(data: GraphData) -> Result<Self, Self::Error> {
        let mut graph = Graph::new();
        for node in data.nodes {
            graph.add_node(node)?;
        }
        for edge in data.edges {
            graph.add_edge(edge)?;
        }
        graph.canvas = data.canvas;
        Ok(graph)
    }
}

impl From<Graph> for GraphData {
    fn from(graph: Graph) -> Self {
        GraphData {
            nodes: graph.nodes,
            edges: graph.edges,
            canvas: graph.canvas,
        }
    }
}
