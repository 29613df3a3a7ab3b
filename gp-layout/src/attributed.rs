//! Attributed graph
//!
//!     The structural graph a layout strategy works on. It is built from a [Graph] right before
//!     a layout run and dropped once positions have been written back: nodes are addressed by
//!     dense [NodeIndex] values and carry their size, label and current position; each node
//!     keeps its outgoing and incoming neighbours sorted by index so adjacency tests are a binary
//!     search.

use smallvec::SmallVec;
use std::collections::HashMap;
use std::ops::Index;

use crate::geometry::{NodeShape, Point, Rect, Size};
use crate::metrics::{node_size, LabelMetrics};
use crate::model::Graph;
use crate::orchestrator::LayoutError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(usize);

impl NodeIndex {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct LayoutNode {
    pub id: String,
    pub label: String,
    pub size: Size,
    pub shape: NodeShape,
    /// Centre of the node. Holds the current position as a hint until a strategy moves it.
    pub position: Point,
    pub root: bool,
    outgoing: SmallVec<[NodeIndex; 4]>,
    incoming: SmallVec<[NodeIndex; 4]>,
}

impl LayoutNode {
    pub fn bounds(&self) -> Rect {
        Rect::from_center(self.position, self.size)
    }
}

#[derive(Debug, Clone)]
pub struct LayoutEdge {
    pub source: NodeIndex,
    pub sink: NodeIndex,
    pub label: String,
}

#[derive(Debug, Clone, Default)]
pub struct AttributedGraph {
    nodes: Vec<LayoutNode>,
    edges: Vec<LayoutEdge>,
}

impl AttributedGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the structural view of `graph`, sizing nodes with `metrics`.
    pub fn from_model(graph: &Graph, metrics: &dyn LabelMetrics) -> Result<Self, LayoutError> {
        let mut attributed = AttributedGraph::new();
        let mut indices: HashMap<&str, NodeIndex> = HashMap::new();
        for node in graph.nodes() {
            let index = attributed.add_node(
                node.id.clone(),
                node.label.clone(),
                node_size(metrics, &node.label, node.shape),
            );
            let added = &mut attributed.nodes[index.0];
            added.position = node.position;
            added.root = node.root;
            added.shape = node.shape;
            indices.insert(node.id.as_str(), index);
        }
        for edge in graph.edges() {
            let lookup = |id: &str| {
                indices
                    .get(id)
                    .copied()
                    .ok_or_else(|| LayoutError::MissingNode {
                        edge: edge.id.clone(),
                        node: id.to_string(),
                    })
            };
            let source = lookup(&edge.from)?;
            let sink = lookup(&edge.to)?;
            attributed.add_edge(source, sink, edge.label.clone());
        }
        Ok(attributed)
    }

    pub fn add_node(&mut self, id: String, label: String, size: Size) -> NodeIndex {
        let index = NodeIndex(self.nodes.len());
        self.nodes.push(LayoutNode {
            id,
            label,
            size,
            shape: NodeShape::default(),
            position: Point::ORIGIN,
            root: false,
            outgoing: SmallVec::new(),
            incoming: SmallVec::new(),
        });
        index
    }

    /// Adds a directed edge. Parallel edges and loops are kept.
    pub fn add_edge(&mut self, source: NodeIndex, sink: NodeIndex, label: String) {
        insert_sorted(&mut self.nodes[source.0].outgoing, sink);
        insert_sorted(&mut self.nodes[sink.0].incoming, source);
        self.edges.push(LayoutEdge {
            source,
            sink,
            label,
        });
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node_indices(&self) -> impl Iterator<Item = NodeIndex> {
        (0..self.nodes.len()).map(NodeIndex)
    }

    pub fn nodes(&self) -> &[LayoutNode] {
        &self.nodes
    }

    pub fn edges(&self) -> &[LayoutEdge] {
        &self.edges
    }

    pub fn position(&self, node: NodeIndex) -> Point {
        self.nodes[node.0].position
    }

    pub fn set_position(&mut self, node: NodeIndex, position: Point) {
        self.nodes[node.0].position = position;
    }

    pub fn size(&self, node: NodeIndex) -> Size {
        self.nodes[node.0].size
    }

    /// Targets of outgoing edges, ascending, one entry per edge.
    pub fn successors(&self, node: NodeIndex) -> &[NodeIndex] {
        &self.nodes[node.0].outgoing
    }

    /// Sources of incoming edges, ascending, one entry per edge.
    pub fn predecessors(&self, node: NodeIndex) -> &[NodeIndex] {
        &self.nodes[node.0].incoming
    }

    /// Neighbours in either direction, ascending, without duplicates or `node` itself.
    pub fn neighbors(&self, node: NodeIndex) -> Vec<NodeIndex> {
        let mut all: Vec<NodeIndex> = self
            .successors(node)
            .iter()
            .chain(self.predecessors(node))
            .copied()
            .filter(|other| *other != node)
            .collect();
        all.sort_unstable();
        all.dedup();
        all
    }

    pub fn has_edge(&self, source: NodeIndex, sink: NodeIndex) -> bool {
        self.nodes[source.0]
            .outgoing
            .binary_search_by_key(&sink, |target| *target)
            .is_ok()
    }

    /// Nodes a hierarchy should start from: nodes flagged as roots; failing that, nodes without
    /// incoming edges from other nodes; failing that (every node sits on a cycle), the first
    /// node.
    pub fn roots(&self) -> Vec<NodeIndex> {
        let flagged: Vec<_> = self
            .node_indices()
            .filter(|index| self.nodes[index.0].root)
            .collect();
        if !flagged.is_empty() {
            return flagged;
        }
        let sources: Vec<_> = self
            .node_indices()
            .filter(|index| self.predecessors(*index).iter().all(|p| p == index))
            .collect();
        if !sources.is_empty() {
            return sources;
        }
        self.node_indices().take(1).collect()
    }

    /// Bounding box of all node extents.
    pub fn bounds(&self) -> Option<Rect> {
        self.nodes
            .iter()
            .map(LayoutNode::bounds)
            .reduce(|acc, rect| acc.union(&rect))
    }

    pub fn translate(&mut self, offset: Point) {
        for node in &mut self.nodes {
            node.position = node.position + offset;
        }
    }

    /// Widest node diagonal, the spacing unit for most strategies.
    pub fn max_diagonal(&self) -> f64 {
        self.nodes
            .iter()
            .map(|node| node.size.diagonal())
            .fold(0.0, f64::max)
    }
}

impl Index<NodeIndex> for AttributedGraph {
    type Output = LayoutNode;

    fn index(&self, index: NodeIndex) -> &LayoutNode {
        &self.nodes[index.0]
    }
}

fn insert_sorted(list: &mut SmallVec<[NodeIndex; 4]>, value: NodeIndex) {
    let at = match list.binary_search_by_key(&value, |existing| *existing) {
        Ok(at) | Err(at) => at,
    };
    list.insert(at, value);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metrics::MonospaceMetrics;
    use crate::model::{Edge, Node};

    fn model() -> Graph {
        let mut graph = Graph::new();
        graph.add_node(Node::new("a", "A").at(5.0, 5.0)).unwrap();
        graph.add_node(Node::new("b", "B")).unwrap();
        graph.add_node(Node::new("c", "C")).unwrap();
        graph.add_edge(Edge::new("e1", "a", "c")).unwrap();
        graph.add_edge(Edge::new("e2", "a", "b").with_label("x")).unwrap();
        graph.add_edge(Edge::new("e3", "c", "a")).unwrap();
        graph
    }

    #[test]
    fn test_from_model_keeps_hints_and_labels() {
        let graph = AttributedGraph::from_model(&model(), &MonospaceMetrics::default()).unwrap();
        assert_eq!(graph.node_count(), 3);
        assert_eq!(graph.edge_count(), 3);
        let a = NodeIndex(0);
        assert_eq!(graph.position(a), Point::new(5.0, 5.0));
        assert_eq!(graph[a].label, "A");
        assert_eq!(graph.edges()[1].label, "x");
    }

    #[test]
    fn test_adjacency_is_sorted() {
        let graph = AttributedGraph::from_model(&model(), &MonospaceMetrics::default()).unwrap();
        let a = NodeIndex(0);
        assert_eq!(graph.successors(a), &[NodeIndex(1), NodeIndex(2)]);
        assert_eq!(graph.predecessors(a), &[NodeIndex(2)]);
        assert!(graph.has_edge(a, NodeIndex(2)));
        assert!(!graph.has_edge(NodeIndex(1), a));
        assert_eq!(graph.neighbors(a), vec![NodeIndex(1), NodeIndex(2)]);
    }

    #[test]
    fn test_roots_fall_back_through_cycles() {
        let mut graph = AttributedGraph::new();
        let x = graph.add_node("x".into(), String::new(), Size::new(10.0, 10.0));
        let y = graph.add_node("y".into(), String::new(), Size::new(10.0, 10.0));
        graph.add_edge(x, y, String::new());
        graph.add_edge(y, x, String::new());
        assert_eq!(graph.roots(), vec![x]);

        graph.add_edge(y, y, String::new());
        let z = graph.add_node("z".into(), String::new(), Size::new(10.0, 10.0));
        graph.add_edge(z, z, String::new());
        assert_eq!(graph.roots(), vec![z]);
    }

    #[test]
    fn test_bounds_cover_all_nodes() {
        let mut graph = AttributedGraph::new();
        let a = graph.add_node("a".into(), String::new(), Size::new(10.0, 20.0));
        let b = graph.add_node("b".into(), String::new(), Size::new(10.0, 20.0));
        graph.set_position(a, Point::new(0.0, 0.0));
        graph.set_position(b, Point::new(100.0, 50.0));
        assert_eq!(graph.bounds(), Some(Rect::new(-5.0, -10.0, 110.0, 70.0)));
        assert_eq!(AttributedGraph::new().bounds(), None);
    }
}
