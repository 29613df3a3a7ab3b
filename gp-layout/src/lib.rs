//! Graph layout for the GP graph editor
//!
//!     A [Graph] is what the editor holds and saves: nodes, edges and the canvas. Layout runs go
//!     through a [LayoutEngine], which builds a short-lived [AttributedGraph], hands it to a
//!     [LayoutStrategy] and writes the resulting positions and canvas back.
//!
//!     Modules:
//!
//!         model           graph model and its mutation API
//!         geometry        points, rectangles, node outlines and edge lines
//!         metrics         label measurement and node sizing
//!         attributed      structural graph the strategies work on
//!         strategy        the strategy trait and the built-in strategies
//!         params          strategy tunables
//!         orchestrator    the layout pipeline
//!
//!     Example:
//!
//!         let mut graph = Graph::new();
//!         graph.add_node(Node::new("n1", "1"))?;
//!         graph.add_node(Node::new("n2", "2"))?;
//!         graph.add_edge(Edge::new("e1", "n1", "n2"))?;
//!         LayoutEngine::default().apply_layout(&mut graph, LayoutAlgorithm::Tree, None)?;

pub mod attributed;
pub mod geometry;
pub mod metrics;
pub mod model;
pub mod orchestrator;
pub mod params;
pub mod strategy;

pub use attributed::{AttributedGraph, LayoutEdge, LayoutNode, NodeIndex};
pub use geometry::{boundary_point, edge_line, NodeShape, Point, Rect, Segment, Size};
pub use metrics::{node_size, LabelMetrics, MonospaceMetrics};
pub use model::{Edge, Graph, GraphData, GraphError, Node};
pub use orchestrator::{LayoutEngine, LayoutError};
pub use params::{
    CircularParams, FruchtermanReingoldParams, LayeredParams, LayoutConfig, PlanarParams,
    RadialParams, SpringParams, TreeParams,
};
pub use strategy::{
    LayoutAlgorithm, LayoutDirection, LayoutStrategy, UnknownAlgorithm, UnknownDirection,
};
