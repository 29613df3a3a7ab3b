//! Property-based layout tests
//!
//! For any graph, every algorithm must:
//! - give each node a finite position with non-negative coordinates
//! - keep every node inside the canvas
//! - size the canvas to at least the drawing plus the margin

use gp_layout::{
    node_size, Edge, Graph, LayoutAlgorithm, LayoutEngine, MonospaceMetrics, Node, NodeShape,
    Point, Rect,
};
use proptest::prelude::*;

fn shape_strategy() -> impl Strategy<Value = NodeShape> {
    prop_oneof![
        Just(NodeShape::Ellipse),
        Just(NodeShape::Rectangle),
        Just(NodeShape::RoundedRectangle),
    ]
}

/// Graphs of up to 12 nodes with random labels, shapes, hints and edges.
fn graph_strategy() -> impl Strategy<Value = Graph> {
    let node = ("[a-z ]{0,12}", shape_strategy(), -500.0..500.0f64, -500.0..500.0f64);
    prop::collection::vec(node, 0..12).prop_flat_map(|nodes| {
        let count = nodes.len();
        let edges = if count == 0 {
            Just(Vec::new()).boxed()
        } else {
            prop::collection::vec((0..count, 0..count), 0..(count * 2)).boxed()
        };
        (Just(nodes), edges).prop_map(|(nodes, edges)| {
            let mut graph = Graph::new();
            for (i, (label, shape, x, y)) in nodes.into_iter().enumerate() {
                let node = Node::new(format!("n{}", i), label).with_shape(shape).at(x, y);
                graph.add_node(node).unwrap();
            }
            for (i, (from, to)) in edges.into_iter().enumerate() {
                let edge = Edge::new(format!("e{}", i), format!("n{}", from), format!("n{}", to));
                graph.add_edge(edge).unwrap();
            }
            graph
        })
    })
}

fn algorithm_strategy() -> impl Strategy<Value = LayoutAlgorithm> {
    prop::sample::select(LayoutAlgorithm::ALL.to_vec())
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn layout_fits_inside_canvas(mut graph in graph_strategy(), algorithm in algorithm_strategy()) {
        let engine = LayoutEngine::default();
        let margin = engine.config().margin;
        prop_assert!(engine.apply_layout(&mut graph, algorithm, None).is_ok());

        let metrics = MonospaceMetrics::default();
        let canvas = graph.canvas();
        let mut union: Option<Rect> = None;
        for node in graph.nodes() {
            prop_assert!(node.position.is_finite());
            prop_assert!(node.position.x >= 0.0 && node.position.y >= 0.0);
            let rect = Rect::from_center(node.position, node_size(&metrics, &node.label, node.shape));
            prop_assert!(canvas.contains_rect(&rect), "{} outside {:?}", node.id, canvas);
            union = Some(union.map_or(rect, |u| u.union(&rect)));
        }
        if let Some(union) = union {
            prop_assert!(canvas.contains_rect(&union.pad(margin)));
            prop_assert!((union.left() - margin).abs() < 1e-6);
            prop_assert!((union.top() - margin).abs() < 1e-6);
        } else {
            prop_assert_eq!(canvas, Rect::new(0.0, 0.0, 2.0 * margin, 2.0 * margin));
        }
    }

    #[test]
    fn initial_layout_separates_unplaced_nodes(count in 1usize..20) {
        let mut graph = Graph::new();
        for i in 0..count {
            graph.add_node(Node::new(format!("n{}", i), format!("{}", i))).unwrap();
        }
        let engine = LayoutEngine::default();
        prop_assert_eq!(engine.ensure_initial_layout(&mut graph), Ok(true));
        let positions: Vec<Point> = graph.nodes().iter().map(|node| node.position).collect();
        for (i, a) in positions.iter().enumerate() {
            for b in &positions[i + 1..] {
                prop_assert!(a.distance(*b) > 1.0);
            }
        }
    }
}
