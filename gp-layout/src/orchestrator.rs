//! Layout orchestration
//!
//!     [LayoutEngine] runs one layout over a [Graph]:
//!
//!         1. build the [AttributedGraph]: sizes from the label metrics, current positions as
//!            hints, node and edge labels;
//!         2. let the strategy move the nodes;
//!         3. shift the drawing so its bounding box starts at the margin and copy positions
//!            back into the graph;
//!         4. size the canvas to the drawing plus the margin on every side.
//!
//!     The graph is only written in steps 3 and 4, after every check has passed: a failed run
//!     leaves it exactly as it was. The attributed graph does not outlive the call.

use thiserror::Error;

use crate::attributed::AttributedGraph;
use crate::geometry::{Point, Rect};
use crate::metrics::{LabelMetrics, MonospaceMetrics};
use crate::model::Graph;
use crate::params::LayoutConfig;
use crate::strategy::{LayoutAlgorithm, LayoutDirection, LayoutStrategy};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LayoutError {
    #[error("Edge {edge} refers to missing node {node}")]
    MissingNode { edge: String, node: String },
    #[error("Layout produced a non-finite position for node {node}")]
    NonFinitePosition { node: String },
}

pub struct LayoutEngine {
    config: LayoutConfig,
    metrics: Box<dyn LabelMetrics>,
}

impl Default for LayoutEngine {
    fn default() -> Self {
        Self::new(LayoutConfig::default())
    }
}

impl std::fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl LayoutEngine {
    /// An engine measuring labels with [MonospaceMetrics].
    pub fn new(config: LayoutConfig) -> Self {
        Self::with_metrics(config, Box::new(MonospaceMetrics::default()))
    }

    pub fn with_metrics(config: LayoutConfig, metrics: Box<dyn LabelMetrics>) -> Self {
        Self { config, metrics }
    }

    pub fn config(&self) -> &LayoutConfig {
        &self.config
    }

    pub fn metrics(&self) -> &dyn LabelMetrics {
        self.metrics.as_ref()
    }

    /// Lays out `graph` with a built-in algorithm. Without a direction the configured one is
    /// used; algorithms that do not grow along a direction ignore it.
    pub fn apply_layout(
        &self,
        graph: &mut Graph,
        algorithm: LayoutAlgorithm,
        direction: Option<LayoutDirection>,
    ) -> Result<(), LayoutError> {
        let direction = direction.unwrap_or(self.config.direction);
        let strategy = algorithm.strategy(&self.config, direction);
        self.apply_strategy(graph, strategy.as_ref())
    }

    /// Lays out `graph` with the configured default algorithm.
    pub fn apply_default_layout(&self, graph: &mut Graph) -> Result<(), LayoutError> {
        self.apply_layout(graph, self.config.algorithm, None)
    }

    /// Lays out `graph` with any strategy.
    pub fn apply_strategy(
        &self,
        graph: &mut Graph,
        strategy: &dyn LayoutStrategy,
    ) -> Result<(), LayoutError> {
        let mut attributed = match AttributedGraph::from_model(graph, self.metrics.as_ref()) {
            Ok(attributed) => attributed,
            Err(error) => {
                log::error!("{} layout aborted: {}", strategy.name(), error);
                return Err(error);
            }
        };
        log::debug!(
            "{} layout of {} node(s), {} edge(s)",
            strategy.name(),
            attributed.node_count(),
            attributed.edge_count()
        );

        strategy.compute_positions(&mut attributed);

        if let Some(node) = attributed.nodes().iter().find(|node| !node.position.is_finite()) {
            let error = LayoutError::NonFinitePosition {
                node: node.id.clone(),
            };
            log::error!("{} layout aborted: {}", strategy.name(), error);
            return Err(error);
        }

        let margin = self.config.margin;
        let canvas = match attributed.bounds() {
            Some(bounds) => {
                attributed.translate(Point::new(margin - bounds.left(), margin - bounds.top()));
                Rect::new(margin, margin, bounds.width, bounds.height).pad(margin)
            }
            None => Rect::new(0.0, 0.0, 2.0 * margin, 2.0 * margin),
        };

        for (node, placed) in graph.nodes_mut().zip(attributed.nodes()) {
            node.position = placed.position;
        }
        graph.set_canvas(canvas);
        log::debug!(
            "{} layout done, canvas {}x{}",
            strategy.name(),
            canvas.width,
            canvas.height
        );
        Ok(())
    }

    /// Applies the circular layout when no node of `graph` has been placed yet. Returns
    /// whether a layout ran.
    pub fn ensure_initial_layout(&self, graph: &mut Graph) -> Result<bool, LayoutError> {
        if !graph.needs_initial_layout() {
            return Ok(false);
        }
        self.apply_layout(graph, LayoutAlgorithm::Circular, None)?;
        Ok(true)
    }
}
