//! Label measurement
//!
//!     Node sizes are derived from the rendered size of their labels. The renderer owns the
//!     fonts, so measurement is a trait; [MonospaceMetrics] approximates a fixed-width font and
//!     is what the command line and the tests use.

use crate::geometry::{NodeShape, Size};

/// Padding between a label and the node outline, on each side.
pub const NODE_PADDING: f64 = 8.0;
/// Smallest node extent in either dimension.
pub const MIN_NODE_EXTENT: f64 = 24.0;

pub trait LabelMetrics {
    /// Rendered size of `text`, which may span several lines.
    fn text_size(&self, text: &str) -> Size;
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub char_width: f64,
    pub line_height: f64,
}

impl Default for MonospaceMetrics {
    fn default() -> Self {
        Self {
            char_width: 7.2,
            line_height: 16.0,
        }
    }
}

impl LabelMetrics for MonospaceMetrics {
    fn text_size(&self, text: &str) -> Size {
        if text.is_empty() {
            return Size::default();
        }
        let lines = text.lines().count().max(1);
        let widest = text.lines().map(|line| line.chars().count()).max().unwrap_or(0);
        Size::new(
            widest as f64 * self.char_width,
            lines as f64 * self.line_height,
        )
    }
}

/// Size of a node drawn with `shape` around `label`.
///
/// An ellipse needs `√2` times the label box to enclose its corners.
pub fn node_size(metrics: &dyn LabelMetrics, label: &str, shape: NodeShape) -> Size {
    let text = metrics.text_size(label);
    let scale = match shape {
        NodeShape::Ellipse => std::f64::consts::SQRT_2,
        NodeShape::Rectangle | NodeShape::RoundedRectangle => 1.0,
    };
    Size::new(
        (text.width * scale + 2.0 * NODE_PADDING).max(MIN_NODE_EXTENT),
        (text.height * scale + 2.0 * NODE_PADDING).max(MIN_NODE_EXTENT),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_monospace_counts_widest_line() {
        let metrics = MonospaceMetrics {
            char_width: 10.0,
            line_height: 20.0,
        };
        assert_eq!(metrics.text_size("ab\nabcd"), Size::new(40.0, 40.0));
        assert_eq!(metrics.text_size(""), Size::default());
    }

    #[test]
    fn test_node_size_has_a_floor() {
        let metrics = MonospaceMetrics::default();
        let size = node_size(&metrics, "", NodeShape::Rectangle);
        assert_eq!(size, Size::new(MIN_NODE_EXTENT, MIN_NODE_EXTENT));
    }

    #[test]
    fn test_ellipse_is_larger_than_rectangle() {
        let metrics = MonospaceMetrics::default();
        let ellipse = node_size(&metrics, "a long label", NodeShape::Ellipse);
        let rectangle = node_size(&metrics, "a long label", NodeShape::Rectangle);
        assert!(ellipse.width > rectangle.width);
    }
}
