//! Layout strategies
//!
//!     A strategy moves the nodes of an [AttributedGraph] to their final centres and nothing
//!     else: translation to the canvas, write-back and canvas sizing are left to the
//!     orchestrator. New strategies implement [LayoutStrategy] and can be handed to
//!     `LayoutEngine::apply_strategy` directly; the built-in ones are selected through
//!     [LayoutAlgorithm].
//!
//!         tree                    levelled spanning tree, subtrees side by side
//!         layered                 longest-path ranks, barycenter ordering within ranks
//!         radial_tree             spanning tree on concentric rings
//!         spring                  spring embedder (Hooke springs, inverse-square repulsion)
//!         fruchterman_reingold    force-directed with linear cooling
//!         circular                evenly spaced on one circle
//!         planar                  barycentric drawing in a convex frame, snapped to a grid
//!
//!     Strategies are deterministic: the same graph and parameters always give the same
//!     drawing.

pub mod circular;
pub mod force;
pub mod layered;
pub mod planar;
pub mod radial;
pub mod tree;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

use crate::attributed::AttributedGraph;
use crate::geometry::{Point, Size};
use crate::params::LayoutConfig;

pub trait LayoutStrategy {
    fn name(&self) -> &'static str;

    /// Assigns a centre to every node of `graph`.
    fn compute_positions(&self, graph: &mut AttributedGraph);
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown layout algorithm '{0}' (expected one of: {names})", names = LayoutAlgorithm::names().join(", "))]
pub struct UnknownAlgorithm(pub String);

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Unknown layout direction '{0}' (expected one of: top_to_bottom, bottom_to_top, left_to_right, right_to_left)")]
pub struct UnknownDirection(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutAlgorithm {
    Tree,
    Layered,
    RadialTree,
    Spring,
    FruchtermanReingold,
    Circular,
    Planar,
}

impl LayoutAlgorithm {
    pub const ALL: &'static [LayoutAlgorithm] = &[
        LayoutAlgorithm::Tree,
        LayoutAlgorithm::Layered,
        LayoutAlgorithm::RadialTree,
        LayoutAlgorithm::Spring,
        LayoutAlgorithm::FruchtermanReingold,
        LayoutAlgorithm::Circular,
        LayoutAlgorithm::Planar,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LayoutAlgorithm::Tree => "tree",
            LayoutAlgorithm::Layered => "layered",
            LayoutAlgorithm::RadialTree => "radial_tree",
            LayoutAlgorithm::Spring => "spring",
            LayoutAlgorithm::FruchtermanReingold => "fruchterman_reingold",
            LayoutAlgorithm::Circular => "circular",
            LayoutAlgorithm::Planar => "planar",
        }
    }

    pub fn names() -> Vec<&'static str> {
        Self::ALL.iter().map(|algorithm| algorithm.as_str()).collect()
    }

    /// Strategies that lay out along a direction.
    pub fn uses_direction(self) -> bool {
        matches!(self, LayoutAlgorithm::Tree | LayoutAlgorithm::Layered)
    }

    /// The strategy for this algorithm, configured from `config`.
    pub fn strategy(
        self,
        config: &LayoutConfig,
        direction: LayoutDirection,
    ) -> Box<dyn LayoutStrategy> {
        match self {
            LayoutAlgorithm::Tree => Box::new(tree::TreeLayout::new(config.tree.clone(), direction)),
            LayoutAlgorithm::Layered => Box::new(layered::LayeredLayout::new(
                config.layered.clone(),
                direction,
            )),
            LayoutAlgorithm::RadialTree => Box::new(radial::RadialTreeLayout::new(config.radial.clone())),
            LayoutAlgorithm::Spring => Box::new(force::SpringLayout::new(config.spring.clone())),
            LayoutAlgorithm::FruchtermanReingold => Box::new(force::FruchtermanReingoldLayout::new(
                config.fruchterman_reingold.clone(),
            )),
            LayoutAlgorithm::Circular => Box::new(circular::CircularLayout::new(config.circular.clone())),
            LayoutAlgorithm::Planar => Box::new(planar::PlanarLayout::new(config.planar.clone())),
        }
    }
}

impl FromStr for LayoutAlgorithm {
    type Err = UnknownAlgorithm;

    /// Accepts the snake_case name, ignoring case and treating `-` like `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace('-', "_");
        Self::ALL
            .iter()
            .copied()
            .find(|algorithm| algorithm.as_str() == normalized)
            .ok_or_else(|| UnknownAlgorithm(s.to_string()))
    }
}

impl fmt::Display for LayoutAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Growth direction of the tree family: where the roots sit relative to their descendants.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutDirection {
    #[default]
    TopToBottom,
    BottomToTop,
    LeftToRight,
    RightToLeft,
}

impl LayoutDirection {
    pub fn is_horizontal(self) -> bool {
        matches!(self, LayoutDirection::LeftToRight | LayoutDirection::RightToLeft)
    }

    /// Extent of a node across the levels and along them, as `(cross, main)`.
    pub fn extents(self, size: Size) -> (f64, f64) {
        if self.is_horizontal() {
            (size.height, size.width)
        } else {
            (size.width, size.height)
        }
    }

    /// Maps a point computed top-to-bottom (`cross` across levels, `main` down the levels)
    /// into this direction.
    pub fn orient(self, cross: f64, main: f64) -> Point {
        match self {
            LayoutDirection::TopToBottom => Point::new(cross, main),
            LayoutDirection::BottomToTop => Point::new(cross, -main),
            LayoutDirection::LeftToRight => Point::new(main, cross),
            LayoutDirection::RightToLeft => Point::new(-main, cross),
        }
    }
}

impl FromStr for LayoutDirection {
    type Err = UnknownDirection;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "top_to_bottom" | "tb" => Ok(LayoutDirection::TopToBottom),
            "bottom_to_top" | "bt" => Ok(LayoutDirection::BottomToTop),
            "left_to_right" | "lr" => Ok(LayoutDirection::LeftToRight),
            "right_to_left" | "rl" => Ok(LayoutDirection::RightToLeft),
            _ => Err(UnknownDirection(s.to_string())),
        }
    }
}

/// Evenly spaced points on a circle around the origin, starting at the top and going
/// clockwise (y grows downwards).
pub(crate) fn circle_points(count: usize, radius: f64) -> impl Iterator<Item = Point> {
    (0..count).map(move |i| {
        let angle = -std::f64::consts::FRAC_PI_2
            + 2.0 * std::f64::consts::PI * i as f64 / count as f64;
        Point::new(radius * angle.cos(), radius * angle.sin())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_algorithm_names_round_trip() {
        for algorithm in LayoutAlgorithm::ALL {
            assert_eq!(algorithm.as_str().parse::<LayoutAlgorithm>(), Ok(*algorithm));
        }
        assert_eq!("Radial-Tree".parse(), Ok(LayoutAlgorithm::RadialTree));
    }

    #[test]
    fn test_unknown_algorithm_lists_choices() {
        let error = "orthogonal".parse::<LayoutAlgorithm>().unwrap_err();
        let message = error.to_string();
        assert!(message.contains("'orthogonal'"));
        assert!(message.contains("planar"));
        assert!(message.contains("fruchterman_reingold"));
    }

    #[test]
    fn test_direction_orientation() {
        assert_eq!(LayoutDirection::TopToBottom.orient(1.0, 2.0), Point::new(1.0, 2.0));
        assert_eq!(LayoutDirection::BottomToTop.orient(1.0, 2.0), Point::new(1.0, -2.0));
        assert_eq!(LayoutDirection::LeftToRight.orient(1.0, 2.0), Point::new(2.0, 1.0));
        assert_eq!(LayoutDirection::RightToLeft.orient(1.0, 2.0), Point::new(-2.0, 1.0));
        assert_eq!("lr".parse(), Ok(LayoutDirection::LeftToRight));
        assert!("diagonal".parse::<LayoutDirection>().is_err());
    }

    #[test]
    fn test_serde_names_match_display() {
        let json = serde_json::to_string(&LayoutAlgorithm::FruchtermanReingold).unwrap();
        assert_eq!(json, "\"fruchterman_reingold\"");
    }
}
