//! Layout tunables
//!
//!     One section per strategy plus the values the orchestrator itself uses. Every field has a
//!     default, so configuration files only need to list what they change. The defaults here
//!     are mirrored in the embedded configuration of `gp-config`.

use serde::{Deserialize, Serialize};

use crate::strategy::{LayoutAlgorithm, LayoutDirection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    /// Free space between the drawing and the canvas border.
    pub margin: f64,
    /// Strategy used when the caller does not name one.
    pub algorithm: LayoutAlgorithm,
    /// Direction for the tree family when the caller does not give one.
    pub direction: LayoutDirection,
    pub tree: TreeParams,
    pub layered: LayeredParams,
    pub radial: RadialParams,
    pub spring: SpringParams,
    pub fruchterman_reingold: FruchtermanReingoldParams,
    pub circular: CircularParams,
    pub planar: PlanarParams,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            margin: 20.0,
            algorithm: LayoutAlgorithm::Circular,
            direction: LayoutDirection::TopToBottom,
            tree: TreeParams::default(),
            layered: LayeredParams::default(),
            radial: RadialParams::default(),
            spring: SpringParams::default(),
            fruchterman_reingold: FruchtermanReingoldParams::default(),
            circular: CircularParams::default(),
            planar: PlanarParams::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TreeParams {
    /// Gap between consecutive levels.
    pub level_distance: f64,
    /// Gap between neighbouring subtrees.
    pub sibling_distance: f64,
}

impl Default for TreeParams {
    fn default() -> Self {
        Self {
            level_distance: 60.0,
            sibling_distance: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayeredParams {
    pub rank_spacing: f64,
    pub node_spacing: f64,
    /// Barycenter passes (down and up) used to reduce crossings.
    pub ordering_sweeps: usize,
}

impl Default for LayeredParams {
    fn default() -> Self {
        Self {
            rank_spacing: 60.0,
            node_spacing: 30.0,
            ordering_sweeps: 2,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadialParams {
    /// Gap between consecutive rings.
    pub level_distance: f64,
    /// Minimum gap between nodes on the same ring.
    pub node_spacing: f64,
}

impl Default for RadialParams {
    fn default() -> Self {
        Self {
            level_distance: 60.0,
            node_spacing: 20.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpringParams {
    pub iterations: usize,
    /// Rest length of an edge.
    pub spring_length: f64,
    pub spring_constant: f64,
    pub repulsion: f64,
    /// Largest move of one node in one iteration.
    pub max_step: f64,
}

impl Default for SpringParams {
    fn default() -> Self {
        Self {
            iterations: 300,
            spring_length: 100.0,
            spring_constant: 0.05,
            repulsion: 20000.0,
            max_step: 30.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FruchtermanReingoldParams {
    pub iterations: usize,
    /// Ideal edge length (`k`).
    pub optimal_distance: f64,
    /// Largest move in the first iteration; cools linearly to zero.
    pub initial_temperature: f64,
}

impl Default for FruchtermanReingoldParams {
    fn default() -> Self {
        Self {
            iterations: 300,
            optimal_distance: 90.0,
            initial_temperature: 60.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircularParams {
    /// Minimum gap between neighbouring nodes on the circle.
    pub node_spacing: f64,
}

impl Default for CircularParams {
    fn default() -> Self {
        Self { node_spacing: 30.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanarParams {
    /// Added to the widest node diagonal to give the grid pitch.
    pub node_spacing: f64,
    /// Horizontal gap between connected components.
    pub component_spacing: f64,
    /// Barycenter passes over the interior nodes.
    pub iterations: usize,
}

impl Default for PlanarParams {
    fn default() -> Self {
        Self {
            node_spacing: 30.0,
            component_spacing: 60.0,
            iterations: 100,
        }
    }
}
