//! Layered layout for prerequisite ("tech tree") graphs.
//!
//! The pipeline runs in a fixed order over one working [`techtree_graph::Tree`]:
//! sanitize -> layer assignment -> edge normalization -> row collapse ->
//! crossing minimization -> edge-length minimization -> empty-row removal.
//! Each stage assumes the invariants established by the previous one; the
//! [`engine::LayoutEngine`] driver is the only supported way to run them
//! against caller input.

pub mod build;
pub mod compact;
pub mod engine;
pub mod normalize;
pub mod order;
pub mod rank;
pub mod sanitize;
pub mod straighten;

mod error;
mod input;
mod node;
mod result;

pub use engine::LayoutEngine;
pub use error::{LayoutError, Result};
pub use input::{NodeStatus, TechItem, TechLevel, TechState};
pub use node::{DummyNodeData, NodeLabel, TechNodeData};
pub use rank::TechBand;
pub use result::{LayoutResult, PlacedEdge, PlacedNode};

/// Iteration cap for the sanitizer's fixed point. Hitting it is logged and
/// treated as "good enough", never as an error.
pub const SANITIZE_MAX_PASSES: usize = 10;

/// Iteration cap shared by the layer-assignment fixed point and every
/// optimizer phase (barycentric, greedy swap, edge-length local/global).
pub const MAX_SWEEPS: usize = 50;

/// Consecutive non-improving sweeps tolerated before an optimizer phase
/// stops early.
pub const CONVERGENCE_STRIKES: usize = 2;

/// Length multiplier for edges whose target is a dummy node, biasing the
/// optimizer toward routing multi-layer edges straight instead of wiggling
/// real rows.
pub const DUMMY_EDGE_WEIGHT: i64 = 10;
