//! The immutable snapshot a build hands to the renderer.
//!
//! Once a `LayoutResult` exists the working tree is gone; consumers read
//! positions, edges, and band bounds from here until the next reset. Lookup
//! misses (items that never got a layout node, e.g. excluded categories)
//! return `None` and are logged once per id.

use crate::input::{NodeStatus, TechLevel, TechState};
use crate::node::NodeLabel;
use crate::rank::TechBand;
use crate::sanitize::SanitizeReport;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::Serialize;
use std::sync::Mutex;
use techtree_graph::{NodeIx, Tree};
use tracing::warn;

/// A placed node. Index into [`LayoutResult::nodes`] equals the arena index
/// the node had during the build.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedNode {
    /// `None` for dummy nodes.
    pub id: Option<String>,
    pub tech_level: Option<TechLevel>,
    pub layer: u32,
    pub row: u32,
    /// For dummies, the real edge pair the chain substitutes for.
    pub substitutes: Option<PlacedEdge>,
}

/// A single-span edge between two entries of [`LayoutResult::nodes`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlacedEdge {
    pub source: usize,
    pub target: usize,
}

#[derive(Debug, Serialize)]
pub struct LayoutResult {
    pub nodes: Vec<PlacedNode>,
    pub edges: Vec<PlacedEdge>,
    pub max_layer: u32,
    pub max_row: u32,
    pub bands: Vec<TechBand>,
    pub sanitation: SanitizeReport,
    positions: FxHashMap<String, (u32, u32)>,
    #[serde(skip)]
    warned_missing: Mutex<FxHashSet<String>>,
}

impl LayoutResult {
    pub(crate) fn from_tree(
        tree: &Tree<NodeLabel>,
        index: &FxHashMap<String, NodeIx>,
        bands: Vec<TechBand>,
        sanitation: SanitizeReport,
    ) -> Self {
        let nodes: Vec<PlacedNode> = tree
            .node_ixs()
            .map(|ix| {
                let label = tree.node(ix);
                PlacedNode {
                    id: label.tech().map(|t| t.id.clone()),
                    tech_level: label.tech().map(|t| t.tech_level),
                    layer: tree.layer(ix).max(0) as u32,
                    row: tree.row(ix) as u32,
                    substitutes: label.dummy().map(|d| PlacedEdge {
                        source: d.tail.0,
                        target: d.head.0,
                    }),
                }
            })
            .collect();

        let edges: Vec<PlacedEdge> = tree
            .edge_ixs()
            .filter_map(|e| tree.edge(e))
            .map(|entry| PlacedEdge {
                source: entry.source.0,
                target: entry.target.0,
            })
            .collect();

        let positions: FxHashMap<String, (u32, u32)> = index
            .iter()
            .map(|(id, &ix)| (id.clone(), (nodes[ix.0].layer, nodes[ix.0].row)))
            .collect();

        Self {
            nodes,
            edges,
            max_layer: tree.max_layer().max(0) as u32,
            max_row: tree.max_row().max(0) as u32,
            bands,
            sanitation,
            positions,
            warned_missing: Mutex::new(FxHashSet::default()),
        }
    }

    /// `(layer, row)` for an item id. A miss is logged once per id.
    pub fn position_of(&self, id: &str) -> Option<(u32, u32)> {
        match self.positions.get(id) {
            Some(&pos) => Some(pos),
            None => {
                let mut warned = self
                    .warned_missing
                    .lock()
                    .unwrap_or_else(|e| e.into_inner());
                if warned.insert(id.to_string()) {
                    warn!(item = %id, "no layout node for item");
                }
                None
            }
        }
    }

    /// Display label of a node: its own id, or for a dummy the id of the
    /// real node its chain leads to.
    pub fn label(&self, node: usize) -> Option<&str> {
        self.display_node(node).and_then(|n| n.id.as_deref())
    }

    /// Display status of a node. Dummies report their terminal real node's
    /// status; a dead-ended chain defaults to `Locked`.
    pub fn status(&self, node: usize, state: &dyn TechState) -> NodeStatus {
        let Some(id) = self.display_node(node).and_then(|n| n.id.as_deref()) else {
            return NodeStatus::Locked;
        };
        if state.completed(id) {
            NodeStatus::Completed
        } else if state.available(id) {
            NodeStatus::Available
        } else {
            NodeStatus::Locked
        }
    }

    fn display_node(&self, node: usize) -> Option<&PlacedNode> {
        let n = self.nodes.get(node)?;
        match n.substitutes {
            Some(sub) => self.nodes.get(sub.target),
            None => Some(n),
        }
    }
}
