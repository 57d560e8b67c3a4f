//! Layer (X) assignment.
//!
//! Longest-path-from-source layering, processed tech level by tech level in
//! ascending order: a level's nodes never land on a lower layer than the
//! deepest layer reached by earlier levels. Whole passes repeat until no
//! layer changes, bounded by [`MAX_SWEEPS`] to tolerate cyclic input that
//! survived sanitation.

use crate::node::NodeLabel;
use crate::{MAX_SWEEPS, TechLevel};
use serde::Serialize;
use std::collections::BTreeMap;
use techtree_graph::{NodeIx, Tree};
use tracing::warn;

/// Layer range occupied by one tech level, for drawn group separators.
/// `lower` is exclusive (min layer - 1), `upper` inclusive (max layer).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TechBand {
    pub tech_level: TechLevel,
    pub lower: i32,
    pub upper: i32,
}

pub fn assign_layers(tree: &mut Tree<NodeLabel>) -> Vec<TechBand> {
    let mut by_level: BTreeMap<TechLevel, Vec<NodeIx>> = BTreeMap::new();
    for ix in tree.node_ixs() {
        if let Some(tech) = tree.node(ix).tech() {
            by_level.entry(tech.tech_level).or_default().push(ix);
        }
    }
    if by_level.is_empty() {
        return Vec::new();
    }

    let mut settled = false;
    for pass in 0..MAX_SWEEPS {
        let mut changed = false;

        // Starting depth of the current level: the deepest layer reached by
        // earlier levels, or 1 for the first populated level.
        let mut cursor: i32 = 1;
        for nodes in by_level.values() {
            let mut level_max = cursor;
            for &ix in nodes {
                let pred_max = tree
                    .predecessors(ix)
                    .into_iter()
                    .map(|p| tree.layer(p))
                    .max();
                let want = match pred_max {
                    Some(p) => cursor.max(p + 1),
                    None => cursor,
                };
                if tree.layer(ix) != want {
                    tree.set_layer(ix, want);
                    changed = true;
                }
                level_max = level_max.max(want);
            }
            cursor = level_max;
        }

        if !changed {
            settled = true;
            tracing::debug!(passes = pass + 1, "layer assignment settled");
            break;
        }
    }

    if !settled {
        warn!(
            cap = MAX_SWEEPS,
            "layer assignment hit its pass cap; keeping best-effort layers"
        );
    }

    by_level
        .into_iter()
        .map(|(tech_level, nodes)| {
            let min = nodes.iter().map(|&ix| tree.layer(ix)).min().unwrap_or(1);
            let max = nodes.iter().map(|&ix| tree.layer(ix)).max().unwrap_or(1);
            TechBand {
                tech_level,
                lower: min - 1,
                upper: max,
            }
        })
        .collect()
}
