//! Edge-length minimization.
//!
//! Runs after crossing minimization and never trades crossings away for
//! length: every trial move is rejected if the crossing count on the
//! boundaries around the moved node grows. Two phases:
//!
//! - a local sweep that walks each node toward its neighbors one edge at a
//!   time (in-edges on even iterations, out-edges on odd), accepting steps
//!   that strictly shorten that edge;
//! - a global sweep, forward layer order only, accepting steps that
//!   strictly shorten the whole layer's incident edge length. It exists
//!   because per-edge moves get stuck in configurations a whole-layer view
//!   can escape.
//!
//! Edges ending in a dummy node weigh [`DUMMY_EDGE_WEIGHT`] times more, so
//! multi-layer chains are pulled straight in preference to jiggling real
//! rows.

use crate::node::NodeLabel;
use crate::order::adjacent_crossings;
use crate::{CONVERGENCE_STRIKES, DUMMY_EDGE_WEIGHT, MAX_SWEEPS};
use techtree_graph::{EdgeIx, NodeIx, Tree};

pub fn is_dummy_edge(tree: &Tree<NodeLabel>, e: EdgeIx) -> bool {
    tree.edge(e)
        .is_some_and(|entry| tree.node(entry.target).is_dummy())
}

/// Weighted visual length of an edge: row distance, times the dummy bias
/// when the target is a dummy node.
pub fn edge_length(tree: &Tree<NodeLabel>, e: EdgeIx) -> i64 {
    let Some(entry) = tree.edge(e) else {
        return 0;
    };
    let dy = (tree.row(entry.source) - tree.row(entry.target)).abs() as i64;
    let weight = if tree.node(entry.target).is_dummy() {
        DUMMY_EDGE_WEIGHT
    } else {
        1
    };
    dy * weight
}

pub fn total_edge_length(tree: &Tree<NodeLabel>) -> i64 {
    tree.edge_ixs().map(|e| edge_length(tree, e)).sum()
}

/// Weighted length of every edge incident to `layer`, each counted once.
fn layer_edge_length(tree: &Tree<NodeLabel>, layer: i32) -> i64 {
    tree.edge_ixs()
        .filter(|&e| {
            tree.edge(e).is_some_and(|entry| {
                tree.layer(entry.source) == layer || tree.layer(entry.target) == layer
            })
        })
        .map(|e| edge_length(tree, e))
        .sum()
}

pub fn straighten(tree: &mut Tree<NodeLabel>) {
    local_sweeps(tree);
    global_sweeps(tree);
}

fn local_sweeps(tree: &mut Tree<NodeLabel>) {
    let mut best = total_edge_length(tree);
    let mut strikes = 0;
    let mut iter = 0;

    while iter < MAX_SWEEPS && strikes < CONVERGENCE_STRIKES {
        let nodes: Vec<NodeIx> = tree.node_ixs().collect();
        for ix in nodes {
            let edges: Vec<EdgeIx> = if iter % 2 == 0 {
                tree.in_edges(ix).to_vec()
            } else {
                tree.out_edges(ix).to_vec()
            };
            for e in edges {
                nudge_toward(tree, ix, e, |t| edge_length(t, e));
            }
        }

        let len = total_edge_length(tree);
        if len < best {
            best = len;
            strikes = 0;
        } else {
            strikes += 1;
        }
        iter += 1;
    }

    tracing::debug!(iterations = iter, length = best, "local length phase done");
}

fn global_sweeps(tree: &mut Tree<NodeLabel>) {
    let mut best = total_edge_length(tree);
    let mut strikes = 0;
    let mut iter = 0;

    while iter < MAX_SWEEPS && strikes < CONVERGENCE_STRIKES {
        // Forward direction only; the local phase already alternates.
        for layer in 1..=tree.max_layer() {
            for ix in tree.nodes_at_layer(layer) {
                let mut edges: Vec<EdgeIx> = tree.in_edges(ix).to_vec();
                edges.extend_from_slice(tree.out_edges(ix));
                for e in edges {
                    nudge_toward(tree, ix, e, |t| layer_edge_length(t, layer));
                }
            }
        }

        let len = total_edge_length(tree);
        if len < best {
            best = len;
            strikes = 0;
        } else {
            strikes += 1;
        }
        iter += 1;
    }

    tracing::debug!(iterations = iter, length = best, "global length phase done");
}

/// Marches `ix` one row at a time toward the far endpoint of `e`, swapping
/// rows with whatever occupies the intermediate row. A step is kept only if
/// the crossings on the boundaries around the node's layer do not grow and
/// `metric` strictly improves; the first rejected step reverts and stops
/// the march.
fn nudge_toward<F>(tree: &mut Tree<NodeLabel>, ix: NodeIx, e: EdgeIx, metric: F)
where
    F: Fn(&Tree<NodeLabel>) -> i64,
{
    let Some(entry) = tree.edge(e) else {
        return;
    };
    let neighbor = if entry.source == ix {
        entry.target
    } else {
        entry.source
    };
    let layer = tree.layer(ix);

    loop {
        let from = tree.row(ix);
        let target_row = tree.row(neighbor);
        if from == target_row {
            return;
        }
        let to = if target_row > from { from + 1 } else { from - 1 };

        let before_cc = adjacent_crossings(tree, layer);
        let before_metric = metric(tree);

        let occupant = occupant_at(tree, layer, to, ix);
        tree.set_row(ix, to);
        if let Some(o) = occupant {
            tree.set_row(o, from);
        }

        let keep =
            adjacent_crossings(tree, layer) <= before_cc && metric(tree) < before_metric;
        if !keep {
            tree.set_row(ix, from);
            if let Some(o) = occupant {
                tree.set_row(o, to);
            }
            return;
        }
    }
}

fn occupant_at(tree: &Tree<NodeLabel>, layer: i32, row: i32, exclude: NodeIx) -> Option<NodeIx> {
    tree.nodes_at_layer(layer)
        .into_iter()
        .find(|&n| n != exclude && tree.row(n) == row)
}
