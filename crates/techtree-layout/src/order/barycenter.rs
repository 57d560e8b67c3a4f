//! Barycentric sweeps.
//!
//! Alternating left-to-right and right-to-left passes recenter every node on
//! the rounded average row of its neighbors on the side being swept from.
//! Nodes with equal barycenters share the value; the group is spread
//! symmetrically around it. A pass is accepted only if it reduces the total
//! crossing count, otherwise the rows roll back and a strike is recorded.

use crate::node::NodeLabel;
use crate::order::cross_count;
use crate::{CONVERGENCE_STRIKES, MAX_SWEEPS};
use techtree_graph::{NodeIx, Tree};

#[derive(Clone, Copy)]
enum Side {
    In,
    Out,
}

pub fn sweep_barycenters(tree: &mut Tree<NodeLabel>) {
    let mut best = cross_count(tree);
    let mut best_rows = snapshot_rows(tree);
    let mut strikes = 0;
    let mut iter = 0;

    while iter < MAX_SWEEPS && strikes < CONVERGENCE_STRIKES {
        if iter % 2 == 0 {
            for layer in 2..=tree.max_layer() {
                center_layer(tree, layer, Side::In);
            }
        } else {
            for layer in (1..tree.max_layer()).rev() {
                center_layer(tree, layer, Side::Out);
            }
        }

        let cc = cross_count(tree);
        if cc < best {
            best = cc;
            best_rows = snapshot_rows(tree);
            strikes = 0;
        } else {
            restore_rows(tree, &best_rows);
            strikes += 1;
        }
        iter += 1;
    }

    tracing::debug!(iterations = iter, crossings = best, "barycentric phase done");
}

fn center_layer(tree: &mut Tree<NodeLabel>, layer: i32, side: Side) {
    let nodes = tree.nodes_at_layer(layer);

    // (barycenter, previous row, node); the previous row keeps groups in
    // their existing relative order.
    let mut entries: Vec<(i32, i32, NodeIx)> = Vec::with_capacity(nodes.len());
    for ix in nodes {
        let neighbors = match side {
            Side::In => tree.predecessors(ix),
            Side::Out => tree.successors(ix),
        };
        let row = tree.row(ix);
        let bc = if neighbors.is_empty() {
            row
        } else {
            let sum: i64 = neighbors.iter().map(|&n| tree.row(n) as i64).sum();
            (sum as f64 / neighbors.len() as f64).round() as i32
        };
        entries.push((bc, row, ix));
    }

    entries.sort_unstable();

    let mut i = 0;
    while i < entries.len() {
        let bc = entries[i].0;
        let mut j = i;
        while j < entries.len() && entries[j].0 == bc {
            j += 1;
        }
        let count = (j - i) as i32;
        let start = bc - (count - 1) / 2;
        for (k, &(_, _, ix)) in entries[i..j].iter().enumerate() {
            tree.set_row(ix, start + k as i32);
        }
        i = j;
    }
}

pub(crate) fn snapshot_rows(tree: &Tree<NodeLabel>) -> Vec<f64> {
    tree.node_ixs().map(|ix| tree.yf(ix)).collect()
}

pub(crate) fn restore_rows(tree: &mut Tree<NodeLabel>, rows: &[f64]) {
    for (i, ix) in tree.node_ixs().enumerate() {
        tree.set_yf(ix, rows[i]);
    }
}
