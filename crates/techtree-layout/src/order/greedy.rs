//! Greedy pairwise swap sweeps.
//!
//! After the barycentric phase plateaus, try swapping every pair of rows
//! within each layer, keeping a swap only if it strictly reduces the
//! crossing count on the boundaries touching that layer. Layer traversal
//! direction alternates per iteration.

use crate::node::NodeLabel;
use crate::order::{adjacent_crossings, cross_count};
use crate::{CONVERGENCE_STRIKES, MAX_SWEEPS};
use techtree_graph::Tree;

pub fn sweep_swaps(tree: &mut Tree<NodeLabel>) {
    let mut best = cross_count(tree);
    let mut strikes = 0;
    let mut iter = 0;

    while iter < MAX_SWEEPS && strikes < CONVERGENCE_STRIKES {
        let max = tree.max_layer();
        let layers: Vec<i32> = if iter % 2 == 0 {
            (1..=max).collect()
        } else {
            (1..=max).rev().collect()
        };
        for layer in layers {
            swap_pass(tree, layer);
        }

        let cc = cross_count(tree);
        if cc < best {
            best = cc;
            strikes = 0;
        } else {
            strikes += 1;
        }
        iter += 1;
    }

    tracing::debug!(iterations = iter, crossings = best, "greedy swap phase done");
}

fn swap_pass(tree: &mut Tree<NodeLabel>, layer: i32) {
    let nodes = tree.nodes_at_layer(layer);
    for i in 0..nodes.len() {
        for j in (i + 1)..nodes.len() {
            let a = nodes[i];
            let b = nodes[j];
            let row_a = tree.row(a);
            let row_b = tree.row(b);

            let before = adjacent_crossings(tree, layer);
            tree.set_row(a, row_b);
            tree.set_row(b, row_a);

            if adjacent_crossings(tree, layer) >= before {
                tree.set_row(a, row_a);
                tree.set_row(b, row_b);
            }
        }
    }
}
