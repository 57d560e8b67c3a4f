//! Row compaction.
//!
//! `collapse_rows` is the coarse initial packing that runs before the
//! optimizers: rows 1..N per layer in whatever order the nodes currently
//! have. `remove_empty_rows` is the final pass that closes fully empty rows
//! left behind by the optimizers; it only shifts nodes down, never reorders
//! within a row.

use crate::node::NodeLabel;
use techtree_graph::Tree;

pub fn collapse_rows(tree: &mut Tree<NodeLabel>) {
    for layer in 1..=tree.max_layer() {
        let nodes = tree.nodes_at_layer(layer);
        for (i, ix) in nodes.into_iter().enumerate() {
            tree.set_row(ix, i as i32 + 1);
        }
    }
}

pub fn remove_empty_rows(tree: &mut Tree<NodeLabel>) {
    let mut row = 1;
    while row <= tree.max_row() {
        let occupied = tree.node_ixs().any(|ix| tree.row(ix) == row);
        if occupied {
            row += 1;
            continue;
        }
        let above: Vec<_> = tree.node_ixs().filter(|&ix| tree.row(ix) > row).collect();
        for ix in above {
            let r = tree.row(ix);
            tree.set_row(ix, r - 1);
        }
    }
}
