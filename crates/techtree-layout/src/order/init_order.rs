//! Seed ordering.
//!
//! Within each layer, rows 1..N by ascending descendant count: nodes with
//! large subtrees end up near the bottom where the barycentric sweeps have
//! the most room to pull their descendants together.

use crate::node::NodeLabel;
use techtree_graph::Tree;

pub fn init_order(tree: &mut Tree<NodeLabel>) {
    for mut nodes in tree.layer_matrix() {
        nodes.sort_by_key(|&ix| (tree.descendant_count(ix), ix));
        for (i, ix) in nodes.into_iter().enumerate() {
            tree.set_row(ix, i as i32 + 1);
        }
    }
}
