//! Crossing minimization.
//!
//! Three steps, in order: a seed ordering (rows by ascending descendant
//! count), alternating barycentric sweeps, then greedy pairwise swap
//! sweeps. Both sweep phases are bounded and stop after two consecutive
//! non-improving passes; neither ever leaves the tree with more crossings
//! than it started with.

mod barycenter;
mod cross_count;
mod greedy;
mod init_order;

pub use barycenter::sweep_barycenters;
pub use cross_count::{adjacent_crossings, boundary_cross_count, cross_count};
pub use greedy::sweep_swaps;
pub use init_order::init_order;

use crate::node::NodeLabel;
use techtree_graph::Tree;

pub fn order(tree: &mut Tree<NodeLabel>) {
    init_order(tree);
    sweep_barycenters(tree);
    sweep_swaps(tree);
}
