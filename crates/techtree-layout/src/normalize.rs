//! Edge normalization.
//!
//! Replaces every edge spanning more than one layer with a chain of
//! single-span edges through freshly minted dummy nodes, one per
//! intermediate layer. Dummies start at the linearly interpolated row
//! between the endpoints so the optimizers begin from a roughly straight
//! route. Must run after layer assignment and before any row work.

use crate::node::{DummyNodeData, NodeLabel};
use techtree_graph::{EdgeIx, Tree};

pub fn normalize(tree: &mut Tree<NodeLabel>) {
    let long: Vec<EdgeIx> = tree
        .edge_ixs()
        .filter(|&e| tree.span(e).unwrap_or(0) > 1)
        .collect();

    for e in long {
        let Some(entry) = tree.edge(e) else {
            continue;
        };
        let span = tree.layer(entry.target) - tree.layer(entry.source);
        let source_layer = tree.layer(entry.source);
        let y0 = tree.yf(entry.source);
        let slope = (tree.yf(entry.target) - y0) / span as f64;

        tree.remove_edge(e);

        let mut prev = entry.source;
        for step in 1..span {
            let dummy = tree.add_node(NodeLabel::Dummy(DummyNodeData {
                tail: entry.source,
                head: entry.target,
            }));
            tree.set_layer(dummy, source_layer + step);
            tree.set_yf(dummy, y0 + slope * step as f64);
            tree.add_edge(prev, dummy);
            prev = dummy;
        }
        tree.add_edge(prev, entry.target);
    }
}
