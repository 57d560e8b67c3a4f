//! Crossing counting.
//!
//! Two edges incident on the same adjacent layer pair cross when, sorted by
//! source row, their target rows are inverted. Counted per boundary with an
//! accumulator tree, O(E log V) per boundary.

use crate::node::NodeLabel;
use rustc_hash::FxHashMap;
use techtree_graph::{NodeIx, Tree};

/// Total crossings over all adjacent layer boundaries.
pub fn cross_count(tree: &Tree<NodeLabel>) -> u64 {
    (1..tree.max_layer())
        .map(|layer| boundary_cross_count(tree, layer))
        .sum()
}

/// Crossings between the boundary's two layers around `layer`: the sum for
/// `(layer - 1, layer)` and `(layer, layer + 1)`. Any move or swap inside
/// `layer` can only disturb these two counts.
pub fn adjacent_crossings(tree: &Tree<NodeLabel>, layer: i32) -> u64 {
    boundary_cross_count(tree, layer - 1) + boundary_cross_count(tree, layer)
}

/// Crossings between edges from `layer` to `layer + 1`. Edges spanning more
/// than one layer are ignored, so this is only meaningful post-normalization.
pub fn boundary_cross_count(tree: &Tree<NodeLabel>, layer: i32) -> u64 {
    if layer < 1 {
        return 0;
    }
    let north = tree.nodes_at_layer(layer);
    let south = tree.nodes_at_layer(layer + 1);
    if north.is_empty() || south.is_empty() {
        return 0;
    }

    let south_pos: FxHashMap<NodeIx, usize> = south
        .iter()
        .enumerate()
        .map(|(i, &ix)| (ix, i))
        .collect();

    // Southern endpoint positions in northern row order; ties on the same
    // northern node sorted ascending so shared sources never count.
    let mut seq: Vec<usize> = Vec::new();
    for &v in &north {
        let mut entries: Vec<usize> = tree
            .out_edges(v)
            .iter()
            .filter_map(|&e| tree.edge(e))
            .filter_map(|entry| south_pos.get(&entry.target).copied())
            .collect();
        entries.sort_unstable();
        seq.extend(entries);
    }

    let mut first_index: usize = 1;
    while first_index < south.len() {
        first_index <<= 1;
    }
    let acc_size = 2 * first_index - 1;
    first_index -= 1;
    let mut acc: Vec<u64> = vec![0; acc_size];

    let mut cc: u64 = 0;
    for pos in seq {
        let mut index = pos + first_index;
        acc[index] += 1;
        let mut seen_greater: u64 = 0;
        while index > 0 {
            if index % 2 == 1 {
                seen_greater += acc[index + 1];
            }
            index = (index - 1) >> 1;
            acc[index] += 1;
        }
        cc += seen_greater;
    }
    cc
}
