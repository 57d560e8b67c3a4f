//! Construction of the working tree from sanitized items.
//!
//! Nodes are created in `(tech_level, sort_key, id)` order so repeated
//! builds from the same input produce identical arena indices regardless of
//! the caller's collection order. A prerequisite naming an id that is not in
//! the item set (an excluded-category item, say) is logged and skipped; it
//! is a lookup miss, not an error.

use crate::node::{NodeLabel, TechNodeData};
use crate::TechItem;
use rustc_hash::FxHashMap;
use techtree_graph::{NodeIx, Tree};
use tracing::warn;

pub struct BuiltGraph {
    pub tree: Tree<NodeLabel>,
    pub index: FxHashMap<String, NodeIx>,
}

pub fn build_graph(items: &[TechItem]) -> BuiltGraph {
    let mut ordered: Vec<&TechItem> = items.iter().collect();
    ordered.sort_by(|a, b| {
        (a.tech_level, &a.sort_key, &a.id).cmp(&(b.tech_level, &b.sort_key, &b.id))
    });

    let mut tree: Tree<NodeLabel> = Tree::with_capacity(items.len(), items.len() * 2);
    let mut index: FxHashMap<String, NodeIx> = FxHashMap::default();

    for item in &ordered {
        let ix = tree.add_node(NodeLabel::Tech(TechNodeData {
            id: item.id.clone(),
            tech_level: item.tech_level,
            sort_key: item.sort_key.clone(),
        }));
        index.insert(item.id.clone(), ix);
    }

    for item in &ordered {
        let target = index[&item.id];
        for prerequisite in &item.prerequisites {
            match index.get(prerequisite) {
                Some(&source) => {
                    tree.add_edge(source, target);
                }
                None => {
                    warn!(
                        item = %item.id,
                        prerequisite = %prerequisite,
                        "prerequisite has no layout node; skipping edge"
                    );
                }
            }
        }
    }

    BuiltGraph { tree, index }
}
