//! Node labels for the working tree.
//!
//! A node is either a real tech item or a dummy minted by edge
//! normalization. Dummy behavior is expressed through the variant, not
//! through downcasting: anything that needs the "real" node behind a dummy
//! follows [`DummyNodeData::head`].

use crate::input::TechLevel;
use techtree_graph::NodeIx;

#[derive(Debug, Clone, PartialEq)]
pub enum NodeLabel {
    Tech(TechNodeData),
    Dummy(DummyNodeData),
}

#[derive(Debug, Clone, PartialEq)]
pub struct TechNodeData {
    pub id: String,
    pub tech_level: TechLevel,
    pub sort_key: String,
}

/// One segment of a multi-layer edge. `tail` and `head` are the real
/// endpoints of the edge the dummy chain substitutes for; `head` is also the
/// terminal node dummy display state forwards to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DummyNodeData {
    pub tail: NodeIx,
    pub head: NodeIx,
}

impl NodeLabel {
    pub fn is_dummy(&self) -> bool {
        matches!(self, NodeLabel::Dummy(_))
    }

    pub fn tech(&self) -> Option<&TechNodeData> {
        match self {
            NodeLabel::Tech(t) => Some(t),
            NodeLabel::Dummy(_) => None,
        }
    }

    pub fn dummy(&self) -> Option<&DummyNodeData> {
        match self {
            NodeLabel::Tech(_) => None,
            NodeLabel::Dummy(d) => Some(d),
        }
    }
}
