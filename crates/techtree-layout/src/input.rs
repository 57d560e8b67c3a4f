//! Caller-facing input model.
//!
//! Items are opaque to the engine beyond the fields here. The engine works on
//! its own copy and touches only the two sanctioned repair targets: a
//! redundant entry in `prerequisites`, or a `tech_level` that is lower than a
//! prerequisite's.

use serde::{Deserialize, Serialize};

/// Externally defined ordinal grouping of items. Ordering is the only
/// semantics the engine relies on.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct TechLevel(pub u8);

impl std::fmt::Display for TechLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "tech level {}", self.0)
    }
}

/// One research-like item: identity, direct prerequisites, tech level, and a
/// stable sort key used to seed deterministic node creation order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechItem {
    pub id: String,
    pub prerequisites: Vec<String>,
    pub tech_level: TechLevel,
    pub sort_key: String,
}

impl TechItem {
    pub fn new(id: impl Into<String>, tech_level: TechLevel) -> Self {
        let id = id.into();
        Self {
            sort_key: id.clone(),
            id,
            prerequisites: Vec::new(),
            tech_level,
        }
    }

    pub fn with_prerequisites<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisites = prerequisites.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_sort_key(mut self, sort_key: impl Into<String>) -> Self {
        self.sort_key = sort_key.into();
        self
    }
}

/// External collaborator answering completion queries. The engine never
/// stores this state; it is consulted when a caller asks for a node's
/// display status.
pub trait TechState {
    fn completed(&self, id: &str) -> bool;
    fn available(&self, id: &str) -> bool;
}

/// Display status of a placed node. Renderers map this to colors; a dummy
/// node reports the status of the real node its chain leads to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum NodeStatus {
    Completed,
    Available,
    Locked,
}
