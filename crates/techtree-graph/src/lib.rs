//! Graph container APIs used by `techtree-layout`.
//!
//! The layout passes address nodes and edges exclusively through the arena
//! indices handed out here, so the container keeps indices stable for the
//! lifetime of a build: nodes are never removed, and removed edges leave a
//! tombstone behind instead of shifting later entries.

mod tree;

pub use tree::{EdgeEntry, EdgeIx, NodeIx, Tree};
