//! The arena `Tree` container.
//!
//! Positions live next to the labels: every node carries an integer `layer`
//! (X) and a fractional `yf` (Y before rounding). The layout passes mutate
//! positions in place; extents and reachability sets are recomputed on demand
//! rather than cached behind setter side effects.

use rustc_hash::FxBuildHasher;

type HashSet<T> = hashbrown::HashSet<T, FxBuildHasher>;

/// Arena index of a node. Stable for the lifetime of the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeIx(pub usize);

/// Arena index of an edge. Stable for the lifetime of the tree; the slot is
/// tombstoned on removal, never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeIx(pub usize);

#[derive(Debug, Clone)]
struct NodeEntry<N> {
    label: N,
    layer: i32,
    yf: f64,
    in_edges: Vec<EdgeIx>,
    out_edges: Vec<EdgeIx>,
}

/// A directed edge between two arena nodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EdgeEntry {
    pub source: NodeIx,
    pub target: NodeIx,
}

#[derive(Debug, Clone, Default)]
pub struct Tree<N> {
    nodes: Vec<NodeEntry<N>>,
    edges: Vec<Option<EdgeEntry>>,
    live_edges: usize,
}

impl<N> Tree<N> {
    pub fn new() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
            live_edges: 0,
        }
    }

    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(nodes),
            edges: Vec::with_capacity(edges),
            live_edges: 0,
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.live_edges
    }

    pub fn add_node(&mut self, label: N) -> NodeIx {
        let ix = NodeIx(self.nodes.len());
        self.nodes.push(NodeEntry {
            label,
            layer: 0,
            yf: 0.0,
            in_edges: Vec::new(),
            out_edges: Vec::new(),
        });
        ix
    }

    pub fn node(&self, ix: NodeIx) -> &N {
        &self.nodes[ix.0].label
    }

    pub fn node_mut(&mut self, ix: NodeIx) -> &mut N {
        &mut self.nodes[ix.0].label
    }

    /// Adds a directed edge. Adjacency lists keep insertion order, which is
    /// what makes repeated builds deterministic.
    pub fn add_edge(&mut self, source: NodeIx, target: NodeIx) -> EdgeIx {
        let ix = EdgeIx(self.edges.len());
        self.edges.push(Some(EdgeEntry { source, target }));
        self.live_edges += 1;
        self.nodes[source.0].out_edges.push(ix);
        self.nodes[target.0].in_edges.push(ix);
        ix
    }

    /// Tombstones the edge and unlinks it from both endpoints' adjacency.
    /// Removing an already-removed edge is a no-op.
    pub fn remove_edge(&mut self, ix: EdgeIx) {
        let Some(entry) = self.edges[ix.0].take() else {
            return;
        };
        self.live_edges -= 1;
        self.nodes[entry.source.0].out_edges.retain(|&e| e != ix);
        self.nodes[entry.target.0].in_edges.retain(|&e| e != ix);
    }

    pub fn edge(&self, ix: EdgeIx) -> Option<EdgeEntry> {
        self.edges.get(ix.0).copied().flatten()
    }

    pub fn node_ixs(&self) -> impl Iterator<Item = NodeIx> + use<N> {
        (0..self.nodes.len()).map(NodeIx)
    }

    /// Live edges in insertion order.
    pub fn edge_ixs(&self) -> impl Iterator<Item = EdgeIx> + '_ {
        self.edges
            .iter()
            .enumerate()
            .filter(|(_, e)| e.is_some())
            .map(|(i, _)| EdgeIx(i))
    }

    pub fn in_edges(&self, ix: NodeIx) -> &[EdgeIx] {
        &self.nodes[ix.0].in_edges
    }

    pub fn out_edges(&self, ix: NodeIx) -> &[EdgeIx] {
        &self.nodes[ix.0].out_edges
    }

    pub fn predecessors(&self, ix: NodeIx) -> Vec<NodeIx> {
        self.nodes[ix.0]
            .in_edges
            .iter()
            .filter_map(|&e| self.edge(e))
            .map(|e| e.source)
            .collect()
    }

    pub fn successors(&self, ix: NodeIx) -> Vec<NodeIx> {
        self.nodes[ix.0]
            .out_edges
            .iter()
            .filter_map(|&e| self.edge(e))
            .map(|e| e.target)
            .collect()
    }

    pub fn layer(&self, ix: NodeIx) -> i32 {
        self.nodes[ix.0].layer
    }

    pub fn set_layer(&mut self, ix: NodeIx, layer: i32) {
        self.nodes[ix.0].layer = layer;
    }

    pub fn yf(&self, ix: NodeIx) -> f64 {
        self.nodes[ix.0].yf
    }

    pub fn set_yf(&mut self, ix: NodeIx, yf: f64) {
        self.nodes[ix.0].yf = yf;
    }

    /// The node's integer row: `yf` rounded, clamped to >= 0.
    pub fn row(&self, ix: NodeIx) -> i32 {
        let r = self.nodes[ix.0].yf.round();
        if r < 0.0 { 0 } else { r as i32 }
    }

    pub fn set_row(&mut self, ix: NodeIx, row: i32) {
        self.nodes[ix.0].yf = row as f64;
    }

    /// Layer distance covered by the edge.
    pub fn span(&self, ix: EdgeIx) -> Option<i32> {
        let e = self.edge(ix)?;
        Some(self.layer(e.target) - self.layer(e.source))
    }

    pub fn max_layer(&self) -> i32 {
        self.nodes.iter().map(|n| n.layer).max().unwrap_or(0)
    }

    pub fn max_row(&self) -> i32 {
        self.node_ixs().map(|ix| self.row(ix)).max().unwrap_or(0)
    }

    /// Nodes at `layer`, sorted by `(row, index)` so callers get a fully
    /// specified order even when rows collide.
    pub fn nodes_at_layer(&self, layer: i32) -> Vec<NodeIx> {
        let mut out: Vec<NodeIx> = self
            .node_ixs()
            .filter(|&ix| self.layer(ix) == layer)
            .collect();
        out.sort_by_key(|&ix| (self.row(ix), ix));
        out
    }

    /// All layers as row-sorted node lists, indexed by layer (index 0 is
    /// usually empty since layout assigns layers starting at 1).
    pub fn layer_matrix(&self) -> Vec<Vec<NodeIx>> {
        let mut out: Vec<Vec<NodeIx>> = vec![Vec::new(); self.max_layer().max(0) as usize + 1];
        for ix in self.node_ixs() {
            let layer = self.layer(ix).max(0) as usize;
            out[layer].push(ix);
        }
        for layer in &mut out {
            layer.sort_by_key(|&ix| (self.row(ix), ix));
        }
        out
    }

    /// Transitive predecessors, excluding the node itself. Computed on
    /// demand; a visited set guards against cycles in not-yet-sanitized
    /// input.
    pub fn ancestors(&self, ix: NodeIx) -> HashSet<NodeIx> {
        let mut seen: HashSet<NodeIx> = HashSet::default();
        let mut stack: Vec<NodeIx> = self.predecessors(ix);
        while let Some(v) = stack.pop() {
            if v != ix && seen.insert(v) {
                stack.extend(self.predecessors(v));
            }
        }
        seen
    }

    /// Transitive successors, excluding the node itself.
    pub fn descendants(&self, ix: NodeIx) -> HashSet<NodeIx> {
        let mut seen: HashSet<NodeIx> = HashSet::default();
        let mut stack: Vec<NodeIx> = self.successors(ix);
        while let Some(v) = stack.pop() {
            if v != ix && seen.insert(v) {
                stack.extend(self.successors(v));
            }
        }
        seen
    }

    pub fn descendant_count(&self, ix: NodeIx) -> usize {
        self.descendants(ix).len()
    }
}
