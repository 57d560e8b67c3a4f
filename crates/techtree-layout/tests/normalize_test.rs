use techtree_graph::{NodeIx, Tree};
use techtree_layout::build::{BuiltGraph, build_graph};
use techtree_layout::normalize::normalize;
use techtree_layout::rank::assign_layers;
use techtree_layout::{NodeLabel, TechItem, TechLevel, TechNodeData};

fn item(id: &str, level: u8, prerequisites: &[&str]) -> TechItem {
    TechItem::new(id, TechLevel(level)).with_prerequisites(prerequisites.iter().copied())
}

fn dummies(tree: &Tree<NodeLabel>) -> Vec<NodeIx> {
    tree.node_ixs()
        .filter(|&ix| tree.node(ix).is_dummy())
        .collect()
}

#[test]
fn span_two_edge_gets_one_dummy() {
    // A sits at layer 1, D at layer 3, with a direct A -> D edge.
    let items = vec![
        item("A", 0, &[]),
        item("B", 0, &["A"]),
        item("C", 1, &["A"]),
        item("D", 1, &["B", "C", "A"]),
    ];
    let BuiltGraph { mut tree, index } = build_graph(&items);
    assign_layers(&mut tree);
    normalize(&mut tree);

    let minted = dummies(&tree);
    assert_eq!(tree.node_count(), 5);
    assert_eq!(minted.len(), 1);

    let dummy = minted[0];
    assert_eq!(tree.layer(dummy), 2);
    assert_eq!(tree.in_edges(dummy).len(), 1);
    assert_eq!(tree.out_edges(dummy).len(), 1);
    assert_eq!(tree.predecessors(dummy), vec![index["A"]]);
    assert_eq!(tree.successors(dummy), vec![index["D"]]);
    assert!(!tree.successors(index["A"]).contains(&index["D"]));
}

#[test]
fn every_edge_is_single_span_after_normalization() {
    let items = vec![
        item("X", 0, &[]),
        item("Y", 0, &["X"]),
        item("Z", 0, &["Y"]),
        item("W", 0, &[]),
        item("Q", 0, &["Z", "W"]),
    ];
    let BuiltGraph { mut tree, index: _ } = build_graph(&items);
    assign_layers(&mut tree);
    normalize(&mut tree);

    for e in tree.edge_ixs().collect::<Vec<_>>() {
        assert_eq!(tree.span(e), Some(1));
    }
}

#[test]
fn long_span_chains_one_dummy_per_intermediate_layer() {
    // W -> Q spans layers 1 to 4, so two dummies at layers 2 and 3.
    let items = vec![
        item("X", 0, &[]),
        item("Y", 0, &["X"]),
        item("Z", 0, &["Y"]),
        item("W", 0, &[]),
        item("Q", 0, &["Z", "W"]),
    ];
    let BuiltGraph { mut tree, index } = build_graph(&items);
    assign_layers(&mut tree);
    normalize(&mut tree);

    let minted = dummies(&tree);
    assert_eq!(minted.len(), 2);
    let mut layers: Vec<i32> = minted.iter().map(|&ix| tree.layer(ix)).collect();
    layers.sort_unstable();
    assert_eq!(layers, vec![2, 3]);

    // Walking successors from W reaches Q in exactly three single hops.
    let mut cur = index["W"];
    for _ in 0..3 {
        let next = tree.successors(cur);
        assert_eq!(next.len(), 1);
        cur = next[0];
    }
    assert_eq!(cur, index["Q"]);
}

#[test]
fn dummy_rows_interpolate_between_endpoints() {
    let mut tree: Tree<NodeLabel> = Tree::new();
    let a = tree.add_node(NodeLabel::Tech(TechNodeData {
        id: "a".into(),
        tech_level: TechLevel(0),
        sort_key: "a".into(),
    }));
    let b = tree.add_node(NodeLabel::Tech(TechNodeData {
        id: "b".into(),
        tech_level: TechLevel(0),
        sort_key: "b".into(),
    }));
    tree.set_layer(a, 1);
    tree.set_layer(b, 4);
    tree.set_yf(a, 0.0);
    tree.set_yf(b, 3.0);
    tree.add_edge(a, b);

    normalize(&mut tree);

    let minted = dummies(&tree);
    assert_eq!(minted.len(), 2);
    for &d in &minted {
        let expected = (tree.layer(d) - 1) as f64;
        assert!((tree.yf(d) - expected).abs() < 1e-9);

        let data = tree.node(d).dummy().unwrap();
        assert_eq!(data.tail, a);
        assert_eq!(data.head, b);
    }
}

#[test]
fn single_span_graph_is_untouched() {
    let items = vec![item("A", 0, &[]), item("B", 0, &["A"])];
    let BuiltGraph { mut tree, index: _ } = build_graph(&items);
    assign_layers(&mut tree);
    let (nodes, edges) = (tree.node_count(), tree.edge_count());

    normalize(&mut tree);

    assert_eq!(tree.node_count(), nodes);
    assert_eq!(tree.edge_count(), edges);
}
