use techtree_layout::build::{BuiltGraph, build_graph};
use techtree_layout::rank::assign_layers;
use techtree_layout::{TechItem, TechLevel};

fn item(id: &str, level: u8, prerequisites: &[&str]) -> TechItem {
    TechItem::new(id, TechLevel(level)).with_prerequisites(prerequisites.iter().copied())
}

fn diamond() -> Vec<TechItem> {
    vec![
        item("A", 0, &[]),
        item("B", 0, &["A"]),
        item("C", 1, &["A"]),
        item("D", 1, &["B", "C"]),
    ]
}

#[test]
fn layers_follow_longest_path_across_levels() {
    let BuiltGraph { mut tree, index } = build_graph(&diamond());
    assign_layers(&mut tree);

    assert_eq!(tree.layer(index["A"]), 1);
    assert_eq!(tree.layer(index["B"]), 2);
    assert_eq!(tree.layer(index["C"]), 2);
    assert_eq!(tree.layer(index["D"]), 3);
}

#[test]
fn bands_cover_each_level_layer_range() {
    let BuiltGraph { mut tree, index: _ } = build_graph(&diamond());
    let bands = assign_layers(&mut tree);

    assert_eq!(bands.len(), 2);
    assert_eq!(bands[0].tech_level, TechLevel(0));
    assert_eq!((bands[0].lower, bands[0].upper), (0, 2));
    assert_eq!(bands[1].tech_level, TechLevel(1));
    assert_eq!((bands[1].lower, bands[1].upper), (1, 3));
}

#[test]
fn later_level_without_prereqs_starts_at_level_cursor() {
    let mut items = diamond();
    items.push(item("E", 1, &[]));
    let BuiltGraph { mut tree, index } = build_graph(&items);
    assign_layers(&mut tree);

    // Tech level 0 reaches layer 2, so E cannot sit above it.
    assert_eq!(tree.layer(index["E"]), 2);
}

#[test]
fn every_edge_points_at_a_deeper_layer() {
    let BuiltGraph { mut tree, index: _ } = build_graph(&diamond());
    assign_layers(&mut tree);

    for e in tree.edge_ixs().collect::<Vec<_>>() {
        assert!(tree.span(e).unwrap() >= 1);
    }
}

#[test]
fn cyclic_input_terminates() {
    let items = vec![item("A", 0, &["B"]), item("B", 0, &["A"])];
    let BuiltGraph { mut tree, index } = build_graph(&items);
    let bands = assign_layers(&mut tree);

    assert_eq!(bands.len(), 1);
    assert!(tree.layer(index["A"]) >= 1);
    assert!(tree.layer(index["B"]) >= 1);
}

#[test]
fn empty_input_yields_no_bands() {
    let BuiltGraph { mut tree, index: _ } = build_graph(&[]);
    assert!(assign_layers(&mut tree).is_empty());
}
