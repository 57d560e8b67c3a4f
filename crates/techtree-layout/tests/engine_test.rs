use std::sync::Arc;
use std::thread;
use techtree_layout::{LayoutEngine, LayoutError, NodeStatus, TechItem, TechLevel, TechState};

fn item(id: &str, level: u8, prerequisites: &[&str]) -> TechItem {
    TechItem::new(id, TechLevel(level)).with_prerequisites(prerequisites.iter().copied())
}

/// X -> Y -> Z plus W -> Z, where W -> Z spans two layers and gets a dummy.
fn sample_items() -> Vec<TechItem> {
    vec![
        item("X", 0, &[]),
        item("W", 0, &[]),
        item("Y", 0, &["X"]),
        item("Z", 0, &["Y", "W"]),
    ]
}

struct Progress {
    completed: Vec<&'static str>,
    available: Vec<&'static str>,
}

impl TechState for Progress {
    fn completed(&self, id: &str) -> bool {
        self.completed.contains(&id)
    }
    fn available(&self, id: &str) -> bool {
        self.available.contains(&id)
    }
}

#[test]
fn build_is_idempotent() {
    let engine = LayoutEngine::new(sample_items());
    let first = engine.build().unwrap();
    let second = engine.build().unwrap();

    assert!(Arc::ptr_eq(&first, &second));
    assert!(engine.is_built());
}

#[test]
fn input_order_does_not_change_the_layout() {
    let mut reversed = sample_items();
    reversed.reverse();

    let a = LayoutEngine::new(sample_items()).build().unwrap();
    let b = LayoutEngine::new(reversed).build().unwrap();

    assert_eq!(a.nodes, b.nodes);
    assert_eq!(a.edges, b.edges);
    for id in ["X", "W", "Y", "Z"] {
        assert_eq!(a.position_of(id), b.position_of(id));
    }
}

#[test]
fn sort_key_orders_nodes_within_a_level() {
    let items = vec![
        TechItem::new("alpha", TechLevel(0)).with_sort_key("2"),
        TechItem::new("beta", TechLevel(0)).with_sort_key("1"),
    ];
    let layout = LayoutEngine::new(items).build().unwrap();

    // Node creation order follows (tech_level, sort_key, id), not id alone.
    assert_eq!(layout.nodes[0].id.as_deref(), Some("beta"));
    assert_eq!(layout.nodes[1].id.as_deref(), Some("alpha"));
}

#[test]
fn reset_then_rebuild_reproduces_the_layout() {
    let engine = LayoutEngine::new(sample_items());
    let first = engine.build().unwrap();

    engine.reset();
    assert!(!engine.is_built());
    assert!(matches!(engine.result(), Err(LayoutError::NotBuilt)));

    let second = engine.build().unwrap();
    assert!(!Arc::ptr_eq(&first, &second));
    assert_eq!(first.nodes, second.nodes);
}

#[test]
fn background_build_rendezvous() {
    let engine = LayoutEngine::new(sample_items());
    let handle = engine.build_in_background();

    let layout = engine.wait_until_built().unwrap();
    assert!(engine.is_built());
    assert_eq!(engine.result().unwrap().nodes, layout.nodes);

    handle.join().unwrap();
}

#[test]
fn wait_until_built_runs_a_fresh_build_when_idle() {
    let engine = LayoutEngine::new(sample_items());
    let layout = engine.wait_until_built().unwrap();

    assert!(engine.is_built());
    assert_eq!(layout.position_of("X").unwrap().0, 1);
}

#[test]
fn concurrent_builds_share_one_result() {
    let engine = Arc::new(LayoutEngine::new(sample_items()));
    let worker = Arc::clone(&engine);
    let handle = thread::spawn(move || worker.build().unwrap());

    let mine = engine.build().unwrap();
    let theirs = handle.join().unwrap();
    assert!(Arc::ptr_eq(&mine, &theirs));
}

#[test]
fn empty_input_fails_and_can_retry() {
    let engine = LayoutEngine::new(Vec::new());

    assert!(matches!(engine.build(), Err(LayoutError::EmptyGraph)));
    assert!(!engine.is_built());
    // The failure left the phase machine ready for another attempt.
    assert!(matches!(engine.build(), Err(LayoutError::EmptyGraph)));
}

#[test]
fn edges_span_adjacent_layers_only() {
    let layout = LayoutEngine::new(sample_items()).build().unwrap();
    for edge in &layout.edges {
        let span = layout.nodes[edge.target].layer as i64 - layout.nodes[edge.source].layer as i64;
        assert_eq!(span, 1);
    }
}

#[test]
fn dummy_forwards_display_state() {
    let layout = LayoutEngine::new(sample_items()).build().unwrap();

    let dummy = layout
        .nodes
        .iter()
        .position(|n| n.id.is_none())
        .expect("W -> Z should have produced a dummy");
    let substitutes = layout.nodes[dummy].substitutes.unwrap();
    assert_eq!(layout.nodes[substitutes.target].id.as_deref(), Some("Z"));
    assert_eq!(layout.label(dummy), Some("Z"));

    // The dummy sits mid-chain: one edge in, one edge out.
    assert_eq!(layout.edges.iter().filter(|e| e.target == dummy).count(), 1);
    assert_eq!(layout.edges.iter().filter(|e| e.source == dummy).count(), 1);

    let done = Progress {
        completed: vec!["Z"],
        available: vec![],
    };
    assert_eq!(layout.status(dummy, &done), NodeStatus::Completed);

    let reachable = Progress {
        completed: vec![],
        available: vec!["Z"],
    };
    assert_eq!(layout.status(dummy, &reachable), NodeStatus::Available);

    let untouched = Progress {
        completed: vec![],
        available: vec![],
    };
    assert_eq!(layout.status(dummy, &untouched), NodeStatus::Locked);
}

#[test]
fn position_lookup_and_miss() {
    let layout = LayoutEngine::new(sample_items()).build().unwrap();

    let (layer, _row) = layout.position_of("X").unwrap();
    assert_eq!(layer, 1);
    assert_eq!(layout.position_of("Z").unwrap().0, 3);

    assert_eq!(layout.position_of("nope"), None);
    // Second miss takes the already-warned path.
    assert_eq!(layout.position_of("nope"), None);
}

#[test]
fn rows_below_the_maximum_stay_occupied() {
    let items = vec![
        item("root", 0, &[]),
        item("a", 0, &["root"]),
        item("b", 0, &["root"]),
        item("c", 0, &["root"]),
        item("d", 1, &["a", "b"]),
        item("e", 1, &["c"]),
        item("f", 1, &[]),
        item("g", 2, &["d", "e"]),
        item("h", 2, &["f", "root"]),
    ];
    let layout = LayoutEngine::new(items).build().unwrap();

    for row in 1..=layout.max_row {
        assert!(
            layout.nodes.iter().any(|n| n.row == row),
            "row {row} is empty below max_row {}",
            layout.max_row
        );
    }
}

#[test]
fn sanitation_report_is_surfaced() {
    let items = vec![
        item("A", 0, &[]),
        item("B", 0, &["A"]),
        item("C", 0, &["A", "B"]),
    ];
    let layout = LayoutEngine::new(items).build().unwrap();

    assert_eq!(
        layout.sanitation.removed_redundant,
        vec![("C".to_string(), "A".to_string())]
    );
    assert!(layout.sanitation.converged);
}

#[test]
fn layout_serializes() {
    let layout = LayoutEngine::new(sample_items()).build().unwrap();
    let value = serde_json::to_value(&*layout).unwrap();

    assert!(value["nodes"].is_array());
    assert!(value["edges"].is_array());
    assert!(value["bands"].is_array());
    assert!(value["max_layer"].is_u64());

    let items = sample_items();
    let json = serde_json::to_string(&items).unwrap();
    let back: Vec<TechItem> = serde_json::from_str(&json).unwrap();
    assert_eq!(items, back);
}
