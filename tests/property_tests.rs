//! Property-based tests for pivotgraph using proptest.
//!
//! These tests verify invariants that must hold for all possible inputs,
//! finding edge cases that unit tests might miss.

use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;

use pivotgraph::geometry::{convex_hull, expand_hull_pts, point_in_polygon};
use pivotgraph::graph::{bfs_from_node, build_adjacency_maps, collect_chain_node_ids, find_chain_edges};
use pivotgraph::pivot::{apply_filters, filter_edges_to_nodes, leaf_rows, row_passes};
use pivotgraph::types::{Edge, Endpoint, Filter, NodeRef, Point, Row};

// ---------------------------------------------------------------------------
// Strategy helpers
// ---------------------------------------------------------------------------

/// Node ids from a small pool so random edges actually collide.
fn arb_node_id() -> impl Strategy<Value = String> {
    (0u8..8).prop_map(|i| format!("n{i}"))
}

/// An endpoint in either shape the rendering layer may hand over.
fn arb_endpoint() -> impl Strategy<Value = Endpoint> {
    (arb_node_id(), any::<bool>()).prop_map(|(id, rewritten)| {
        if rewritten {
            let mut extra = serde_json::Map::new();
            extra.insert("x".into(), serde_json::json!(1.5));
            Endpoint::Node(NodeRef { id: Some(id), extra })
        } else {
            Endpoint::Id(id)
        }
    })
}

fn arb_edge() -> impl Strategy<Value = Edge> {
    (arb_endpoint(), arb_endpoint()).prop_map(|(s, t)| Edge::new(s, t))
}

fn arb_edges() -> impl Strategy<Value = Vec<Edge>> {
    prop::collection::vec(arb_edge(), 0..24)
}

fn arb_point() -> impl Strategy<Value = Point> {
    (-100i32..100, -100i32..100).prop_map(|(x, y)| [x as f64, y as f64])
}

fn arb_symbol() -> impl Strategy<Value = Row> {
    (
        prop::sample::select(vec!["build", "parse", "emit", "load"]),
        prop::option::of(0u8..20),
    )
        .prop_map(|(name, calls)| {
            Row::new()
                .with_key("symbol", name)
                .with_value("calls", calls.map(f64::from))
        })
}

fn arb_class() -> impl Strategy<Value = Row> {
    (
        prop::sample::select(vec!["Builder", "Parser", "Emitter"]),
        prop::collection::vec(arb_symbol(), 0..4),
    )
        .prop_map(|(name, symbols)| Row::new().with_key("class", name).with_children(symbols))
}

fn arb_tree() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec(
        (
            prop::sample::select(vec!["core", "util"]),
            prop::collection::vec(arb_class(), 0..4),
        )
            .prop_map(|(name, classes)| Row::new().with_key("module", name).with_children(classes)),
        0..4,
    )
}

fn arb_filter() -> impl Strategy<Value = Filter> {
    prop_oneof![
        prop::sample::select(vec!["Builder", "Parser"]).prop_map(|c| Filter::exclude("class", &[c])),
        prop::sample::select(vec!["build", "emit"]).prop_map(|s| Filter::include("symbol", &[s])),
        prop::sample::select(vec!["^b", "!^p", "(bad"]).prop_map(|p| Filter::regex("symbol", p)),
        prop::sample::select(vec![">5", "<=3", "2..8", "!0..1", "junk"])
            .prop_map(|e| Filter::measure("calls", e)),
    ]
}

fn edge_pairs(edges: &[Edge]) -> HashSet<(String, String)> {
    edges
        .iter()
        .filter_map(Edge::endpoints)
        .map(|(u, v)| (u.to_string(), v.to_string()))
        .collect()
}

// ===========================================================================
// Adjacency & BFS invariants
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn adjacency_only_contains_real_edges(edges in arb_edges()) {
        let maps = build_adjacency_maps(&edges);
        let pairs = edge_pairs(&edges);

        for (source, targets) in &maps.forward {
            for target in targets {
                prop_assert!(pairs.contains(&(source.clone(), target.clone())));
            }
        }
        for (target, sources) in &maps.backward {
            for source in sources {
                prop_assert!(pairs.contains(&(source.clone(), target.clone())));
            }
        }
        let total: usize = maps.forward.values().map(Vec::len).sum();
        prop_assert_eq!(total, edges.len());
    }

    #[test]
    fn bfs_depth_zero_is_singleton(edges in arb_edges(), start in arb_node_id()) {
        let maps = build_adjacency_maps(&edges);
        let dist = bfs_from_node(&start, &maps.forward, 0);
        prop_assert_eq!(dist.len(), 1);
        prop_assert_eq!(dist.get(&start), Some(&0));
    }

    #[test]
    fn bfs_distances_are_shortest_and_bounded(
        edges in arb_edges(),
        start in arb_node_id(),
        depth in 0u32..6,
    ) {
        let maps = build_adjacency_maps(&edges);
        let dist = bfs_from_node(&start, &maps.forward, depth);
        let pairs = edge_pairs(&edges);

        prop_assert_eq!(dist.get(&start), Some(&0));
        for (node, &d) in &dist {
            prop_assert!(d <= depth);
            if node != &start {
                // Some predecessor sits exactly one hop closer.
                let has_parent = dist
                    .iter()
                    .any(|(u, &du)| du + 1 == d && pairs.contains(&(u.clone(), node.clone())));
                prop_assert!(has_parent, "{} at {} has no parent", node, d);
            }
        }
        // No edge skips a level inside the explored region.
        for (u, v) in &pairs {
            if let (Some(&du), Some(&dv)) = (dist.get(u), dist.get(v)) {
                prop_assert!(dv <= du + 1);
            }
        }
    }
}

// ===========================================================================
// Chain discovery invariants
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn chain_edges_exist_in_input(
        edges in arb_edges(),
        selected in prop::collection::vec(arb_node_id(), 0..4),
        max_hops in 1u32..6,
    ) {
        let maps = build_adjacency_maps(&edges);
        let chain = find_chain_edges(&selected, &maps.forward, &maps.backward, &edges, max_hops);
        let pairs = edge_pairs(&edges);

        for (key, &len) in &chain {
            prop_assert!(
                pairs.contains(&(key.source.clone(), key.target.clone())),
                "fabricated edge {}", key
            );
            prop_assert!(len >= 1 && len <= max_hops);
        }
    }

    #[test]
    fn chain_is_connected_to_the_selection(
        edges in arb_edges(),
        selected in prop::collection::vec(arb_node_id(), 2..4),
        max_hops in 1u32..6,
    ) {
        let maps = build_adjacency_maps(&edges);
        let chain = find_chain_edges(&selected, &maps.forward, &maps.backward, &edges, max_hops);
        let selected_set: BTreeSet<&str> = selected.iter().map(String::as_str).collect();

        // Walk the chain edges forward from the selection: every chain edge
        // source must be reached.
        let mut reached: BTreeSet<String> = selected.iter().cloned().collect();
        loop {
            let before = reached.len();
            for key in chain.keys() {
                if reached.contains(&key.source) {
                    reached.insert(key.target.clone());
                }
            }
            if reached.len() == before {
                break;
            }
        }
        for key in chain.keys() {
            prop_assert!(reached.contains(&key.source), "{} unreachable from selection", key);
        }

        // Mirror walk backward from the selection: every chain edge target
        // must lead back into it.
        let mut leads_back: BTreeSet<String> = selected.iter().cloned().collect();
        loop {
            let before = leads_back.len();
            for key in chain.keys() {
                if leads_back.contains(&key.target) {
                    leads_back.insert(key.source.clone());
                }
            }
            if leads_back.len() == before {
                break;
            }
        }
        for key in chain.keys() {
            prop_assert!(leads_back.contains(&key.target), "{} cannot reach the selection", key);
        }

        let ids = collect_chain_node_ids(&chain, &selected);
        prop_assert!(selected_set.iter().all(|s| ids.contains(*s)));
    }
}

// ===========================================================================
// Geometry invariants
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn hull_is_subset_of_input(points in prop::collection::vec(arb_point(), 0..30)) {
        let hull = convex_hull(&points);
        prop_assert!(hull.len() <= points.len());
        for p in &hull {
            prop_assert!(points.contains(p), "{:?} not in input", p);
        }
    }

    #[test]
    fn hull_vertices_turn_left(points in prop::collection::vec(arb_point(), 3..30)) {
        let hull = convex_hull(&points);
        if hull.len() >= 3 {
            for i in 0..hull.len() {
                let o = hull[i];
                let a = hull[(i + 1) % hull.len()];
                let b = hull[(i + 2) % hull.len()];
                let cross = (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0]);
                prop_assert!(cross > 0.0);
            }
        }
    }

    #[test]
    fn zero_padding_is_identity(points in prop::collection::vec(arb_point(), 0..30)) {
        let hull = convex_hull(&points);
        let expanded = expand_hull_pts(&hull, 0.0);
        prop_assert_eq!(hull.len(), expanded.len());
        for (a, b) in hull.iter().zip(&expanded) {
            prop_assert!((a[0] - b[0]).abs() < 1e-9 && (a[1] - b[1]).abs() < 1e-9);
        }
    }

    #[test]
    fn points_far_outside_the_square_miss(x in 1.0001f64..1000.0, y in -1000.0f64..1000.0) {
        let square = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        prop_assert!(!point_in_polygon(x, y, &square));
        prop_assert!(!point_in_polygon(-x, y, &square));
    }
}

// ===========================================================================
// Pivot filter invariants
// ===========================================================================

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn filtering_is_idempotent(
        rows in arb_tree(),
        filters in prop::collection::vec(arb_filter(), 0..3),
    ) {
        let once = apply_filters(&rows, &filters);
        let twice = apply_filters(&once, &filters);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn surviving_rows_pass_and_parents_keep_children(
        rows in arb_tree(),
        filters in prop::collection::vec(arb_filter(), 0..3),
    ) {
        fn check(rows: &[Row], filters: &[Filter]) -> Result<(), TestCaseError> {
            for row in rows {
                prop_assert!(filters.iter().all(|f| row_passes(row, f)));
                check(&row.children, filters)?;
            }
            Ok(())
        }
        let out = apply_filters(&rows, &filters);
        check(&out, &filters)?;
        // Leaves never multiply.
        prop_assert!(leaf_rows(&out).len() <= leaf_rows(&rows).len());
    }

    #[test]
    fn filter_order_does_not_matter(
        rows in arb_tree(),
        mut filters in prop::collection::vec(arb_filter(), 0..4),
    ) {
        let forward = apply_filters(&rows, &filters);
        filters.reverse();
        prop_assert_eq!(forward, apply_filters(&rows, &filters));
    }

    #[test]
    fn consistent_edges_only_touch_valid_nodes(
        edges in arb_edges(),
        valid in prop::collection::btree_set(arb_node_id(), 0..8),
    ) {
        let out = filter_edges_to_nodes(&edges, &valid);
        for edge in &out {
            let (u, v) = edge.endpoints().expect("kept edges resolve");
            prop_assert!(valid.contains(u) && valid.contains(v));
        }
        let expected = edges
            .iter()
            .filter(|e| e.endpoints().is_some_and(|(u, v)| valid.contains(u) && valid.contains(v)))
            .count();
        prop_assert_eq!(out.len(), expected);
    }
}
