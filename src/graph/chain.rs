//! Multi-node chain discovery.
//!
//! Given two or more selected nodes, find every edge that lies on a bounded
//! path between some ordered pair of them. For each pair `(S, T)` the edge
//! list is narrowed to a *progress subgraph*: edges that move strictly away
//! from `S` and strictly toward `T` in the BFS distance fields of the two
//! nodes. Inside that subgraph, an edge survives only if its source is
//! reachable from `S` and its target can reach `T`, so the result never
//! contains a fragment disconnected from the pair it was found for.
//!
//! Cost is O(P² · (V + E)) for P selected nodes. Edge direction is taken
//! from the input as-is; a reverse key is never produced.

use std::collections::{BTreeMap, BTreeSet, HashSet};

use crate::graph::adjacency::{Adjacency, AdjacencyMaps};
use crate::graph::traversal::{bfs_from_node, DistanceMap};
use crate::types::{Edge, EdgeKey, NodeId};

/// Edge key → shortest chain length (in hops) the edge takes part in.
pub type ChainEdgeMap = BTreeMap<EdgeKey, u32>;

/// An edge admitted to one pair's progress subgraph, with the length of the
/// shortest `S → T` path running through it.
struct ProgressEdge<'a> {
    source: &'a str,
    target: &'a str,
    length: u32,
}

// ---------------------------------------------------------------------------
// find_chain_edges
// ---------------------------------------------------------------------------

/// Find the edges connecting the selected nodes within `max_hops`.
///
/// Returns an empty map when fewer than two distinct nodes are selected.
pub fn find_chain_edges<S: AsRef<str>>(
    selected: &[S],
    forward: &Adjacency,
    backward: &Adjacency,
    edges: &[Edge],
    max_hops: u32,
) -> ChainEdgeMap {
    let selected = distinct(selected);
    let mut chain = ChainEdgeMap::new();
    if selected.len() < 2 {
        return chain;
    }

    let resolved: Vec<(&str, &str)> = edges.iter().filter_map(Edge::endpoints).collect();

    // One BFS per selected node and direction, shared by every pair.
    let from: Vec<DistanceMap> = selected
        .iter()
        .map(|s| bfs_from_node(s, forward, max_hops))
        .collect();
    let to: Vec<DistanceMap> = selected
        .iter()
        .map(|t| bfs_from_node(t, backward, max_hops))
        .collect();

    let mut connected_pairs = 0usize;
    for (i, source) in selected.iter().enumerate() {
        for (j, target) in selected.iter().enumerate() {
            if i == j || !from[i].contains_key(*target) {
                continue;
            }

            let progress = progress_edges(&resolved, &from[i], &to[j], max_hops);
            let sub = progress_maps(&progress);

            let reach_forward = bfs_from_node(source, &sub.forward, max_hops);
            if !reach_forward.contains_key(*target) {
                continue;
            }
            let reach_backward = bfs_from_node(target, &sub.backward, max_hops);
            connected_pairs += 1;

            for edge in &progress {
                if reach_forward.contains_key(edge.source)
                    && reach_backward.contains_key(edge.target)
                {
                    chain
                        .entry(EdgeKey::new(edge.source, edge.target))
                        .and_modify(|len| *len = (*len).min(edge.length))
                        .or_insert(edge.length);
                }
            }
        }
    }

    tracing::debug!(
        selected = selected.len(),
        connected_pairs,
        chain_edges = chain.len(),
        max_hops,
        "chain discovery finished"
    );
    chain
}

/// Selected ids with duplicates removed, first occurrence wins.
fn distinct<S: AsRef<str>>(selected: &[S]) -> Vec<&str> {
    let mut seen = HashSet::new();
    selected
        .iter()
        .map(AsRef::as_ref)
        .filter(|id| seen.insert(*id))
        .collect()
}

/// Edges that make monotone progress from `fwd_s`'s origin toward
/// `bwd_t`'s origin, and fit a path of at most `max_hops`.
fn progress_edges<'a>(
    resolved: &[(&'a str, &'a str)],
    fwd_s: &DistanceMap,
    bwd_t: &DistanceMap,
    max_hops: u32,
) -> Vec<ProgressEdge<'a>> {
    resolved
        .iter()
        .filter_map(|&(u, v)| {
            let du = *fwd_s.get(u)?;
            if *fwd_s.get(v)? <= du {
                return None;
            }
            let dv = *bwd_t.get(v)?;
            if *bwd_t.get(u)? <= dv {
                return None;
            }
            let length = du + 1 + dv;
            (length <= max_hops).then_some(ProgressEdge {
                source: u,
                target: v,
                length,
            })
        })
        .collect()
}

fn progress_maps(progress: &[ProgressEdge<'_>]) -> AdjacencyMaps {
    let mut maps = AdjacencyMaps::default();
    for edge in progress {
        maps.forward
            .entry(edge.source.to_string())
            .or_default()
            .push(edge.target.to_string());
        maps.backward
            .entry(edge.target.to_string())
            .or_default()
            .push(edge.source.to_string());
    }
    maps
}

// ---------------------------------------------------------------------------
// collect_chain_node_ids
// ---------------------------------------------------------------------------

/// Selected ids plus every endpoint of a chain edge.
pub fn collect_chain_node_ids<S: AsRef<str>>(
    chain: &ChainEdgeMap,
    selected: &[S],
) -> BTreeSet<NodeId> {
    selected
        .iter()
        .map(|s| s.as_ref().to_string())
        .chain(
            chain
                .keys()
                .flat_map(|key| [key.source.clone(), key.target.clone()]),
        )
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
