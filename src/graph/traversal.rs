//! Bounded breadth-first reachability over an adjacency map.
//!
//! The same primitive answers both "who can this node reach" (forward map)
//! and "who can reach this node" (backward map). Cycles are handled by the
//! visited set alone; no DAG assumptions anywhere.

use std::collections::{BTreeSet, HashMap, VecDeque};

use crate::graph::adjacency::{Adjacency, AdjacencyMaps};
use crate::types::{Edge, EdgeKey, NodeId};

/// Hop count from a BFS start node. Always contains the start at 0.
pub type DistanceMap = HashMap<NodeId, u32>;

// ---------------------------------------------------------------------------
// bfs_from_node
// ---------------------------------------------------------------------------

/// Shortest hop counts from `start`, following `adj`, up to `max_depth` hops.
///
/// Nodes exactly `max_depth` hops away are included. A start node with no
/// entry in `adj` yields `{start: 0}`.
pub fn bfs_from_node(start: &str, adj: &Adjacency, max_depth: u32) -> DistanceMap {
    let mut dist = DistanceMap::new();
    dist.insert(start.to_string(), 0);

    let mut queue: VecDeque<(&str, u32)> = VecDeque::new();
    queue.push_back((start, 0));

    while let Some((current, depth)) = queue.pop_front() {
        if depth >= max_depth {
            continue;
        }
        let Some(neighbors) = adj.get(current) else {
            continue;
        };
        for next in neighbors {
            if dist.contains_key(next.as_str()) {
                continue;
            }
            dist.insert(next.clone(), depth + 1);
            queue.push_back((next.as_str(), depth + 1));
        }
    }

    dist
}

// ---------------------------------------------------------------------------
// fan_out
// ---------------------------------------------------------------------------

/// Single-selection neighbourhood: everything within `depth` hops downstream
/// and upstream of one node.
#[derive(Debug, Clone, PartialEq)]
pub struct FanOut {
    pub origin: NodeId,
    pub downstream: DistanceMap,
    pub upstream: DistanceMap,
    /// Edges that step one level further away from the origin inside either
    /// reach set.
    pub edges: BTreeSet<EdgeKey>,
}

impl FanOut {
    /// Every node in either direction, origin included.
    pub fn node_ids(&self) -> BTreeSet<NodeId> {
        self.downstream
            .keys()
            .chain(self.upstream.keys())
            .cloned()
            .collect()
    }
}

/// Compute the fan-out around `origin`.
pub fn fan_out(origin: &str, maps: &AdjacencyMaps, edges: &[Edge], depth: u32) -> FanOut {
    let downstream = bfs_from_node(origin, &maps.forward, depth);
    let upstream = bfs_from_node(origin, &maps.backward, depth);

    let moves_away = |dist: &DistanceMap, near: &str, far: &str| {
        matches!((dist.get(near), dist.get(far)), (Some(dn), Some(df)) if df > dn)
    };

    let edges = edges
        .iter()
        .filter_map(Edge::endpoints)
        .filter(|(u, v)| moves_away(&downstream, u, v) || moves_away(&upstream, v, u))
        .map(|(u, v)| EdgeKey::new(u, v))
        .collect();

    FanOut {
        origin: origin.to_string(),
        downstream,
        upstream,
        edges,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
