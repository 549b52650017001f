//! Forward / backward adjacency maps built from a raw edge list.
//!
//! Maps are rebuilt from scratch whenever the edge set changes; nothing here
//! supports incremental updates.

use std::collections::{BTreeSet, HashMap};

use crate::types::{Edge, NodeId};

/// Adjacency list keyed by node id. Neighbour order follows edge order.
pub type Adjacency = HashMap<NodeId, Vec<NodeId>>;

/// Out-edges (`forward`) and in-edges (`backward`) of every node that
/// appears as a resolvable endpoint.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdjacencyMaps {
    pub forward: Adjacency,
    pub backward: Adjacency,
}

/// Build both adjacency maps in one pass over `edges`.
///
/// Parallel edges and self-loops are kept verbatim. Edges with an endpoint
/// that does not resolve to an id are skipped.
pub fn build_adjacency_maps(edges: &[Edge]) -> AdjacencyMaps {
    let mut maps = AdjacencyMaps::default();
    for (source, target) in edges.iter().filter_map(Edge::endpoints) {
        maps.forward
            .entry(source.to_string())
            .or_default()
            .push(target.to_string());
        maps.backward
            .entry(target.to_string())
            .or_default()
            .push(source.to_string());
    }
    maps
}

/// Ids touched by at least one resolvable edge. Everything else in a view's
/// node set is isolated.
pub fn connected_node_ids(edges: &[Edge]) -> BTreeSet<NodeId> {
    edges
        .iter()
        .filter_map(Edge::endpoints)
        .flat_map(|(u, v)| [u.to_string(), v.to_string()])
        .collect()
}
