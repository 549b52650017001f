//! Graph layer: adjacency, bounded reachability, chain discovery and
//! selection highlighting.

pub mod adjacency;
pub mod chain;
pub mod highlight;
pub mod traversal;

pub use adjacency::{build_adjacency_maps, connected_node_ids, Adjacency, AdjacencyMaps};
pub use chain::{collect_chain_node_ids, find_chain_edges, ChainEdgeMap};
pub use highlight::{ChainHighlight, Highlight};
pub use traversal::{bfs_from_node, fan_out, DistanceMap, FanOut};
