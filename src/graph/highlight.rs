//! Selection-driven highlighting.
//!
//! The selection size picks the mode: nothing selected is idle, one node
//! fans out around itself, two or more switch to chain discovery.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::ExplorerConfig;
use crate::graph::adjacency::build_adjacency_maps;
use crate::graph::chain::{collect_chain_node_ids, find_chain_edges, ChainEdgeMap};
use crate::graph::traversal::{fan_out, FanOut};
use crate::pivot::filter_edges_to_nodes;
use crate::types::{Edge, NodeId};

/// Result of a multi-node selection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChainHighlight {
    pub edges: ChainEdgeMap,
    pub nodes: BTreeSet<NodeId>,
    /// Input edges restricted to `nodes`, ready for layout.
    #[serde(skip)]
    pub visible_edges: Vec<Edge>,
}

/// What the rendering layer should emphasise for the current selection.
#[derive(Debug, Clone, PartialEq)]
pub enum Highlight {
    Idle,
    FanOut(FanOut),
    Chain(ChainHighlight),
}

impl Highlight {
    /// Compute the highlight for `selected` over `edges`. Duplicate ids in
    /// the selection count once.
    pub fn compute<S: AsRef<str>>(selected: &[S], edges: &[Edge], config: &ExplorerConfig) -> Self {
        let distinct: BTreeSet<&str> = selected.iter().map(AsRef::as_ref).collect();
        let maps = build_adjacency_maps(edges);

        match distinct.len() {
            0 => Self::Idle,
            1 => {
                let origin = selected[0].as_ref();
                Self::FanOut(fan_out(origin, &maps, edges, config.fan_out.depth))
            }
            _ => {
                let chain = find_chain_edges(
                    selected,
                    &maps.forward,
                    &maps.backward,
                    edges,
                    config.chain.max_hops,
                );
                let nodes = collect_chain_node_ids(&chain, selected);
                let visible_edges = filter_edges_to_nodes(edges, &nodes);
                Self::Chain(ChainHighlight {
                    edges: chain,
                    nodes,
                    visible_edges,
                })
            }
        }
    }

    /// Every highlighted node id.
    pub fn node_ids(&self) -> BTreeSet<NodeId> {
        match self {
            Self::Idle => BTreeSet::new(),
            Self::FanOut(fan) => fan.node_ids(),
            Self::Chain(chain) => chain.nodes.clone(),
        }
    }
}
