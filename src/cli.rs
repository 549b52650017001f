//! Command-line front end over JSON files.
//!
//! Each subcommand loads its inputs, calls into the pure core and returns a
//! JSON document; `main` only prints it.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::Deserialize;
use serde_json::{json, Value};

use crate::config::{self, ExplorerConfig};
use crate::error::Result;
use crate::geometry::{blob_outline, convex_hull, point_in_hull, Blob};
use crate::graph::{
    build_adjacency_maps, collect_chain_node_ids, fan_out, find_chain_edges,
};
use crate::pivot::{apply_filters, filter_edges_to_nodes, leaf_ids};
use crate::types::{Edge, Filter, Point, Row};

// ---------------------------------------------------------------------------
// Arguments
// ---------------------------------------------------------------------------

#[derive(Debug, Parser)]
#[command(name = "pivotgraph", version, about = "Explore call graphs: chains, fan-outs, blobs and pivot filters")]
pub struct Cli {
    /// YAML config file (defaults to the platform config directory).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Log at debug level regardless of RUST_LOG.
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Edges connecting two or more selected nodes.
    Chain {
        /// Graph file: `{"nodes": [...], "edges": [...]}`.
        #[arg(long)]
        graph: PathBuf,
        /// Selected node id (repeatable).
        #[arg(long = "select", required = true)]
        select: Vec<String>,
        #[arg(long)]
        max_hops: Option<u32>,
    },
    /// Everything within a hop budget of one node, both directions.
    FanOut {
        #[arg(long)]
        graph: PathBuf,
        #[arg(long)]
        node: String,
        #[arg(long)]
        depth: Option<u32>,
    },
    /// Apply pivot filters to a row tree.
    Filter {
        /// JSON array of rows.
        #[arg(long)]
        rows: PathBuf,
        /// JSON array of filters.
        #[arg(long, default_value = "[]")]
        filters: String,
        /// Graph file whose edges are trimmed to the surviving leaves.
        #[arg(long, requires = "id_field")]
        edges: Option<PathBuf>,
        /// Dimension holding the node id on leaf rows.
        #[arg(long)]
        id_field: Option<String>,
    },
    /// Convex hull and padded blob outline of a point cluster.
    Hull {
        /// JSON array of `[x, y]` points.
        #[arg(long)]
        points: PathBuf,
        #[arg(long)]
        padding: Option<f64>,
        /// Hit-test this x coordinate (requires --y).
        #[arg(long, requires = "y", allow_hyphen_values = true)]
        x: Option<f64>,
        #[arg(long, requires = "x", allow_hyphen_values = true)]
        y: Option<f64>,
    },
}

/// On-disk graph: node payloads are opaque to the core.
#[derive(Debug, Deserialize)]
pub struct GraphFile {
    #[serde(default)]
    pub nodes: Vec<Value>,
    #[serde(default)]
    pub edges: Vec<Edge>,
}

// ---------------------------------------------------------------------------
// Execution
// ---------------------------------------------------------------------------

/// Resolve config and run the selected subcommand.
pub fn run(cli: &Cli) -> Result<Value> {
    let config = config::load(cli.config.as_deref())?;
    run_command(&cli.command, &config)
}

/// Run one subcommand against an already-loaded config.
pub fn run_command(command: &Command, config: &ExplorerConfig) -> Result<Value> {
    match command {
        Command::Chain {
            graph,
            select,
            max_hops,
        } => {
            let graph = read_graph(graph)?;
            let max_hops = max_hops.unwrap_or(config.chain.max_hops);
            let maps = build_adjacency_maps(&graph.edges);
            let chain = find_chain_edges(select, &maps.forward, &maps.backward, &graph.edges, max_hops);
            let nodes = collect_chain_node_ids(&chain, select);
            warn_if_over_limit(nodes.len(), config);
            let edges = filter_edges_to_nodes(&graph.edges, &nodes);
            Ok(json!({
                "max_hops": max_hops,
                "chain": chain,
                "nodes": nodes,
                "edges": edges,
            }))
        }
        Command::FanOut { graph, node, depth } => {
            let graph = read_graph(graph)?;
            let depth = depth.unwrap_or(config.fan_out.depth);
            let maps = build_adjacency_maps(&graph.edges);
            let fan = fan_out(node, &maps, &graph.edges, depth);
            let nodes = fan.node_ids();
            warn_if_over_limit(nodes.len(), config);
            Ok(json!({
                "origin": fan.origin,
                "depth": depth,
                "downstream": fan.downstream,
                "upstream": fan.upstream,
                "edges": fan.edges,
                "nodes": nodes,
            }))
        }
        Command::Filter {
            rows,
            filters,
            edges,
            id_field,
        } => {
            let rows: Vec<Row> = read_json(rows)?;
            let filters: Vec<Filter> = serde_json::from_str(filters)?;
            let kept = apply_filters(&rows, &filters);
            let mut out = json!({ "rows": kept });
            if let (Some(edges), Some(id_field)) = (edges, id_field) {
                let graph = read_graph(edges)?;
                let ids = leaf_ids(&kept, id_field);
                warn_if_over_limit(ids.len(), config);
                out["nodes"] = json!(ids);
                out["edges"] = json!(filter_edges_to_nodes(&graph.edges, &ids));
            }
            Ok(out)
        }
        Command::Hull {
            points,
            padding,
            x,
            y,
        } => {
            let points: Vec<Point> = read_json(points)?;
            let padding = padding.unwrap_or(config.blobs.padding);
            let hull = convex_hull(&points);
            let mut out = json!({
                "hull": hull,
                "outline": blob_outline(&points, padding),
            });
            if let (Some(x), Some(y)) = (x, y) {
                let blob = Blob::from_points("", &points, padding);
                out["contains"] = json!(point_in_hull(
                    *x,
                    *y,
                    &blob.hull,
                    config.blobs.singleton_radius
                ));
            }
            Ok(out)
        }
    }
}

fn read_json<T: for<'de> Deserialize<'de>>(path: &Path) -> Result<T> {
    tracing::debug!(path = %path.display(), "reading input");
    let text = std::fs::read_to_string(path)?;
    Ok(serde_json::from_str(&text)?)
}

fn read_graph(path: &Path) -> Result<GraphFile> {
    let graph: GraphFile = read_json(path)?;
    tracing::debug!(
        path = %path.display(),
        nodes = graph.nodes.len(),
        edges = graph.edges.len(),
        "loaded graph"
    );
    Ok(graph)
}

fn warn_if_over_limit(count: usize, config: &ExplorerConfig) {
    if count > config.display.max_nodes {
        tracing::warn!(
            count,
            limit = config.display.max_nodes,
            "result exceeds the display node limit"
        );
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
