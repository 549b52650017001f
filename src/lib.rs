//! pivotgraph: graph exploration core.
//!
//! Pure, synchronous building blocks for an interactive call-graph explorer:
//! adjacency and bounded reachability, multi-node chain discovery, convex
//! hull blob hit-testing, and hierarchical pivot filtering. Nothing here
//! lays out, renders, persists or fetches.

pub mod cli;
pub mod config;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod observability;
pub mod pivot;
pub mod types;
