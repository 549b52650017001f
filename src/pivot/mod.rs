//! Pivot layer: hierarchical row filtering and view consistency.

pub mod expr;
pub mod filter;

pub use expr::{match_expr, MeasureExpr};
pub use filter::{apply_filters, filter_edges_to_nodes, leaf_ids, leaf_rows, row_passes};
