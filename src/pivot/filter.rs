//! Recursive filtering of pivot row trees, plus the edge/node consistency
//! filter that runs whenever a view's node set shrinks.
//!
//! Filters fail open: an include list that is empty, a regex that is empty or
//! does not compile, or a measure expression that does not parse keeps every
//! row. A dimension filter on a field the row does not carry also keeps it.

use std::collections::{BTreeSet, HashSet};

use regex::{Regex, RegexBuilder};

use crate::pivot::expr::MeasureExpr;
use crate::types::{DimMode, Edge, Filter, NodeId, Row};

// ---------------------------------------------------------------------------
// Compiled filters
// ---------------------------------------------------------------------------

/// A filter prepared once per [`apply_filters`] call.
#[derive(Debug)]
enum CompiledFilter<'a> {
    Exclude {
        field: &'a str,
        values: HashSet<&'a str>,
    },
    Include {
        field: &'a str,
        values: HashSet<&'a str>,
    },
    Pattern {
        field: &'a str,
        regex: Regex,
        negate: bool,
    },
    Measure {
        mkey: &'a str,
        expr: MeasureExpr,
    },
}

impl<'a> CompiledFilter<'a> {
    /// Compile `filter`, or `None` when it can never reject a row.
    fn compile(filter: &'a Filter) -> Option<Self> {
        match filter {
            Filter::Dim {
                field,
                mode: DimMode::Exclude,
                values,
                ..
            } => (!values.is_empty()).then(|| Self::Exclude {
                field,
                values: values.iter().map(String::as_str).collect(),
            }),
            Filter::Dim {
                field,
                mode: DimMode::Include,
                values,
                ..
            } => (!values.is_empty()).then(|| Self::Include {
                field,
                values: values.iter().map(String::as_str).collect(),
            }),
            Filter::Dim {
                field,
                mode: DimMode::Regex,
                pattern,
                ..
            } => {
                let (negate, body) = match pattern.strip_prefix('!') {
                    Some(rest) => (true, rest),
                    None => (false, pattern.as_str()),
                };
                if body.is_empty() {
                    return None;
                }
                match RegexBuilder::new(body).case_insensitive(true).build() {
                    Ok(regex) => Some(Self::Pattern {
                        field,
                        regex,
                        negate,
                    }),
                    Err(e) => {
                        tracing::debug!(field = %field, error = %e, "ignoring invalid filter pattern");
                        None
                    }
                }
            }
            Filter::Measure { mkey, expr } => match MeasureExpr::parse(expr) {
                Some(expr) => Some(Self::Measure { mkey, expr }),
                None => {
                    tracing::debug!(mkey = %mkey, expr = %expr, "ignoring unparseable measure filter");
                    None
                }
            },
        }
    }

    /// Dimension filters pass rows that do not carry their field.
    fn passes(&self, row: &Row) -> bool {
        match self {
            Self::Exclude { field, values } => row
                .key
                .get(*field)
                .map_or(true, |v| !values.contains(v.as_str())),
            Self::Include { field, values } => row
                .key
                .get(*field)
                .map_or(true, |v| values.contains(v.as_str())),
            Self::Pattern {
                field,
                regex,
                negate,
            } => row
                .key
                .get(*field)
                .map_or(true, |v| regex.is_match(v) != *negate),
            Self::Measure { mkey, expr } => match row.values.get(*mkey).copied().flatten() {
                Some(v) if !v.is_nan() => expr.matches(v),
                _ => true,
            },
        }
    }
}

// ---------------------------------------------------------------------------
// apply_filters
// ---------------------------------------------------------------------------

/// Apply `filters` (ANDed) to a row tree.
///
/// A leaf survives iff it passes. A row with children survives iff it passes
/// and at least one child survives; its children are replaced by the
/// survivors. The input is left untouched.
pub fn apply_filters(rows: &[Row], filters: &[Filter]) -> Vec<Row> {
    let compiled: Vec<CompiledFilter<'_>> =
        filters.iter().filter_map(CompiledFilter::compile).collect();
    let kept = filter_level(rows, &compiled);

    tracing::debug!(
        filters = filters.len(),
        active = compiled.len(),
        top_level_in = rows.len(),
        top_level_out = kept.len(),
        "pivot filters applied"
    );
    kept
}

fn filter_level(rows: &[Row], filters: &[CompiledFilter<'_>]) -> Vec<Row> {
    rows.iter().filter_map(|row| filter_row(row, filters)).collect()
}

fn filter_row(row: &Row, filters: &[CompiledFilter<'_>]) -> Option<Row> {
    if !filters.iter().all(|f| f.passes(row)) {
        return None;
    }
    if row.is_leaf() {
        return Some(row.clone());
    }
    let children = filter_level(&row.children, filters);
    if children.is_empty() {
        return None;
    }
    Some(Row {
        key: row.key.clone(),
        values: row.values.clone(),
        children,
    })
}

/// Evaluate a single filter against one row, ignoring its children.
pub fn row_passes(row: &Row, filter: &Filter) -> bool {
    CompiledFilter::compile(filter).map_or(true, |f| f.passes(row))
}

// ---------------------------------------------------------------------------
// Leaves
// ---------------------------------------------------------------------------

/// Leaf rows in depth-first order.
pub fn leaf_rows(rows: &[Row]) -> Vec<&Row> {
    let mut leaves = Vec::new();
    let mut stack: Vec<&Row> = rows.iter().rev().collect();
    while let Some(row) = stack.pop() {
        if row.is_leaf() {
            leaves.push(row);
        } else {
            stack.extend(row.children.iter().rev());
        }
    }
    leaves
}

/// The `field` value of every leaf row that carries it; the node set of a
/// view whose nodes are keyed by `field`.
pub fn leaf_ids(rows: &[Row], field: &str) -> BTreeSet<NodeId> {
    leaf_rows(rows)
        .into_iter()
        .filter_map(|row| row.key.get(field).cloned())
        .collect()
}

// ---------------------------------------------------------------------------
// filter_edges_to_nodes
// ---------------------------------------------------------------------------

/// Keep only edges whose resolved endpoints are both in `valid_ids`.
///
/// Must run after anything that shrinks the node set and before edges reach
/// the layout layer, which cannot cope with a dangling endpoint.
pub fn filter_edges_to_nodes<I, S>(edges: &[Edge], valid_ids: I) -> Vec<Edge>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let valid: HashSet<String> = valid_ids
        .into_iter()
        .map(|id| id.as_ref().to_string())
        .collect();
    edges
        .iter()
        .filter(|edge| {
            edge.endpoints()
                .is_some_and(|(u, v)| valid.contains(u) && valid.contains(v))
        })
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
