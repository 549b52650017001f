//! Core data types shared by the graph, geometry and pivot layers.
//!
//! Edges arrive from a rendering layer that rewrites string endpoints into
//! live node objects after its first layout pass, so an [`Endpoint`] may be
//! either shape. Everything that reads an edge goes through [`id_of`].

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

/// Opaque node identifier.
pub type NodeId = String;

/// A point in layout space.
pub type Point = [f64; 2];

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// One end of an edge: a bare id, or an object that carries an `id` plus
/// whatever state the layout engine attached to it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Endpoint {
    Id(String),
    Node(NodeRef),
    Missing,
}

/// An id-bearing endpoint object. Extra fields (coordinates, velocities,
/// styling) are preserved but never inspected.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeRef {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

impl From<&str> for Endpoint {
    fn from(id: &str) -> Self {
        Endpoint::Id(id.to_string())
    }
}

impl From<String> for Endpoint {
    fn from(id: String) -> Self {
        Endpoint::Id(id)
    }
}

impl From<NodeRef> for Endpoint {
    fn from(node: NodeRef) -> Self {
        Endpoint::Node(node)
    }
}

/// Resolve an endpoint to its node id. Returns `None` for a missing endpoint,
/// an object without an id, or an empty id.
pub fn id_of(endpoint: &Endpoint) -> Option<&str> {
    let id = match endpoint {
        Endpoint::Id(id) => id.as_str(),
        Endpoint::Node(node) => node.id.as_deref()?,
        Endpoint::Missing => return None,
    };
    (!id.is_empty()).then_some(id)
}

// ---------------------------------------------------------------------------
// Edge
// ---------------------------------------------------------------------------

/// A directed edge as handed over by the query layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub source: Endpoint,
    pub target: Endpoint,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,
}

impl Edge {
    pub fn new(source: impl Into<Endpoint>, target: impl Into<Endpoint>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            weight: None,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = Some(weight);
        self
    }

    pub fn source_id(&self) -> Option<&str> {
        id_of(&self.source)
    }

    pub fn target_id(&self) -> Option<&str> {
        id_of(&self.target)
    }

    /// Both endpoint ids, or `None` if either fails to resolve.
    pub fn endpoints(&self) -> Option<(&str, &str)> {
        Some((self.source_id()?, self.target_id()?))
    }

    /// Order-preserving key of this edge, if both endpoints resolve.
    pub fn key(&self) -> Option<EdgeKey> {
        self.endpoints().map(|(u, v)| EdgeKey::new(u, v))
    }
}

// ---------------------------------------------------------------------------
// EdgeKey
// ---------------------------------------------------------------------------

/// Directed pairing of two endpoint ids. Renders as `"source|target"`;
/// `a|b` and `b|a` are distinct keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EdgeKey {
    pub source: NodeId,
    pub target: NodeId,
}

impl EdgeKey {
    pub fn new(source: impl Into<NodeId>, target: impl Into<NodeId>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }
}

impl fmt::Display for EdgeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}|{}", self.source, self.target)
    }
}

impl Serialize for EdgeKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ---------------------------------------------------------------------------
// Row
// ---------------------------------------------------------------------------

/// One aggregated pivot group with its nested subgroups.
///
/// Deserialization goes through [`RawRow`], so `children` is always present
/// here even when the wire format omits it.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawRow")]
pub struct Row {
    pub key: BTreeMap<String, String>,
    pub values: BTreeMap<String, Option<f64>>,
    pub children: Vec<Row>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(mut self, field: &str, value: &str) -> Self {
        self.key.insert(field.to_string(), value.to_string());
        self
    }

    pub fn with_value(mut self, mkey: &str, value: Option<f64>) -> Self {
        self.values.insert(mkey.to_string(), value);
        self
    }

    pub fn with_children(mut self, children: Vec<Row>) -> Self {
        self.children = children;
        self
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

/// Loose wire shape of a row as produced by the aggregation layer.
#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(default)]
    pub key: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub values: serde_json::Map<String, serde_json::Value>,
    #[serde(default)]
    pub children: Option<Vec<RawRow>>,
}

impl From<RawRow> for Row {
    fn from(raw: RawRow) -> Self {
        let key = raw
            .key
            .into_iter()
            .filter_map(|(field, value)| dimension_text(value).map(|text| (field, text)))
            .collect();
        let values = raw
            .values
            .into_iter()
            .map(|(mkey, value)| (mkey, measure_number(&value)))
            .collect();
        let children = raw
            .children
            .unwrap_or_default()
            .into_iter()
            .map(Row::from)
            .collect();
        Row {
            key,
            values,
            children,
        }
    }
}

fn dimension_text(value: serde_json::Value) -> Option<String> {
    use serde_json::Value;
    match value {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(number_text(&n)),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null => None,
        other => Some(other.to_string()),
    }
}

/// Integral floats render without a fraction (`1.0` becomes `"1"`), the
/// way the host spells dimension values in its filters.
fn number_text(n: &serde_json::Number) -> String {
    const EXACT_INT_LIMIT: f64 = 9_007_199_254_740_992.0;
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < EXACT_INT_LIMIT => {
            format!("{}", f as i64)
        }
        _ => n.to_string(),
    }
}

fn measure_number(value: &serde_json::Value) -> Option<f64> {
    use serde_json::Value;
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// How a dimension filter treats its `values` / `pattern`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DimMode {
    #[default]
    Exclude,
    Include,
    Regex,
}

impl DimMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Exclude => "exclude",
            Self::Include => "include",
            Self::Regex => "regex",
        }
    }
}

impl fmt::Display for DimMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single pivot filter. Filter lists are ANDed and order-independent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Filter {
    Dim {
        field: String,
        #[serde(default)]
        mode: DimMode,
        #[serde(default)]
        values: Vec<String>,
        #[serde(default)]
        pattern: String,
    },
    Measure {
        mkey: String,
        expr: String,
    },
}

impl Filter {
    pub fn exclude(field: &str, values: &[&str]) -> Self {
        Self::dim(field, DimMode::Exclude, values, "")
    }

    pub fn include(field: &str, values: &[&str]) -> Self {
        Self::dim(field, DimMode::Include, values, "")
    }

    pub fn regex(field: &str, pattern: &str) -> Self {
        Self::dim(field, DimMode::Regex, &[], pattern)
    }

    pub fn measure(mkey: &str, expr: &str) -> Self {
        Self::Measure {
            mkey: mkey.to_string(),
            expr: expr.to_string(),
        }
    }

    fn dim(field: &str, mode: DimMode, values: &[&str], pattern: &str) -> Self {
        Self::Dim {
            field: field.to_string(),
            mode,
            values: values.iter().map(|v| v.to_string()).collect(),
            pattern: pattern.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
