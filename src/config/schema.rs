//! Configuration data structures for pivotgraph.
//!
//! Defines the YAML config format: chain-search depth, fan-out depth, blob
//! padding and hit radius, and the display limit. Every field has a default,
//! so an empty file is a valid config.

use serde::{Deserialize, Serialize};

use crate::geometry::SINGLETON_HIT_RADIUS;

/// Environment variable overriding [`ChainConfig::max_hops`].
pub const ENV_CHAIN_DEPTH: &str = "PIVOTGRAPH_CHAIN_DEPTH";
/// Environment variable overriding [`FanOutConfig::depth`].
pub const ENV_FAN_OUT_DEPTH: &str = "PIVOTGRAPH_FAN_OUT_DEPTH";

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

/// Root configuration for pivotgraph.
///
/// Loaded from a YAML file, then environment variables, then CLI flags.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExplorerConfig {
    /// Config format version (currently "1.0").
    #[serde(default = "default_version")]
    pub version: String,

    #[serde(default)]
    pub chain: ChainConfig,

    #[serde(default)]
    pub fan_out: FanOutConfig,

    #[serde(default)]
    pub blobs: BlobConfig,

    #[serde(default)]
    pub display: DisplayConfig,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        Self {
            version: default_version(),
            chain: ChainConfig::default(),
            fan_out: FanOutConfig::default(),
            blobs: BlobConfig::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl ExplorerConfig {
    /// Apply overrides from a variable lookup (normally the process
    /// environment). Values that do not parse are ignored.
    pub fn apply_overrides_from(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(depth) = lookup(ENV_CHAIN_DEPTH).and_then(|v| v.trim().parse().ok()) {
            self.chain.max_hops = depth;
        }
        if let Some(depth) = lookup(ENV_FAN_OUT_DEPTH).and_then(|v| v.trim().parse().ok()) {
            self.fan_out.depth = depth;
        }
    }

    /// Apply overrides from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides_from(|name| std::env::var(name).ok());
    }

    /// Clamp every knob into its usable range.
    pub fn normalized(mut self) -> Self {
        self.chain.max_hops = self.chain.max_hops.max(1);
        self.fan_out.depth = self.fan_out.depth.max(1);
        if !(self.blobs.padding.is_finite() && self.blobs.padding >= 0.0) {
            self.blobs.padding = default_padding();
        }
        if !(self.blobs.singleton_radius.is_finite() && self.blobs.singleton_radius > 0.0) {
            self.blobs.singleton_radius = SINGLETON_HIT_RADIUS;
        }
        self.display.max_nodes = self.display.max_nodes.max(1);
        self
    }
}

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// Multi-selection chain search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChainConfig {
    /// Longest path (in hops) that may connect two selected nodes.
    #[serde(default = "default_max_hops")]
    pub max_hops: u32,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            max_hops: default_max_hops(),
        }
    }
}

/// Single-selection neighbourhood.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FanOutConfig {
    #[serde(default = "default_fan_out_depth")]
    pub depth: u32,
}

impl Default for FanOutConfig {
    fn default() -> Self {
        Self {
            depth: default_fan_out_depth(),
        }
    }
}

/// Blob outline and hit-testing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlobConfig {
    /// Outward padding applied to cluster hulls, in layout units.
    #[serde(default = "default_padding")]
    pub padding: f64,

    /// Hit radius for 1- and 2-point clusters.
    #[serde(default = "default_singleton_radius")]
    pub singleton_radius: f64,
}

impl Default for BlobConfig {
    fn default() -> Self {
        Self {
            padding: default_padding(),
            singleton_radius: default_singleton_radius(),
        }
    }
}

/// Display limits enforced by the host application.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Hard cap on rendered nodes.
    #[serde(default = "default_max_nodes")]
    pub max_nodes: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            max_nodes: default_max_nodes(),
        }
    }
}

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

fn default_version() -> String {
    "1.0".to_string()
}

fn default_max_hops() -> u32 {
    4
}

fn default_fan_out_depth() -> u32 {
    2
}

fn default_padding() -> f64 {
    24.0
}

fn default_singleton_radius() -> f64 {
    SINGLETON_HIT_RADIUS
}

fn default_max_nodes() -> usize {
    300
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
