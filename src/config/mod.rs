//! Configuration loading.
//!
//! Sources, lowest priority first: built-in defaults, a YAML file, the
//! `PIVOTGRAPH_*` environment variables. CLI flags are applied by the caller.

pub mod schema;

use std::path::{Path, PathBuf};

use directories::ProjectDirs;

use crate::error::{PivotGraphError, Result};

pub use schema::ExplorerConfig;

/// File name looked up inside the platform config directory.
pub const CONFIG_FILE_NAME: &str = "config.yaml";

/// `<platform config dir>/pivotgraph/config.yaml`, if a home directory exists.
pub fn default_config_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "pivotgraph").map(|dirs| dirs.config_dir().join(CONFIG_FILE_NAME))
}

/// Load and normalize a YAML config file. Environment overrides are not
/// applied here.
pub fn load_config(path: &Path) -> Result<ExplorerConfig> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        PivotGraphError::Config(format!("cannot read {}: {e}", path.display()))
    })?;
    let config: ExplorerConfig = serde_yaml::from_str(&text)?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(config.normalized())
}

/// Load the config from `path` or, when `None`, from the default location,
/// falling back to built-in defaults if that file does not exist. Environment
/// overrides are applied last.
pub fn load(path: Option<&Path>) -> Result<ExplorerConfig> {
    let mut config = match path {
        Some(path) => load_config(path)?,
        None => match default_config_path() {
            Some(default) if default.is_file() => load_config(&default)?,
            _ => ExplorerConfig::default(),
        },
    };
    config.apply_env_overrides();
    Ok(config.normalized())
}
