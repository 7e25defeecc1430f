//! Configuration file discovery for the Athena CLI
//!
//! An explicit `--config` path wins; otherwise `./athena.toml` if present,
//! then `~/.athena/athena.toml`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use athena::AthenaConfig;

pub const FILE_NAME: &str = "athena.toml";

/// Get the path to the per-user config file
pub fn user_config_path() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".athena")
        .join(FILE_NAME)
}

/// File to load settings from, if any
pub fn resolve_path(explicit: Option<&Path>, work_dir: &Path) -> Option<PathBuf> {
    if let Some(path) = explicit {
        return Some(path.to_path_buf());
    }
    [work_dir.join(FILE_NAME), user_config_path()]
        .into_iter()
        .find(|path| path.exists())
}

/// Load configuration: defaults, then the resolved file, then `ATHENA_*`
/// environment variables.
pub fn load(explicit: Option<&Path>) -> Result<(AthenaConfig, Option<PathBuf>)> {
    let work_dir = std::env::current_dir().unwrap_or_default();
    let path = resolve_path(explicit, &work_dir);
    let config = AthenaConfig::load(path.as_deref()).context("Failed to load configuration")?;
    Ok((config, path))
}

/// Effective configuration as TOML
pub fn render(config: &AthenaConfig) -> Result<String> {
    Ok(toml::to_string_pretty(config)?)
}
