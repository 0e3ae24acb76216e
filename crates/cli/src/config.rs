use anyhow::{Context, Result};
use quarry_common::AppConfig;
use std::env;
use std::path::{Path, PathBuf};

/// Environment variable naming the config file when `--config` is absent.
pub const CONFIG_ENV: &str = "QUARRY_CONFIG";

/// Locate the config file: `--config`, then `$QUARRY_CONFIG`, then
/// `~/.quarry/config.yaml` when it exists.
///
/// An explicitly named file is returned even if it is missing so that loading
/// reports it; the home default is only used when present.
pub fn resolve_path(arg: Option<&str>) -> Option<PathBuf> {
    if let Some(path) = arg {
        return Some(PathBuf::from(path));
    }
    if let Ok(path) = env::var(CONFIG_ENV) {
        if !path.trim().is_empty() {
            return Some(PathBuf::from(path));
        }
    }
    default_path().filter(|p| p.exists())
}

fn default_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".quarry").join("config.yaml"))
}

/// Load the application config; `QUARRY_*` variables override file values.
pub fn load(arg: Option<&str>) -> Result<AppConfig> {
    let path = resolve_path(arg);
    let path_str = path.as_deref().map(path_to_str).transpose()?;

    tracing::debug!(path = ?path, "Loading configuration");
    AppConfig::from_file(path_str).with_context(|| match &path {
        Some(p) => format!("Failed to load config from {}", p.display()),
        None => "Failed to load config from environment".to_string(),
    })
}

fn path_to_str(path: &Path) -> Result<&str> {
    path.to_str()
        .with_context(|| format!("Config path is not valid UTF-8: {}", path.display()))
}
