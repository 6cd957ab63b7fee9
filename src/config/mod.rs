mod types;

pub use types::*;

use anyhow::{Context, Result};
use serve_videos_common::Error;
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file
pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {:?}", path))?;

    let config: Config = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {:?}", path))?;

    validate_config(&config)?;

    Ok(config)
}

/// Load config from default locations or return default config
pub fn load_config_or_default(custom_path: Option<&Path>) -> Result<Config> {
    if let Some(path) = custom_path {
        return load_config(path);
    }

    let default_paths = ["./serve-videos.toml", "~/.config/serve-videos/config.toml"];

    for path_str in default_paths {
        let path = shellexpand::tilde(path_str);
        let path = Path::new(path.as_ref());
        if path.exists() {
            return load_config(path);
        }
    }

    Ok(Config::default())
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    if config.server.addr.trim().is_empty() {
        anyhow::bail!("Listen address cannot be empty");
    }

    if config.http.read_timeout_secs == 0 {
        anyhow::bail!("http.read_timeout_secs cannot be 0");
    }

    if config.http.write_timeout_secs == 0 {
        anyhow::bail!("http.write_timeout_secs cannot be 0");
    }

    if config.server.extensions.is_empty() {
        tracing::warn!("No extensions configured; nothing will be served");
    }

    if config.server.extensions.iter().any(str::is_empty) {
        // An empty suffix matches every file, including ones that were never
        // meant to be reachable.
        anyhow::bail!("Extensions cannot contain an empty string");
    }

    Ok(())
}

/// Turn the configured root into an absolute path to an existing directory.
pub fn resolve_root(root: &Path) -> serve_videos_common::Result<PathBuf> {
    let root = std::path::absolute(root)
        .map_err(|e| Error::config(format!("root {:?} is unusable: {e}", root)))?;

    let metadata = std::fs::metadata(&root)
        .map_err(|e| Error::config(format!("root {:?} is unusable: {e}", root)))?;

    if !metadata.is_dir() {
        return Err(Error::config(format!("root {:?} is not a directory", root)));
    }

    Ok(root)
}
