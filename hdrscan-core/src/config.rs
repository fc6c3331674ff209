//! Configuration loading from hdrscan.toml.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Main configuration structure for hdrscan.toml.
#[derive(Debug, Deserialize, Default)]
pub struct HdrscanConfig {
    /// Minimum doc-coverage percentage for the gate (default: 80).
    pub min: Option<f64>,
    /// Header roots relative to the analyzed root.
    pub headers: Option<Vec<String>>,
    /// Test-source roots relative to the analyzed root.
    pub tests: Option<Vec<String>>,
    /// Extra directory names to prune while scanning.
    pub exclude: Option<Vec<String>>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "plain", "json" or "markdown".
    pub format: Option<String>,
}

/// Loads configuration from hdrscan.toml if it exists.
pub fn load_config(root: &Path) -> Result<Option<HdrscanConfig>> {
    let path = root.join("hdrscan.toml");
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let cfg = toml::from_str(&content).context("Invalid hdrscan.toml")?;
    Ok(Some(cfg))
}
