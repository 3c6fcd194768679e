//! Configuration loading from fragex.toml.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::{fs, path::Path};

/// Main configuration structure for fragex.toml.
#[derive(Debug, Deserialize, Default)]
pub struct FragexConfig {
    /// Whether to log every per-statement keep/drop decision.
    pub trace_statements: Option<bool>,
    /// Output configuration.
    pub output: Option<OutputConfig>,
}

/// Output format configuration.
#[derive(Debug, Deserialize, Default)]
pub struct OutputConfig {
    /// Output format: "plain" or "json".
    pub format: Option<String>,
}

/// Loads configuration from fragex.toml if it exists.
pub fn load_config(root: &Path) -> Result<Option<FragexConfig>> {
    let path = root.join("fragex.toml");
    if !path.exists() {
        return Ok(None);
    }

    let content = fs::read_to_string(&path)?;
    let cfg = toml::from_str(&content).context("Invalid fragex.toml")?;
    Ok(Some(cfg))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let cfg: FragexConfig = toml::from_str(
            "trace_statements = true\n[output]\nformat = \"json\"\n",
        )
        .unwrap();
        assert_eq!(cfg.trace_statements, Some(true));
        assert_eq!(cfg.output.unwrap().format.as_deref(), Some("json"));
    }

    #[test]
    fn test_missing_config_is_none() {
        let loaded = load_config(Path::new("/nonexistent/fragex/dir")).unwrap();
        assert!(loaded.is_none());
    }
}
