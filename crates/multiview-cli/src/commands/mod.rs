pub mod check;
pub mod config;
pub mod enhance;
pub mod run;

use std::path::Path;

use anyhow::{Context, Result};
use multiview_core::pipeline::config::PipelineConfig;

/// Load a TOML config file, or the defaults when none is given.
pub fn load_config(path: Option<&Path>) -> Result<PipelineConfig> {
    let Some(path) = path else {
        return Ok(PipelineConfig::default());
    };
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let config: PipelineConfig = toml::from_str(&contents).context("Invalid pipeline config")?;
    config.validate()?;
    Ok(config)
}
