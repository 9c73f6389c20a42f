//! CLI command implementations

pub mod draw;
pub mod pick;

use anyhow::{Context, Result};
use quill_tool::ToolConfig;
use std::path::Path;

/// Tool settings from `path`, or the defaults when the file does not exist
pub(crate) fn load_config(path: &str) -> Result<ToolConfig> {
    ToolConfig::load(Path::new(path)).with_context(|| format!("Failed to load tool config {path}"))
}
