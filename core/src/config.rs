use crate::types::SurfaceType;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_DESTROY_CAUSE: &str = "Seasonal snapshot switch";

/// Tunables for capture and restore. Loaded from JSON; every field is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ControllerConfig {
    /// Cause string handed to the host with every destroy request.
    pub destroy_cause: String,
    /// Surface type restored objects are placed on.
    pub surface_type: SurfaceType,
    /// Echo one "Error spawning" line per failed restore item.
    pub report_spawn_errors: bool,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            destroy_cause:       DEFAULT_DESTROY_CAUSE.to_string(),
            surface_type:        SurfaceType::World,
            report_spawn_errors: true,
        }
    }
}

impl ControllerConfig {
    /// Load from a JSON file. In tests, use ControllerConfig::default().
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Cannot read {}", path.display()))?;
        Self::from_json(&content).with_context(|| format!("Cannot parse {}", path.display()))
    }

    pub fn from_json(content: &str) -> anyhow::Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}
