use anyhow::Context;
use curvelog_core::EffectScope;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Session behaviour knobs, read from a JSON file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Drop the redo buffer when a new commit is pushed. Disable to keep
    /// undone commits replayable after a divergent edit.
    pub clear_redo_on_push: bool,
    /// Metrics scope a new session starts in.
    pub default_scope: EffectScope,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            clear_redo_on_push: true,
            default_scope: EffectScope::Global,
        }
    }
}

impl SessionConfig {
    /// Read config from `path`. Returns defaults if the file doesn't exist.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config: {}", path.display()))?;
        let config = serde_json::from_str(&content)
            .with_context(|| format!("invalid config: {}", path.display()))?;
        Ok(config)
    }
}
