use crate::config::ClearedSamplePolicy;
use anyhow::{Context, Result, ensure};
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

fn default_threshold() -> f64 {
    0.001
}

/// Host-facing settings for building estimators and judging observations.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct DetectorConfig {
    #[serde(default = "default_threshold")]
    #[schemars(
        title = "Threshold",
        description = "Density floor; observations whose density falls below it are anomalous."
    )]
    pub threshold: f64,

    #[serde(default)]
    #[schemars(
        title = "Cleared sample policy",
        description = "Whether expanding a cleared sample fails (reject) or starts over (replace)."
    )]
    pub cleared_sample_policy: ClearedSamplePolicy,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            cleared_sample_policy: ClearedSamplePolicy::default(),
        }
    }
}

impl DetectorConfig {
    /// JSON Schema of the configuration document.
    pub fn schema() -> Schema {
        schema_for!(DetectorConfig)
    }

    pub fn validate(&self) -> Result<()> {
        ensure!(
            self.threshold.is_finite() && self.threshold >= 0.0,
            "threshold must be a finite, non-negative density, got {}",
            self.threshold
        );
        Ok(())
    }

    pub fn from_json_str(s: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(s).context("malformed detector config")?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path)
            .with_context(|| format!("reading detector config {}", path.display()))?;
        Self::from_json_str(&raw).with_context(|| format!("loading {}", path.display()))
    }
}
