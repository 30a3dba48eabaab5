//! Engine configuration: one TOML document covering every component.
//!
//! Every section and field is optional; missing values take the component
//! defaults. The run id is a content hash of the resolved config, so two
//! runs with the same id used the same parameters.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use edgelab_core::config::ConfigError;

use crate::overfit::OverfitConfig;
use crate::pipeline::PipelineConfig;
use crate::walk_forward::{ParamGrid, WalkForwardConfig};

/// Deterministic hash identifying a resolved config.
pub type RunId = String;

#[derive(Debug, Error)]
pub enum ConfigLoadError {
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("TOML serialize error: {0}")]
    Serialize(#[from] toml::ser::Error),
    #[error("JSON serialize error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] ConfigError),
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub pipeline: PipelineConfig,
    pub walk_forward: WalkForwardConfig,
    pub grid: ParamGrid,
    pub overfit: OverfitConfig,
}

impl EngineConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigLoadError> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigLoadError> {
        Ok(toml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.pipeline.validate()?;
        self.walk_forward.validate()?;
        self.grid.validate()?;
        self.overfit.validate()?;
        Ok(())
    }

    /// BLAKE3 hex digest of the canonical JSON form.
    pub fn run_id(&self) -> Result<RunId, ConfigLoadError> {
        let json = serde_json::to_string(self)?;
        let hash = blake3::hash(json.as_bytes());
        Ok(format!("{}", hash.to_hex()))
    }
}
