use std::path::{Path, PathBuf};

use log::info;
use serde::Deserialize;
use thiserror::Error;

use crate::core::frame::FrameConfig;
use crate::core::inference::{BackendConfig, InferenceConfig};
use crate::core::tagging::{SafetyConfig, TagConfig};

/// Environment variable naming a JSON5 config file.
pub const CONFIG_ENV: &str = "GIF_TAGGER_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config: {0}")]
    Parse(#[from] json5::Error),
    #[error("{0}")]
    Invalid(String),
}

/// Everything tunable about a tagging run. Every section falls back to its defaults,
/// so an empty file reproduces the built-in behaviour.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TaggerConfig {
    pub frame: FrameConfig,
    pub tags: TagConfig,
    pub safety: SafetyConfig,
    pub inference: InferenceConfig,
}

impl TaggerConfig {
    pub fn from_json5_str(text: &str) -> Result<Self, ConfigError> {
        let config: TaggerConfig = json5::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        info!("⚙️ Loaded config from {:?}", path);
        Self::from_json5_str(&text)
    }

    /// Reads the file named by `GIF_TAGGER_CONFIG`, or the defaults when unset.
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Self::from_file(PathBuf::from(path)),
            _ => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let tags = &self.tags;
        if tags.max_tags == 0 {
            return Err(ConfigError::Invalid("tags.max_tags must be positive".into()));
        }
        if tags.min_tags > tags.max_tags {
            return Err(ConfigError::Invalid(format!(
                "tags.min_tags ({}) exceeds tags.max_tags ({})",
                tags.min_tags, tags.max_tags
            )));
        }
        if tags.filler.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::Invalid("tags.filler contains an empty tag".into()));
        }
        if !(0.0..=1.0).contains(&self.safety.threshold) {
            return Err(ConfigError::Invalid(format!(
                "safety.threshold {} is outside [0, 1]",
                self.safety.threshold
            )));
        }
        if let BackendConfig::Http { base_url } = &self.inference.backend {
            if base_url.trim().is_empty() {
                return Err(ConfigError::Invalid(
                    "inference.backend.base_url is empty".into(),
                ));
            }
        }
        Ok(())
    }
}
