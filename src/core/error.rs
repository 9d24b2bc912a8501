use std::time::Duration;

use thiserror::Error;

use crate::core::config::ConfigError;
use crate::core::frame::FrameError;
use crate::core::inference::InferenceError;

#[derive(Debug, Error)]
pub enum TaggerError {
    #[error("Failed to decode frame: {0}")]
    Decode(#[from] FrameError),
    #[error("Inference failed: {0}")]
    Inference(#[from] InferenceError),
    #[error("Inference timed out after {}ms", .0.as_millis())]
    Timeout(Duration),
    #[error("Invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl TaggerError {
    pub fn kind(&self) -> &'static str {
        match self {
            TaggerError::Decode(_) => "DecodeError",
            TaggerError::Inference(InferenceError::Timeout(_)) | TaggerError::Timeout(_) => {
                "TimeoutError"
            }
            TaggerError::Inference(_) => "InferenceError",
            TaggerError::Config(_) => "ConfigError",
            TaggerError::Io(_) => "IoError",
        }
    }
}
