//! 推理能力接口 - 图片描述 / 文字识别 / 安全检测
//!
//! 模型本身不在本 crate 内：每种能力是一个 trait，编排器只依赖 trait，
//! 具体实现（HTTP 推理服务、空实现、测试 mock）可替换。

use std::sync::Arc;
use std::time::Duration;

use serde::Deserialize;

use crate::core::frame::Frame;
use crate::core::tagging::Detection;

pub mod error;
pub mod http;
pub mod mock;
pub mod noop;

pub use error::InferenceError;
pub use http::HttpInference;
pub use mock::MockInference;
pub use noop::NoOpInference;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:8765";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Natural-language description of a frame.
pub trait Captioner: Send + Sync {
    fn caption(&self, frame: &Frame) -> Result<String, InferenceError>;
}

/// Text rendered in a frame, one fragment per detected line in reading order.
pub trait TextExtractor: Send + Sync {
    fn extract_text(&self, frame: &Frame) -> Result<Vec<String>, InferenceError>;
}

/// Raw per-region scores from a sensitive-content detector.
pub trait SafetyClassifier: Send + Sync {
    fn classify(&self, frame: &Frame) -> Result<Vec<Detection>, InferenceError>;
}

/// Hardware hint forwarded to the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Device {
    #[default]
    Auto,
    Cpu,
    Gpu,
}

impl Device {
    pub fn as_str(&self) -> &'static str {
        match self {
            Device::Auto => "auto",
            Device::Cpu => "cpu",
            Device::Gpu => "gpu",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum BackendConfig {
    Http { base_url: String },
    None,
}

impl Default for BackendConfig {
    fn default() -> Self {
        BackendConfig::Http {
            base_url: DEFAULT_BASE_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct InferenceConfig {
    pub backend: BackendConfig,
    pub device: Device,
    /// Run caption, OCR and safety detection concurrently.
    pub parallel: bool,
    /// Deadline for the whole inference stage; 0 disables it.
    pub timeout_secs: u64,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            backend: BackendConfig::default(),
            device: Device::default(),
            parallel: true,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl InferenceConfig {
    pub fn timeout(&self) -> Option<Duration> {
        (self.timeout_secs > 0).then(|| Duration::from_secs(self.timeout_secs))
    }
}

/// The three capabilities the orchestrator calls, shareable with a worker thread.
#[derive(Clone)]
pub struct Collaborators {
    pub captioner: Arc<dyn Captioner>,
    pub text_extractor: Arc<dyn TextExtractor>,
    pub safety_classifier: Arc<dyn SafetyClassifier>,
}

impl Collaborators {
    pub fn new(
        captioner: Arc<dyn Captioner>,
        text_extractor: Arc<dyn TextExtractor>,
        safety_classifier: Arc<dyn SafetyClassifier>,
    ) -> Self {
        Self {
            captioner,
            text_extractor,
            safety_classifier,
        }
    }

    /// One backend serving all three capabilities.
    pub fn from_backend<B>(backend: B) -> Self
    where
        B: Captioner + TextExtractor + SafetyClassifier + 'static,
    {
        Self::from_shared(Arc::new(backend))
    }

    pub fn from_shared<B>(backend: Arc<B>) -> Self
    where
        B: Captioner + TextExtractor + SafetyClassifier + 'static,
    {
        Self {
            captioner: backend.clone(),
            text_extractor: backend.clone(),
            safety_classifier: backend,
        }
    }

    pub fn from_config(config: &InferenceConfig) -> Result<Self, InferenceError> {
        match &config.backend {
            BackendConfig::Http { base_url } => Ok(Self::from_backend(HttpInference::new(
                base_url,
                config.device,
                config.timeout(),
            )?)),
            BackendConfig::None => Ok(Self::from_backend(NoOpInference::new())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_inference_config() {
        let config = InferenceConfig::default();
        assert!(config.parallel);
        assert_eq!(config.timeout(), Some(Duration::from_secs(30)));
        assert_eq!(
            config.backend,
            BackendConfig::Http {
                base_url: "http://127.0.0.1:8765".to_string()
            }
        );
    }

    #[test]
    fn test_zero_timeout_disables_deadline() {
        let config = InferenceConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert_eq!(config.timeout(), None);
    }

    #[test]
    fn test_from_config_builds_noop_backend() {
        let config = InferenceConfig {
            backend: BackendConfig::None,
            ..Default::default()
        };
        let collaborators = Collaborators::from_config(&config).unwrap();
        let frame = Frame::new(1, 1, vec![0u8; 4], 0, 0);

        assert_eq!(collaborators.captioner.caption(&frame).unwrap(), "");
        assert!(collaborators.text_extractor.extract_text(&frame).unwrap().is_empty());
        assert!(collaborators.safety_classifier.classify(&frame).unwrap().is_empty());
    }

    #[test]
    fn test_from_shared_uses_one_backend() {
        let mock = Arc::new(MockInference::new().with_caption("a cat"));
        let collaborators = Collaborators::from_shared(mock.clone());
        let frame = Frame::new(1, 1, vec![0u8; 4], 0, 0);

        collaborators.captioner.caption(&frame).unwrap();
        collaborators.safety_classifier.classify(&frame).unwrap();
        assert_eq!(mock.call_count(), 2);
    }
}
