use super::{Captioner, InferenceError, SafetyClassifier, TextExtractor};
use crate::core::frame::Frame;
use crate::core::tagging::Detection;

/// No-op backend: empty caption, no text, nothing unsafe - for opt-out or offline runs
pub struct NoOpInference;

impl NoOpInference {
    pub fn new() -> Self {
        Self
    }
}

impl Default for NoOpInference {
    fn default() -> Self {
        Self::new()
    }
}

impl Captioner for NoOpInference {
    fn caption(&self, _frame: &Frame) -> Result<String, InferenceError> {
        Ok(String::new())
    }
}

impl TextExtractor for NoOpInference {
    fn extract_text(&self, _frame: &Frame) -> Result<Vec<String>, InferenceError> {
        Ok(vec![])
    }
}

impl SafetyClassifier for NoOpInference {
    fn classify(&self, _frame: &Frame) -> Result<Vec<Detection>, InferenceError> {
        Ok(vec![]) // Always safe
    }
}
