use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use super::{Captioner, InferenceError, SafetyClassifier, TextExtractor};
use crate::core::frame::Frame;
use crate::core::tagging::Detection;

/// Deterministic stand-in for the model backend.
pub struct MockInference {
    caption: Result<String, String>,
    lines: Result<Vec<String>, String>,
    detections: Result<Vec<Detection>, String>,
    latency: Duration,
    calls: AtomicUsize,
}

impl MockInference {
    pub fn new() -> Self {
        Self {
            caption: Ok(String::new()),
            lines: Ok(vec![]),
            detections: Ok(vec![]),
            latency: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn with_caption(mut self, caption: impl Into<String>) -> Self {
        self.caption = Ok(caption.into());
        self
    }

    pub fn with_text_lines<I, S>(mut self, lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.lines = Ok(lines.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_detections(mut self, detections: Vec<Detection>) -> Self {
        self.detections = Ok(detections);
        self
    }

    pub fn failing_caption(mut self, message: impl Into<String>) -> Self {
        self.caption = Err(message.into());
        self
    }

    pub fn failing_text(mut self, message: impl Into<String>) -> Self {
        self.lines = Err(message.into());
        self
    }

    pub fn failing_safety(mut self, message: impl Into<String>) -> Self {
        self.detections = Err(message.into());
        self
    }

    /// Every call sleeps this long before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }

    /// Total calls across all three capabilities.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn respond<T: Clone>(&self, value: &Result<T, String>) -> Result<T, InferenceError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.latency.is_zero() {
            thread::sleep(self.latency);
        }
        value.clone().map_err(InferenceError::Backend)
    }
}

impl Default for MockInference {
    fn default() -> Self {
        Self::new()
    }
}

impl Captioner for MockInference {
    fn caption(&self, _frame: &Frame) -> Result<String, InferenceError> {
        self.respond(&self.caption)
    }
}

impl TextExtractor for MockInference {
    fn extract_text(&self, _frame: &Frame) -> Result<Vec<String>, InferenceError> {
        self.respond(&self.lines)
    }
}

impl SafetyClassifier for MockInference {
    fn classify(&self, _frame: &Frame) -> Result<Vec<Detection>, InferenceError> {
        self.respond(&self.detections)
    }
}
