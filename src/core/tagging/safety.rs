use std::collections::HashSet;

use serde::Deserialize;

/// Detector categories that mark a frame as explicit.
pub const DEFAULT_UNSAFE_CATEGORIES: [&str; 4] = [
    "FEMALE_GENITALIA_EXPOSED",
    "MALE_GENITALIA_EXPOSED",
    "ANUS_EXPOSED",
    "FEMALE_BREAST_EXPOSED",
];

/// Scores must be strictly above this to count.
pub const DEFAULT_SAFETY_THRESHOLD: f64 = 0.6;

/// One region reported by the safety classifier.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Detection {
    #[serde(alias = "class")]
    pub category: String,
    pub score: f64,
}

impl Detection {
    pub fn new(category: impl Into<String>, score: f64) -> Self {
        Self {
            category: category.into(),
            score,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SafetyConfig {
    pub threshold: f64,
    pub categories: Vec<String>,
}

impl Default for SafetyConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_SAFETY_THRESHOLD,
            categories: DEFAULT_UNSAFE_CATEGORIES
                .iter()
                .map(|c| c.to_string())
                .collect(),
        }
    }
}

/// Reduces raw classifier output to a single verdict.
#[derive(Debug, Clone)]
pub struct SafetyPolicy {
    categories: HashSet<String>,
    threshold: f64,
}

impl SafetyPolicy {
    pub fn new() -> Self {
        Self::with_config(&SafetyConfig::default())
    }

    pub fn with_config(config: &SafetyConfig) -> Self {
        Self {
            categories: config.categories.iter().cloned().collect(),
            threshold: config.threshold,
        }
    }

    pub fn decide(&self, detections: &[Detection]) -> bool {
        detections
            .iter()
            .any(|d| self.categories.contains(&d.category) && d.score > self.threshold)
    }
}

impl Default for SafetyPolicy {
    fn default() -> Self {
        Self::new()
    }
}
