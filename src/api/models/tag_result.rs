use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};

use crate::core::TagOutcome;

/// Wire shape of one tagging run. `success` is the only discriminator:
///
/// ```json
/// {"success": true, "tags": ["cat"], "caption": "a cat", "ocr_text": "", "is_nsfw": false}
/// {"success": false, "error": "Failed to decode frame: ..."}
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "RawTagResult")]
pub enum TagResult {
    Success(TagOutcome),
    Failure { error: String },
}

impl TagResult {
    pub fn failure(error: impl Into<String>) -> Self {
        TagResult::Failure {
            error: error.into(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|e| {
            format!(
                r#"{{"success":false,"error":{}}}"#,
                serde_json::Value::from(e.to_string())
            )
        })
    }
}

impl From<TagOutcome> for TagResult {
    fn from(outcome: TagOutcome) -> Self {
        TagResult::Success(outcome)
    }
}

impl Serialize for TagResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            TagResult::Success(outcome) => {
                let mut map = serializer.serialize_map(Some(5))?;
                map.serialize_entry("success", &true)?;
                map.serialize_entry("tags", &outcome.tags)?;
                map.serialize_entry("caption", &outcome.caption)?;
                map.serialize_entry("ocr_text", &outcome.ocr_text)?;
                map.serialize_entry("is_nsfw", &outcome.is_nsfw)?;
                map.end()
            }
            TagResult::Failure { error } => {
                let mut map = serializer.serialize_map(Some(2))?;
                map.serialize_entry("success", &false)?;
                map.serialize_entry("error", error)?;
                map.end()
            }
        }
    }
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct RawTagResult {
    success: bool,
    tags: Option<Vec<String>>,
    caption: Option<String>,
    ocr_text: Option<String>,
    is_nsfw: Option<bool>,
    error: Option<String>,
}

impl TryFrom<RawTagResult> for TagResult {
    type Error = String;

    fn try_from(raw: RawTagResult) -> Result<Self, Self::Error> {
        match raw {
            RawTagResult {
                success: true,
                tags: Some(tags),
                caption: Some(caption),
                ocr_text: Some(ocr_text),
                is_nsfw: Some(is_nsfw),
                error: None,
            } => Ok(TagResult::Success(TagOutcome {
                tags,
                caption,
                ocr_text,
                is_nsfw,
            })),
            RawTagResult {
                success: false,
                tags: None,
                caption: None,
                ocr_text: None,
                is_nsfw: None,
                error: Some(error),
            } => Ok(TagResult::Failure { error }),
            RawTagResult { success: true, .. } => Err(
                "success result needs tags, caption, ocr_text and is_nsfw and no error".to_string(),
            ),
            RawTagResult { success: false, .. } => {
                Err("failure result carries only an error message".to_string())
            }
        }
    }
}
