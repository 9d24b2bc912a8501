use std::time::Duration;

use log::debug;
use reqwest::blocking::Client;
use reqwest::header::CONTENT_TYPE;
use serde::de::DeserializeOwned;
use serde::Deserialize;

use super::{Captioner, Device, InferenceError, SafetyClassifier, TextExtractor};
use crate::core::frame::Frame;
use crate::core::tagging::Detection;

const CAPTION_ENDPOINT: &str = "caption";
const OCR_ENDPOINT: &str = "ocr";
const SAFETY_ENDPOINT: &str = "nsfw";

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Deserialize)]
struct CaptionResponse {
    caption: String,
}

#[derive(Debug, Deserialize)]
struct OcrResponse {
    #[serde(default)]
    lines: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SafetyResponse {
    #[serde(default)]
    detections: Vec<Detection>,
}

/// Client for an inference server hosting the caption, OCR and nudity models.
///
/// Each capability is one `POST {base_url}/{endpoint}?device=..` with the frame as a PNG body.
pub struct HttpInference {
    client: Client,
    base_url: String,
    device: Device,
}

impl HttpInference {
    pub fn new(
        base_url: &str,
        device: Device,
        timeout: Option<Duration>,
    ) -> Result<Self, InferenceError> {
        // None lifts the blocking client's built-in 30s limit
        let client = Client::builder()
            .user_agent(concat!("gif-tagger/", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            device,
        })
    }

    fn endpoint_url(&self, endpoint: &str) -> String {
        format!("{}/{}?device={}", self.base_url, endpoint, self.device.as_str())
    }

    fn post_frame(&self, endpoint: &str, frame: &Frame) -> Result<String, InferenceError> {
        let body = frame.to_png()?;
        let url = self.endpoint_url(endpoint);
        debug!("POST {} ({} bytes)", url, body.len());

        let resp = self
            .client
            .post(&url)
            .header(CONTENT_TYPE, "image/png")
            .body(body)
            .send()
            .map_err(|e| transport_error(endpoint, e))?;

        let status = resp.status();
        let text = resp.text().map_err(|e| transport_error(endpoint, e))?;
        if !status.is_success() {
            // the server may still explain itself
            if let Ok(ErrorResponse { error }) = serde_json::from_str(&text) {
                return Err(InferenceError::Backend(format!("{}: {}", endpoint, error)));
            }
            return Err(InferenceError::Status {
                endpoint: endpoint.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(text)
    }
}

fn transport_error(endpoint: &str, e: reqwest::Error) -> InferenceError {
    if e.is_timeout() {
        InferenceError::Timeout(endpoint.to_string())
    } else {
        InferenceError::Http(e)
    }
}

fn parse_response<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<T, InferenceError> {
    if let Ok(ErrorResponse { error }) = serde_json::from_str(body) {
        return Err(InferenceError::Backend(format!("{}: {}", endpoint, error)));
    }

    serde_json::from_str(body).map_err(|source| InferenceError::MalformedResponse {
        endpoint: endpoint.to_string(),
        source,
    })
}

fn parse_caption(body: &str) -> Result<String, InferenceError> {
    parse_response::<CaptionResponse>(CAPTION_ENDPOINT, body).map(|r| r.caption)
}

fn parse_ocr(body: &str) -> Result<Vec<String>, InferenceError> {
    parse_response::<OcrResponse>(OCR_ENDPOINT, body).map(|r| r.lines)
}

fn parse_detections(body: &str) -> Result<Vec<Detection>, InferenceError> {
    parse_response::<SafetyResponse>(SAFETY_ENDPOINT, body).map(|r| r.detections)
}

impl Captioner for HttpInference {
    fn caption(&self, frame: &Frame) -> Result<String, InferenceError> {
        parse_caption(&self.post_frame(CAPTION_ENDPOINT, frame)?)
    }
}

impl TextExtractor for HttpInference {
    fn extract_text(&self, frame: &Frame) -> Result<Vec<String>, InferenceError> {
        parse_ocr(&self.post_frame(OCR_ENDPOINT, frame)?)
    }
}

impl SafetyClassifier for HttpInference {
    fn classify(&self, frame: &Frame) -> Result<Vec<Detection>, InferenceError> {
        parse_detections(&self.post_frame(SAFETY_ENDPOINT, frame)?)
    }
}
