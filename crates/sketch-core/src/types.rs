//! ============================================================================
//! Core Types for the Sketch Handler
//! ============================================================================
//! Records passed between pipeline stages, plus the handler error taxonomy.
//! Each record is produced by exactly one stage and consumed by the next.
//! ============================================================================

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::Value;

/// Style applied when the request does not name one
pub const DEFAULT_STYLE: &str = "realistic";

/// MIME type assumed for payloads without a data-URL prefix
pub const DEFAULT_MIME_TYPE: &str = "image/png";

/// Normalized `{imageData, style}` request.
/// `image_data` stays a raw JSON value so the decoder can tell
/// "absent" from "empty" from "not a string".
#[derive(Debug, Clone, PartialEq)]
pub struct CanonicalRequest {
    pub image_data: Option<Value>,
    pub style: String,
}

/// Validated image payload with its declared MIME type
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedImage {
    /// Base64 payload with any data-URL prefix removed
    pub data: String,
    /// Always of form `image/<subtype>`
    pub mime_type: String,
}

/// Outcome of one generation call. A missing image is a soft failure:
/// the prompt is still carried for diagnostics.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationResult {
    pub image_base64: Option<String>,
    pub prompt_used: String,
}

impl GenerationResult {
    pub fn success(image_base64: String, prompt_used: String) -> Self {
        Self {
            image_base64: Some(image_base64),
            prompt_used,
        }
    }

    pub fn soft_failure(prompt_used: String) -> Self {
        Self {
            image_base64: None,
            prompt_used,
        }
    }

    /// Generated image, if one with non-empty data was returned
    pub fn image(&self) -> Option<&str> {
        self.image_base64.as_deref().filter(|data| !data.is_empty())
    }
}

/// Result of publishing to object storage. `url` is absent when storage
/// is unconfigured or the upload failed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublishedArtifact {
    pub url: Option<String>,
}

/// Terminal response envelope, one per request
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ResponseEnvelope {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    /// JSON-encoded success or error body
    pub body: String,
}

/// Why a request failed, mapped to an HTTP-style status
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HandlerError {
    #[error("{0}")]
    MalformedRequest(String),

    #[error("No image data provided")]
    EmptyImageData,

    #[error("imageData must be a string")]
    InvalidImageType,

    #[error("imageData is too short")]
    ImageTooShort,

    #[error("Invalid data URL format")]
    InvalidDataUrl,

    #[error("{0} not configured")]
    MissingConfiguration(String),

    #[error("Failed to generate image")]
    GenerationFailed,

    #[error("{0}")]
    Internal(String),
}

impl HandlerError {
    /// HTTP status surfaced with this error
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::MalformedRequest(_)
            | HandlerError::EmptyImageData
            | HandlerError::InvalidImageType
            | HandlerError::ImageTooShort
            | HandlerError::InvalidDataUrl => 400,
            HandlerError::MissingConfiguration(_)
            | HandlerError::GenerationFailed
            | HandlerError::Internal(_) => 500,
        }
    }
}
