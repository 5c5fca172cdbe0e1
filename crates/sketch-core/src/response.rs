//! Success/error response envelopes with fixed CORS headers.

use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::json;

use crate::types::{HandlerError, ResponseEnvelope};

/// Prefix re-applied to generated images in success bodies
pub const PNG_DATA_URL_PREFIX: &str = "data:image/png;base64,";

/// Headers carried on every envelope
pub fn cors_headers() -> BTreeMap<String, String> {
    [
        ("Content-Type", "application/json"),
        ("Access-Control-Allow-Origin", "*"),
        (
            "Access-Control-Allow-Headers",
            "Content-Type,x-api-key,Authorization",
        ),
        ("Access-Control-Allow-Methods", "POST,OPTIONS"),
    ]
    .into_iter()
    .map(|(name, value)| (name.to_string(), value.to_string()))
    .collect()
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SuccessData<'a> {
    prompt: &'a str,
    image_base64: String,
    s3_url: Option<&'a str>,
    style: &'a str,
}

/// 200 envelope for a generated image
pub fn success_response(
    prompt: &str,
    image_base64: &str,
    s3_url: Option<&str>,
    style: &str,
) -> ResponseEnvelope {
    let data = SuccessData {
        prompt,
        image_base64: format!("{}{}", PNG_DATA_URL_PREFIX, image_base64),
        s3_url,
        style,
    };
    let body = json!({ "success": true, "data": data });

    ResponseEnvelope {
        status_code: 200,
        headers: cors_headers(),
        body: body.to_string(),
    }
}

/// Error envelope with an explicit status
pub fn error_response(message: &str, status_code: u16) -> ResponseEnvelope {
    ResponseEnvelope {
        status_code,
        headers: cors_headers(),
        body: json!({ "success": false, "error": message }).to_string(),
    }
}

impl From<&HandlerError> for ResponseEnvelope {
    fn from(err: &HandlerError) -> Self {
        error_response(&err.to_string(), err.status_code())
    }
}
