//! ============================================================================
//! Payload Normalizer - Envelope to Canonical Request
//! ============================================================================
//! Invocations arrive in several dialects:
//! - API Gateway proxy: `{ "body": "<json string>" }` or `{ "body": {...} }`
//! - Direct test invocation: `{ "imageData": "...", "style": "..." }`
//! - Any other object, taken as the body itself
//!
//! The dialect is classified first, then resolved by a single match so the
//! priority (body field > direct field > bare object) is explicit.
//! ============================================================================

use serde_json::{Map, Value};
use tracing::debug;

use crate::types::{CanonicalRequest, HandlerError, DEFAULT_STYLE};

/// Which invocation dialect an envelope belongs to
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EnvelopeShape<'a> {
    /// Object with a `body` field (value of that field)
    BodyField(&'a Value),
    /// Object carrying `imageData` at the top level
    DirectFields(&'a Map<String, Value>),
    /// Any other object
    BareObject(&'a Map<String, Value>),
    /// Not an object at all
    Unsupported,
}

impl<'a> EnvelopeShape<'a> {
    pub fn classify(envelope: &'a Value) -> Self {
        match envelope {
            Value::Object(map) => match map.get("body") {
                Some(body) => EnvelopeShape::BodyField(body),
                None if map.contains_key("imageData") => EnvelopeShape::DirectFields(map),
                None => EnvelopeShape::BareObject(map),
            },
            _ => EnvelopeShape::Unsupported,
        }
    }

    /// Short name for logs
    pub fn label(&self) -> &'static str {
        match self {
            EnvelopeShape::BodyField(_) => "body-field",
            EnvelopeShape::DirectFields(_) => "direct-fields",
            EnvelopeShape::BareObject(_) => "bare-object",
            EnvelopeShape::Unsupported => "unsupported",
        }
    }
}

/// Resolve an envelope into a canonical request
pub fn normalize(envelope: &Value) -> Result<CanonicalRequest, HandlerError> {
    let shape = EnvelopeShape::classify(envelope);
    debug!("Envelope shape: {}", shape.label());

    let body = match shape {
        EnvelopeShape::BodyField(Value::String(raw)) => serde_json::from_str::<Value>(raw)
            .map_err(|e| HandlerError::MalformedRequest(format!("Invalid JSON: {}", e)))?,
        EnvelopeShape::BodyField(body) if body.is_object() => body.clone(),
        EnvelopeShape::BodyField(_) => {
            return Err(HandlerError::MalformedRequest("Invalid body format".into()))
        }
        EnvelopeShape::DirectFields(map) | EnvelopeShape::BareObject(map) => {
            Value::Object(map.clone())
        }
        EnvelopeShape::Unsupported => {
            return Err(HandlerError::MalformedRequest("Invalid event format".into()))
        }
    };

    let Value::Object(fields) = body else {
        return Err(HandlerError::MalformedRequest(
            "Body must be an object".into(),
        ));
    };

    debug!("Body keys: {:?}", fields.keys().collect::<Vec<_>>());

    Ok(CanonicalRequest {
        image_data: fields.get("imageData").cloned(),
        style: extract_style(fields.get("style")),
    })
}

fn extract_style(style: Option<&Value>) -> String {
    match style {
        None | Some(Value::Null) => DEFAULT_STYLE.to_string(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const IMAGE: &str = "iVBORw0KGgoAAAANSUhEUg";

    #[test]
    fn test_all_shapes_normalize_identically() {
        let body = json!({ "imageData": IMAGE, "style": "anime" });
        let envelopes = [
            json!({ "body": body.to_string() }),
            json!({ "body": body.clone() }),
            json!({ "imageData": IMAGE, "style": "anime", "requestContext": {} }),
            body.clone(),
        ];

        let expected = CanonicalRequest {
            image_data: Some(json!(IMAGE)),
            style: "anime".to_string(),
        };
        for envelope in envelopes {
            assert_eq!(normalize(&envelope).unwrap(), expected, "{envelope}");
        }
    }

    #[test]
    fn test_body_field_takes_priority() {
        let envelope = json!({
            "imageData": "outer-image-data",
            "body": { "imageData": "inner-image-data" }
        });
        assert!(matches!(
            EnvelopeShape::classify(&envelope),
            EnvelopeShape::BodyField(_)
        ));
        let request = normalize(&envelope).unwrap();
        assert_eq!(request.image_data, Some(json!("inner-image-data")));
    }

    #[test]
    fn test_classify_dialects() {
        assert!(matches!(
            EnvelopeShape::classify(&json!({ "imageData": "x" })),
            EnvelopeShape::DirectFields(_)
        ));
        assert!(matches!(
            EnvelopeShape::classify(&json!({ "other": 1 })),
            EnvelopeShape::BareObject(_)
        ));
        assert_eq!(
            EnvelopeShape::classify(&json!([1, 2])),
            EnvelopeShape::Unsupported
        );
    }

    #[test]
    fn test_style_defaults_to_realistic() {
        let request = normalize(&json!({ "imageData": IMAGE })).unwrap();
        assert_eq!(request.style, "realistic");

        let request = normalize(&json!({ "imageData": IMAGE, "style": null })).unwrap();
        assert_eq!(request.style, "realistic");
    }

    #[test]
    fn test_missing_image_data_is_not_a_normalizer_error() {
        let request = normalize(&json!({ "style": "anime" })).unwrap();
        assert!(request.image_data.is_none());
    }

    #[test]
    fn test_invalid_json_body() {
        let err = normalize(&json!({ "body": "{not json" })).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().starts_with("Invalid JSON: "), "{err}");
    }

    #[test]
    fn test_invalid_body_format() {
        for body in [json!(42), json!(null), json!(["a"]), json!(true)] {
            let err = normalize(&json!({ "body": body })).unwrap_err();
            assert_eq!(
                err,
                HandlerError::MalformedRequest("Invalid body format".into())
            );
        }
    }

    #[test]
    fn test_non_object_event() {
        for envelope in [json!("hello"), json!([1]), json!(null), json!(7)] {
            let err = normalize(&envelope).unwrap_err();
            assert_eq!(
                err,
                HandlerError::MalformedRequest("Invalid event format".into())
            );
        }
    }

    #[test]
    fn test_string_body_must_hold_object() {
        let err = normalize(&json!({ "body": "[1, 2, 3]" })).unwrap_err();
        assert_eq!(
            err,
            HandlerError::MalformedRequest("Body must be an object".into())
        );
    }
}
