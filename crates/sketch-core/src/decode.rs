//! Image payload validation and data-URL decoding.

use serde_json::Value;
use tracing::{debug, info};

use crate::types::{DecodedImage, HandlerError, DEFAULT_MIME_TYPE};

/// Shortest image payload accepted, in characters
pub const MIN_IMAGE_DATA_CHARS: usize = 10;

const DATA_URL_PREFIX: &str = "data:image";

/// Validate `imageData` and strip an optional data-URL prefix
pub fn decode_image_payload(image_data: Option<&Value>) -> Result<DecodedImage, HandlerError> {
    let raw = match image_data {
        None => return Err(HandlerError::EmptyImageData),
        Some(value) if is_empty(value) => return Err(HandlerError::EmptyImageData),
        Some(Value::String(s)) => s.as_str(),
        Some(_) => return Err(HandlerError::InvalidImageType),
    };

    let chars = raw.chars().count();
    if chars < MIN_IMAGE_DATA_CHARS {
        debug!("imageData too short: {} chars", chars);
        return Err(HandlerError::ImageTooShort);
    }

    if !raw.starts_with(DATA_URL_PREFIX) {
        return Ok(DecodedImage {
            data: raw.to_string(),
            mime_type: DEFAULT_MIME_TYPE.to_string(),
        });
    }

    let parts: Vec<&str> = raw.split(',').collect();
    let [header, payload] = parts.as_slice() else {
        return Err(HandlerError::InvalidDataUrl);
    };

    let mime_type = mime_from_header(header).ok_or(HandlerError::InvalidDataUrl)?;
    info!(
        "Stripped data URL prefix (mime: {}, payload: {} chars)",
        mime_type,
        payload.len()
    );

    Ok(DecodedImage {
        data: payload.to_string(),
        mime_type: mime_type.to_string(),
    })
}

/// `data:image/jpeg;base64` -> `image/jpeg`
fn mime_from_header(header: &str) -> Option<&str> {
    let after_scheme = header.split_once(':')?.1;
    let mime = after_scheme.split(';').next()?;
    let (kind, subtype) = mime.split_once('/')?;
    (kind == "image" && !subtype.is_empty()).then_some(mime)
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(flag) => !flag,
        Value::Number(n) => n.as_f64() == Some(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_data_url_jpeg() {
        let value = json!("data:image/jpeg;base64,AAAABBBBCCCC");
        let decoded = decode_image_payload(Some(&value)).unwrap();
        assert_eq!(decoded.mime_type, "image/jpeg");
        assert_eq!(decoded.data, "AAAABBBBCCCC");
    }

    #[test]
    fn test_bare_base64_defaults_to_png() {
        let value = json!("AAAABBBBCCCCDDDD");
        let decoded = decode_image_payload(Some(&value)).unwrap();
        assert_eq!(decoded.mime_type, "image/png");
        assert_eq!(decoded.data, "AAAABBBBCCCCDDDD");
    }

    #[test]
    fn test_missing_or_empty() {
        assert_eq!(decode_image_payload(None), Err(HandlerError::EmptyImageData));
        for value in [
            json!(null),
            json!(""),
            json!([]),
            json!({}),
            json!(false),
            json!(0),
            json!(0.0),
        ] {
            assert_eq!(
                decode_image_payload(Some(&value)),
                Err(HandlerError::EmptyImageData),
                "{value}"
            );
        }
    }

    #[test]
    fn test_non_string() {
        for value in [
            json!(12345678901u64),
            json!(1),
            json!(-0.5),
            json!(true),
            json!(["abc"]),
            json!({"a": 1}),
        ] {
            assert_eq!(
                decode_image_payload(Some(&value)),
                Err(HandlerError::InvalidImageType),
                "{value}"
            );
        }
    }

    #[test]
    fn test_too_short() {
        for s in ["a", "abcdefghi", "data:imag"] {
            assert_eq!(
                decode_image_payload(Some(&json!(s))),
                Err(HandlerError::ImageTooShort)
            );
        }
        // Exactly ten characters passes
        assert!(decode_image_payload(Some(&json!("abcdefghij"))).is_ok());
    }

    #[test]
    fn test_length_counts_characters_not_bytes() {
        // 9 characters, 18 bytes
        let value = json!("ééééééééé");
        assert_eq!(
            decode_image_payload(Some(&value)),
            Err(HandlerError::ImageTooShort)
        );
    }

    #[test]
    fn test_data_url_without_comma() {
        let value = json!("data:image/png;base64AAAA");
        assert_eq!(
            decode_image_payload(Some(&value)),
            Err(HandlerError::InvalidDataUrl)
        );
    }

    #[test]
    fn test_data_url_with_extra_comma() {
        let value = json!("data:image/png;base64,AAAA,BBBB");
        assert_eq!(
            decode_image_payload(Some(&value)),
            Err(HandlerError::InvalidDataUrl)
        );
    }

    #[test]
    fn test_data_url_without_subtype() {
        let value = json!("data:image;base64,AAAABBBB");
        assert_eq!(
            decode_image_payload(Some(&value)),
            Err(HandlerError::InvalidDataUrl)
        );
    }

    #[test]
    fn test_data_url_without_base64_marker() {
        let value = json!("data:image/webp,AAAABBBB");
        let decoded = decode_image_payload(Some(&value)).unwrap();
        assert_eq!(decoded.mime_type, "image/webp");
        assert_eq!(decoded.data, "AAAABBBB");
    }
}
