//! Read-only handler configuration, loaded once per process.

use std::time::Duration;

/// Default Gemini REST base
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Image-capable Gemini model used for sketch transformation
pub const DEFAULT_IMAGE_MODEL: &str = "gemini-2.5-flash-image-preview";

/// Upper bound on the generation call
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Environment variable holding the Gemini API key
pub const API_KEY_VAR: &str = "GEMINI_API_KEY";

/// Environment variable holding the optional S3 bucket
pub const BUCKET_VAR: &str = "S3_BUCKET_NAME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerConfig {
    pub gemini_api_key: Option<String>,
    pub bucket_name: Option<String>,
    pub api_base: String,
    pub model: String,
    pub request_timeout: Duration,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            gemini_api_key: None,
            bucket_name: None,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_IMAGE_MODEL.to_string(),
            request_timeout: REQUEST_TIMEOUT,
        }
    }
}

impl HandlerConfig {
    /// Build from process environment. Blank values count as unset.
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |name: &str| {
            lookup(name)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let defaults = Self::default();
        Self {
            gemini_api_key: read(API_KEY_VAR),
            bucket_name: read(BUCKET_VAR),
            api_base: read("GEMINI_API_BASE")
                .map(|base| base.trim_end_matches('/').to_string())
                .unwrap_or(defaults.api_base),
            model: read("GEMINI_IMAGE_MODEL").unwrap_or(defaults.model),
            request_timeout: defaults.request_timeout,
        }
    }

    /// Default config with only an API key set
    #[cfg(test)]
    pub(crate) fn with_api_key(api_key: impl Into<String>) -> Self {
        Self {
            gemini_api_key: Some(api_key.into()),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_unset() {
        let config = HandlerConfig::from_lookup(lookup_from(&[]));
        assert!(config.gemini_api_key.is_none());
        assert!(config.bucket_name.is_none());
        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.model, DEFAULT_IMAGE_MODEL);
        assert_eq!(config.request_timeout, Duration::from_secs(90));
    }

    #[test]
    fn test_blank_values_are_unset() {
        let config = HandlerConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "   "),
            ("S3_BUCKET_NAME", ""),
        ]));
        assert!(config.gemini_api_key.is_none());
        assert!(config.bucket_name.is_none());
    }

    #[test]
    fn test_overrides() {
        let config = HandlerConfig::from_lookup(lookup_from(&[
            ("GEMINI_API_KEY", "key-123"),
            ("S3_BUCKET_NAME", "sketches"),
            ("GEMINI_API_BASE", "http://localhost:8080/v1beta/"),
            ("GEMINI_IMAGE_MODEL", "gemini-test"),
        ]));
        assert_eq!(config.gemini_api_key.as_deref(), Some("key-123"));
        assert_eq!(config.bucket_name.as_deref(), Some("sketches"));
        assert_eq!(config.api_base, "http://localhost:8080/v1beta");
        assert_eq!(config.model, "gemini-test");
    }
}
