//! ============================================================================
//! Gemini Executor - Sketch-to-Image Generation via Gemini API
//! ============================================================================
//! Sends the sketch inline with a style prompt to Gemini's generateContent
//! endpoint and pulls the first generated image out of the response.
//! Every failure here is soft: the caller gets a result without an image,
//! never an error.
//! ============================================================================

use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::ImageGenerator;
use crate::config::HandlerConfig;
use crate::style::build_prompt;
use crate::types::{DecodedImage, GenerationResult};

/// Harm categories blocked at medium probability and above
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";

/// Executor for sketch transformation via Gemini
pub struct GeminiImageExecutor {
    client: reqwest::Client,
    api_base: String,
    model: String,
    timeout: Duration,
}

impl GeminiImageExecutor {
    /// Create an executor pointed at the configured endpoint and model
    pub fn new(config: &HandlerConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_base: config.api_base.clone(),
            model: config.model.clone(),
            timeout: config.request_timeout,
        }
    }

    /// generateContent URL, without the key
    pub fn endpoint(&self) -> String {
        format!("{}/models/{}:generateContent", self.api_base, self.model)
    }

    /// Send one generation request. `Ok(None)` means the call went through
    /// but the response held no usable image.
    async fn request_image(
        &self,
        api_key: &str,
        prompt: &str,
        image: &DecodedImage,
    ) -> Result<Option<String>> {
        let request = build_request(prompt, image);
        debug!(
            "Calling Gemini {} with {} chars of {}",
            self.model,
            image.data.len(),
            image.mime_type
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("key", api_key)])
            .header("Content-Type", "application/json")
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await
            .map_err(|e| anyhow!("Failed to call Gemini API: {}", e.without_url()))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("Gemini API error {}: {}", status, body));
        }

        let body = response
            .text()
            .await
            .map_err(|e| anyhow!("Failed to read Gemini response: {}", e.without_url()))?;
        let parsed: GenerateContentResponse = serde_json::from_str(&body)
            .map_err(|e| anyhow!("Failed to parse Gemini response: {}", e))?;

        match extract_image(&parsed) {
            Some(data) => Ok(Some(data.to_string())),
            None => {
                warn!("No image in Gemini response: {}", body);
                Ok(None)
            }
        }
    }
}

#[async_trait]
impl ImageGenerator for GeminiImageExecutor {
    async fn generate(&self, api_key: &str, image: &DecodedImage, style: &str) -> GenerationResult {
        let prompt = build_prompt(style);
        info!("Generating image with prompt: {}", prompt);

        match self.request_image(api_key, &prompt, image).await {
            Ok(Some(data)) => {
                info!("Generated image size: {} chars", data.len());
                GenerationResult::success(data, prompt)
            }
            Ok(None) => GenerationResult::soft_failure(prompt),
            Err(e) => {
                warn!("Image generation failed: {}", e);
                GenerationResult::soft_failure(prompt)
            }
        }
    }
}

/// Build the generateContent body for a sketch and prompt
fn build_request(prompt: &str, image: &DecodedImage) -> GenerateContentRequest {
    GenerateContentRequest {
        contents: vec![Content {
            role: "user".to_string(),
            parts: vec![
                RequestPart::Text {
                    text: prompt.to_string(),
                },
                RequestPart::Inline {
                    inline_data: InlineData {
                        mime_type: image.mime_type.clone(),
                        data: image.data.clone(),
                    },
                },
            ],
        }],
        generation_config: GenerationConfig {
            response_modalities: vec!["TEXT".to_string(), "IMAGE".to_string()],
        },
        safety_settings: SAFETY_CATEGORIES
            .iter()
            .map(|category| SafetySetting {
                category: category.to_string(),
                threshold: SAFETY_THRESHOLD.to_string(),
            })
            .collect(),
    }
}

/// First image part of the first candidate, if it carries data
fn extract_image(response: &GenerateContentResponse) -> Option<&str> {
    let candidate = response.candidates.as_ref()?.first()?;
    let parts = candidate.content.as_ref()?.parts.as_ref()?;

    let image_part = parts.iter().find_map(|part| {
        part.inline_data
            .as_ref()
            .filter(|inline| inline.mime_type.starts_with("image/"))
    })?;

    Some(image_part.data.as_str()).filter(|data| !data.is_empty())
}

// ============================================================================
// Gemini API Types
// ============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: String,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text {
        text: String,
    },
    Inline {
        #[serde(rename = "inlineData")]
        inline_data: InlineData,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct InlineData {
    #[serde(default, alias = "mime_type")]
    mime_type: String,
    #[serde(default)]
    data: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    response_modalities: Vec<String>,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: String,
    threshold: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    parts: Option<Vec<ResponsePart>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResponsePart {
    #[serde(default, alias = "inline_data")]
    inline_data: Option<InlineData>,
}
