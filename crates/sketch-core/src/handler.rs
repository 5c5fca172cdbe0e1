//! ============================================================================
//! Sketch Handler - One request, one linear pipeline
//! ============================================================================
//! normalize -> config check -> decode -> generate -> publish -> respond
//!
//! Every stage can short-circuit to an error envelope. Nothing escapes
//! `handle` as an error or a panic: unanticipated failures become a 500
//! carrying the raw failure message.
//! ============================================================================

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;

use futures_util::FutureExt;
use serde_json::Value;
use tracing::{debug, error, info};

use crate::config::{HandlerConfig, API_KEY_VAR};
use crate::decode::decode_image_payload;
use crate::executor::{GeminiImageExecutor, ImageGenerator};
use crate::normalize::normalize;
use crate::publish::ResultPublisher;
use crate::response::success_response;
use crate::types::{HandlerError, ResponseEnvelope};

/// Stateless request handler; shared read-only across invocations
pub struct SketchHandler {
    config: HandlerConfig,
    generator: Arc<dyn ImageGenerator>,
    publisher: ResultPublisher,
}

impl SketchHandler {
    pub fn new(
        config: HandlerConfig,
        generator: Arc<dyn ImageGenerator>,
        publisher: ResultPublisher,
    ) -> Self {
        Self {
            config,
            generator,
            publisher,
        }
    }

    /// Handler backed by Gemini with the given publisher
    pub fn with_gemini(config: HandlerConfig, publisher: ResultPublisher) -> Self {
        let generator = Arc::new(GeminiImageExecutor::new(&config));
        Self::new(config, generator, publisher)
    }

    /// Process one invocation envelope into its terminal response
    pub async fn handle(&self, envelope: &Value) -> ResponseEnvelope {
        debug!("Event received: {} bytes", envelope.to_string().len());

        let outcome = AssertUnwindSafe(self.process(envelope))
            .catch_unwind()
            .await
            .unwrap_or_else(|panic| Err(HandlerError::Internal(panic_message(panic))));

        match outcome {
            Ok(response) => response,
            Err(err) => {
                if err.status_code() >= 500 {
                    error!("Request failed: {}", err);
                } else {
                    info!("Rejected request: {}", err);
                }
                ResponseEnvelope::from(&err)
            }
        }
    }

    async fn process(&self, envelope: &Value) -> Result<ResponseEnvelope, HandlerError> {
        let request = normalize(envelope)?;
        info!(
            "Request style: {}, imageData present: {}",
            request.style,
            request.image_data.is_some()
        );

        let api_key = self
            .config
            .gemini_api_key
            .as_deref()
            .ok_or_else(|| HandlerError::MissingConfiguration(API_KEY_VAR.to_string()))?;

        let image = decode_image_payload(request.image_data.as_ref())?;
        info!(
            "Processing sketch with style: {}, mime: {}",
            request.style, image.mime_type
        );

        let generation = self
            .generator
            .generate(api_key, &image, &request.style)
            .await;
        let generated = generation.image().ok_or(HandlerError::GenerationFailed)?;

        let artifact = self.publisher.publish(generated, &request.style).await;

        Ok(success_response(
            &generation.prompt_used,
            generated,
            artifact.url.as_deref(),
            &request.style,
        ))
    }
}

fn panic_message(panic: Box<dyn Any + Send>) -> String {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message.to_string()
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message.clone()
    } else {
        "Unexpected failure while handling request".to_string()
    }
}
