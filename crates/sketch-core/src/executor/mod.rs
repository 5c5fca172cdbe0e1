//! ============================================================================
//! Executor Module - Image Generation Backends
//! ============================================================================
//! - ImageGenerator: the seam the handler calls through
//! - GeminiImageExecutor: sketch transformation via Gemini generateContent
//! ============================================================================

mod gemini;

use async_trait::async_trait;

use crate::types::{DecodedImage, GenerationResult};

pub use gemini::GeminiImageExecutor;

/// Generates an image from a decoded sketch and a style identifier.
/// Implementations never fail: a missing image is reported through
/// [`GenerationResult::image`] returning `None`.
#[async_trait]
pub trait ImageGenerator: Send + Sync {
    async fn generate(&self, api_key: &str, image: &DecodedImage, style: &str) -> GenerationResult;
}
