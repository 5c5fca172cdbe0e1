//! ============================================================================
//! SKETCH-CORE: Sketch-to-Image Request Pipeline
//! ============================================================================
//! This crate handles all backend logic for the sketch handler:
//! - Envelope normalization across invocation front-ends
//! - Image payload validation and data-URL decoding
//! - Gemini image generation with a fixed style table
//! - Optional S3 publishing with pre-signed retrieval URLs
//! - Uniform success/error response envelopes
//! ============================================================================

pub mod config;
pub mod decode;
pub mod executor;
pub mod handler;
pub mod normalize;
pub mod publish;
pub mod response;
pub mod style;
pub mod types;

// Re-export main types for convenience
pub use config::HandlerConfig;
pub use executor::{GeminiImageExecutor, ImageGenerator};
pub use handler::SketchHandler;
pub use publish::{ObjectStore, ResultPublisher, S3ObjectStore};
pub use types::*;
