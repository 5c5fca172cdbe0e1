// ============================================================================
// Sketchgen Lambda - AWS Lambda host for the sketch handler
// ============================================================================
// Accepts any JSON event (API Gateway proxy, function URL, direct test
// invocation) and always answers with a `{statusCode, headers, body}`
// envelope. Configuration and the S3 client are built once per process.
// ============================================================================

use std::sync::Arc;

use lambda_runtime::{service_fn, Error, LambdaEvent};
use serde_json::Value;
use sketch_core::{HandlerConfig, ResponseEnvelope, ResultPublisher, SketchHandler};
use tracing::{info, warn};

/// Handle one Lambda event
pub async fn function_handler(
    event: LambdaEvent<Value>,
    handler: Arc<SketchHandler>,
) -> Result<ResponseEnvelope, Error> {
    let (payload, context) = event.into_parts();
    info!("Invocation {}", context.request_id);
    Ok(handler.handle(&payload).await)
}

/// Build the handler from the environment
pub async fn build_handler() -> SketchHandler {
    let config = HandlerConfig::from_env();

    if config.gemini_api_key.is_none() {
        warn!("GEMINI_API_KEY not set - every request will fail with 500");
    }

    let publisher = ResultPublisher::from_bucket(config.bucket_name.clone()).await;
    if publisher.is_enabled() {
        info!("Publishing generated images to S3");
    } else {
        info!("S3_BUCKET_NAME not set - generated images will not be persisted");
    }

    SketchHandler::with_gemini(config, publisher)
}

// ============================================================================
// Application Setup
// ============================================================================

pub async fn run() -> Result<(), Error> {
    // Load environment variables from .env file (local runs)
    if let Err(e) = dotenvy::dotenv() {
        eprintln!("Warning: Could not load .env file: {}", e);
    }

    // Initialize logging; CloudWatch stamps each line itself
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sketch_lambda_lib=info".parse()?)
                .add_directive("sketch_core=info".parse()?),
        )
        .with_target(false)
        .without_time()
        .init();

    info!("Starting Sketchgen Lambda");

    let handler = Arc::new(build_handler().await);

    lambda_runtime::run(service_fn(move |event: LambdaEvent<Value>| {
        let handler = Arc::clone(&handler);
        async move { function_handler(event, handler).await }
    }))
    .await
}
