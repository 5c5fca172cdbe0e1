//! ============================================================================
//! Result Publisher - Persist generated images to object storage
//! ============================================================================
//! Uploads the generated PNG to S3 and hands back a pre-signed GET URL.
//! Publishing never fails the request: an unconfigured bucket or any
//! storage error simply yields no URL.
//! ============================================================================

use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::presigning::PresigningConfig;
use aws_sdk_s3::primitives::ByteStream;
use base64::{engine::general_purpose::STANDARD, Engine};
use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::types::PublishedArtifact;

/// Lifetime of a retrieval URL
pub const PRESIGNED_URL_TTL: Duration = Duration::from_secs(3600);

/// Key prefix for every uploaded image
pub const KEY_PREFIX: &str = "generated-images";

const CONTENT_TYPE_PNG: &str = "image/png";

/// Minimal object-store surface the publisher needs
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Write one object
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()>;

    /// Time-bounded, read-only URL for one object
    async fn presigned_get_url(&self, bucket: &str, key: &str, expires_in: Duration)
        -> Result<String>;
}

/// S3-backed object store
pub struct S3ObjectStore {
    client: aws_sdk_s3::Client,
}

impl S3ObjectStore {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ObjectStore for S3ObjectStore {
    async fn put_object(
        &self,
        bucket: &str,
        key: &str,
        bytes: Vec<u8>,
        content_type: &str,
    ) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(bytes))
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| anyhow!("S3 put_object failed: {}", DisplayErrorContext(&e)))?;
        Ok(())
    }

    async fn presigned_get_url(
        &self,
        bucket: &str,
        key: &str,
        expires_in: Duration,
    ) -> Result<String> {
        let presigning = PresigningConfig::expires_in(expires_in)
            .map_err(|e| anyhow!("Invalid presigning config: {}", e))?;
        let request = self
            .client
            .get_object()
            .bucket(bucket)
            .key(key)
            .presigned(presigning)
            .await
            .map_err(|e| anyhow!("S3 presign failed: {}", DisplayErrorContext(&e)))?;
        Ok(request.uri().to_string())
    }
}

/// Publishes generated images when a bucket is configured
#[derive(Clone, Default)]
pub struct ResultPublisher {
    target: Option<(String, Arc<dyn ObjectStore>)>,
}

impl ResultPublisher {
    /// Publisher that uploads to `bucket`; without a bucket it is a no-op
    pub fn new(bucket: Option<String>, store: Arc<dyn ObjectStore>) -> Self {
        Self {
            target: bucket.map(|bucket| (bucket, store)),
        }
    }

    /// Publisher that never uploads
    pub fn disabled() -> Self {
        Self::default()
    }

    /// S3 publisher for `bucket`, using the default AWS credential chain.
    /// No AWS configuration is loaded when there is no bucket.
    pub async fn from_bucket(bucket: Option<String>) -> Self {
        let Some(bucket) = bucket else {
            return Self::disabled();
        };
        let aws = aws_config::load_from_env().await;
        let store = S3ObjectStore::new(aws_sdk_s3::Client::new(&aws));
        Self::new(Some(bucket), Arc::new(store))
    }

    pub fn is_enabled(&self) -> bool {
        self.target.is_some()
    }

    /// Upload the image and return its retrieval URL, or nothing
    pub async fn publish(&self, image_base64: &str, style: &str) -> PublishedArtifact {
        let Some((bucket, store)) = &self.target else {
            info!("S3_BUCKET_NAME not configured, skipping upload");
            return PublishedArtifact::default();
        };

        let key = object_key(style, Utc::now());
        match upload(store.as_ref(), bucket, &key, image_base64).await {
            Ok(url) => {
                info!("Uploaded to S3: {}", key);
                PublishedArtifact { url: Some(url) }
            }
            Err(e) => {
                warn!("S3 upload failed: {}", e);
                PublishedArtifact::default()
            }
        }
    }
}

async fn upload(
    store: &dyn ObjectStore,
    bucket: &str,
    key: &str,
    image_base64: &str,
) -> Result<String> {
    let bytes = STANDARD
        .decode(image_base64)
        .map_err(|e| anyhow!("Failed to decode generated image: {}", e))?;
    store
        .put_object(bucket, key, bytes, CONTENT_TYPE_PNG)
        .await?;
    store
        .presigned_get_url(bucket, key, PRESIGNED_URL_TTL)
        .await
}

/// `generated-images/drawing_<YYYYmmdd_HHMMSS>_<style>.png`
pub fn object_key(style: &str, now: DateTime<Utc>) -> String {
    let style: String = style
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '-'
            }
        })
        .collect();
    format!(
        "{}/drawing_{}_{}.png",
        KEY_PREFIX,
        now.format("%Y%m%d_%H%M%S"),
        style
    )
}
