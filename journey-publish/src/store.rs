//! # S3 storage client (CLI <-> Core)
//!
//! This module bridges the CLI workflow to the storage abstraction in
//! [`journey_publish_core::contract`]. It wires up the [`ObjectStore`] trait for real
//! use against AWS S3 (or any S3-compatible endpoint the ambient AWS configuration
//! points at), and provides the `S3Store` used by the CLI for networked publishes.
//!
//! Credentials and any endpoint override come from the standard AWS environment; the
//! region is an invocation argument. The client is cheap to clone and safe for
//! concurrent use, which the upload fan-out relies on.

use async_trait::async_trait;
use aws_config::meta::region::RegionProviderChain;
use aws_config::BehaviorVersion;
use aws_sdk_s3::error::SdkError;
use aws_sdk_s3::operation::head_object::HeadObjectError;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;
use bytes::Bytes;

use journey_publish_core::contract::{ObjectStore, Presence, StoreError};

/// S3 implementation of the storage contract.
#[derive(Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    /// Create a new S3Store for the given region, loading credentials from the
    /// ambient AWS configuration chain.
    pub async fn new(region: String) -> Self {
        let region_provider =
            RegionProviderChain::first_try(aws_config::Region::new(region));
        let config = aws_config::defaults(BehaviorVersion::latest())
            .region(region_provider)
            .load()
            .await;

        S3Store {
            client: Client::new(&config),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn probe(&self, bucket: &str, key: &str) -> Result<Presence, StoreError> {
        match self
            .client
            .head_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
        {
            Ok(_) => Ok(Presence::Present),
            Err(e) => {
                // Only a definitive not-found counts as absent; every other error is
                // an indeterminate probe and must surface to the caller.
                let not_found = matches!(
                    &e,
                    SdkError::ServiceError(service_err)
                        if matches!(service_err.err(), HeadObjectError::NotFound(_))
                );
                if not_found {
                    Ok(Presence::Absent)
                } else {
                    tracing::error!(error = %e, bucket = %bucket, key = %key, "S3 head failed");
                    Err(Box::new(e))
                }
            }
        }
    }

    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError> {
        let size = body.len() as u64;
        let body = ByteStream::from(Bytes::from(body));
        let start = std::time::Instant::now();

        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    key = %key,
                    size_bytes = size,
                    duration_ms = start.elapsed().as_secs_f64() * 1000.0,
                    "S3 upload failed"
                );
                Box::new(e) as StoreError
            })?;

        tracing::info!(
            bucket = %bucket,
            key = %key,
            size_bytes = size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "S3 upload successful"
        );
        Ok(())
    }

    async fn copy(&self, bucket: &str, from_key: &str, to_key: &str) -> Result<(), StoreError> {
        // URL-encode the copy source per AWS S3 API requirements
        let encoded_key = urlencoding::encode(from_key);
        let copy_source = format!("{}/{}", bucket, encoded_key);

        self.client
            .copy_object()
            .bucket(bucket)
            .copy_source(&copy_source)
            .key(to_key)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(
                    error = %e,
                    bucket = %bucket,
                    from_key = %from_key,
                    to_key = %to_key,
                    "S3 copy failed"
                );
                Box::new(e) as StoreError
            })?;

        tracing::info!(
            bucket = %bucket,
            from_key = %from_key,
            to_key = %to_key,
            "S3 copy successful"
        );
        Ok(())
    }
}
