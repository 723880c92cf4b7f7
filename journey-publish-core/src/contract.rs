//! # contract: storage capability required by the publish pipeline
//!
//! This module defines the single trait ([`ObjectStore`]) the pipeline needs from an
//! object-storage backend, plus its supporting types. The concrete S3 client lives in
//! the binary crate; tests use the generated mock.
//!
//! ## Interface & Extensibility
//! - Implement [`ObjectStore`] to target a new backend (S3-compatible, in-memory, ...).
//! - All methods are async, returning results and using boxed error types.
//! - Implementations must be safe for concurrent use by many tasks with no
//!   caller-side locking; the coordinator issues puts against a shared reference.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall` so consumers can generate deterministic
//!   mocks for unit/integration tests (`MockObjectStore`, behind `test-export-mocks`).
//!
//! ## Probe semantics
//! Existence probing is tri-state. `Ok(Present)` and `Ok(Absent)` are definitive
//! answers; every other condition (network failure, permission denied, throttling)
//! must surface as `Err` and is treated by callers as indeterminate, never as
//! absence. An implementation that reports a failed probe as `Absent` would let a
//! publish overwrite an existing version.

use async_trait::async_trait;

#[cfg(any(test, feature = "test-export-mocks"))]
use mockall::automock;

/// Error type for storage operations (boxed error at the seam).
pub type StoreError = Box<dyn std::error::Error + Send + Sync>;

/// Definitive answer from an existence probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Present,
    Absent,
}

/// Capability to probe, write and copy objects in a bucket.
///
/// The trait is `Send + Sync` and intended for async/await usage. It is implemented
/// by the real S3 client and by test mocks.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Probe whether an object exists. `Ok(Absent)` may be returned only on a
    /// definitive not-found from the backend; anything ambiguous is an `Err`.
    async fn probe(&self, bucket: &str, key: &str) -> Result<Presence, StoreError>;

    /// Upload a byte body to `bucket`/`key` with the given content type.
    async fn put(
        &self,
        bucket: &str,
        key: &str,
        body: Vec<u8>,
        content_type: &str,
    ) -> Result<(), StoreError>;

    /// Server-side copy of `from_key` to `to_key` within `bucket`.
    async fn copy(&self, bucket: &str, from_key: &str, to_key: &str) -> Result<(), StoreError>;
}
