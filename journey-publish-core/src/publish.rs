//! High-level pipeline: orchestrates guard → URL manifest → upload fan-out for one
//! journey version.
//!
//! This module provides the top-level orchestration for publishing a journey bundle.
//! It implements a coordinated pipeline that:
//!   - Confirms the target version is free (reserved-alias check + existence probe)
//!   - Builds the public-URL manifest from the asset manifest (pure)
//!   - Uploads every asset plus the three fixed metadata objects concurrently
//!   - Returns a report of what was published, or the full set of failures.
//!
//! # Responsibilities
//! - Fail-fast before any network write: guard failures abort with nothing uploaded
//! - Best-effort within the fan-out: task failures are aggregated at the barrier,
//!   never escalated mid-flight
//! - No rollback: a failed publish leaves whatever partial uploads completed; the
//!   operator re-runs (which now fails the guard) or cleans up first
//!
//! # Callable From
//! - Used by the CLI crate and by integration tests with a mock store
//! - Expects a concrete (async) [`ObjectStore`] implementation

use serde::Serialize;
use thiserror::Error;
use tracing::{error, info};

use crate::config::{AssetManifest, Journey};
use crate::contract::ObjectStore;
use crate::guard::{check_version_available, GuardError};
use crate::upload::{upload_all, AggregateUploadError, UploadTask, DEFAULT_MAX_IN_FLIGHT};
use crate::urls::{build_journey_urls, JourneyUrls};

/// Knobs for one publish run.
#[derive(Debug, Clone)]
pub struct PublishOptions {
    /// Cap on simultaneous in-flight uploads.
    pub max_in_flight: usize,
}

impl Default for PublishOptions {
    fn default() -> Self {
        PublishOptions {
            max_in_flight: DEFAULT_MAX_IN_FLIGHT,
        }
    }
}

/// Outcome of a successful publish.
#[derive(Debug, Serialize)]
pub struct PublishReport {
    pub name: String,
    pub version: String,
    /// Number of upload tasks that completed (skipped optional slots included).
    pub uploaded: usize,
    /// The URL manifest that was written as `journey-urls.json`.
    pub urls: JourneyUrls,
}

#[derive(Debug, Error)]
pub enum PublishError {
    #[error(transparent)]
    Guard(#[from] GuardError),
    #[error("unable to serialise the journey urls into json: {0}")]
    Serialise(#[from] serde_json::Error),
    #[error(transparent)]
    Upload(#[from] AggregateUploadError),
}

/// Publish the assets using the journey configuration.
///
/// Uploads, per asset-manifest entry, the file at `build + relative_path` to
/// `{name}/{version}/{relative_path}`, plus three fixed objects under the same
/// prefix: the asset manifest itself, the journey.json descriptor itself, and the
/// derived `journey-urls.json` built in memory.
pub async fn publish<S>(
    journey: &Journey,
    assets: &AssetManifest,
    store: &S,
    options: &PublishOptions,
) -> Result<PublishReport, PublishError>
where
    S: ObjectStore,
{
    info!(
        name = %journey.name,
        version = %journey.version,
        bucket = %journey.bucket,
        "Starting publish pipeline"
    );

    check_version_available(journey, store).await?;

    let urls = build_journey_urls(journey, assets);
    let urls_body = serde_json::to_vec(&urls).map_err(|e| {
        error!(error = %e, "Unable to serialise the journey urls into json");
        e
    })?;

    let mut tasks: Vec<UploadTask> = Vec::with_capacity(assets.len() + 3);
    for (_, relative_path) in assets.iter() {
        tasks.push(UploadTask::from_file(
            journey.asset_key(relative_path),
            journey.asset_path(relative_path),
        ));
    }

    // The journey.json and asset-manifest.json copies make the published prefix
    // self-describing; journey.json is also the sentinel the guard probes.
    tasks.push(UploadTask::from_file(
        journey.manifest_key(),
        journey.manifest.clone(),
    ));
    tasks.push(UploadTask::from_file(
        journey.journey_key(),
        journey.journey_path.clone(),
    ));
    tasks.push(UploadTask::from_bytes(
        journey.urls_key(),
        urls_body,
        "application/json",
    ));

    let uploaded = upload_all(&journey.bucket, tasks, store, options.max_in_flight).await?;

    info!(
        name = %journey.name,
        version = %journey.version,
        uploaded,
        "Finished publishing all assets"
    );

    Ok(PublishReport {
        name: journey.name.clone(),
        version: journey.version.clone(),
        uploaded,
        urls,
    })
}
