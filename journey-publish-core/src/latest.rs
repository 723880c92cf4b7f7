//! Promote a published version's URL manifest to the `latest` alias.
//!
//! Loaders that always want the current release read
//! `{name}/latest/journey-urls.json`; promotion is a server-side copy of an already
//! published version's manifest onto that key. Kept separate from the publish
//! pipeline: publishing is immutable per version, promotion moves the pointer.

use thiserror::Error;
use tracing::info;

use crate::config::{Journey, RESERVED_VERSION};
use crate::contract::ObjectStore;

#[derive(Debug, Error)]
pub enum PromoteError {
    /// Promoting `latest` onto itself is never meaningful.
    #[error("version {0} is the reserved alias and cannot be promoted")]
    Reserved(String),
    #[error("copy of {key} to the latest alias failed: {message}")]
    Copy { key: String, message: String },
}

/// Set this journey's version as the latest version by copying its
/// `journey-urls.json` to `{name}/latest/journey-urls.json`.
pub async fn promote_latest<S>(journey: &Journey, store: &S) -> Result<(), PromoteError>
where
    S: ObjectStore,
{
    if journey.version == RESERVED_VERSION {
        return Err(PromoteError::Reserved(journey.version.clone()));
    }

    let source = journey.urls_key();
    let target = journey.latest_urls_key();

    store
        .copy(&journey.bucket, &source, &target)
        .await
        .map_err(|e| PromoteError::Copy {
            key: source.clone(),
            message: e.to_string(),
        })?;

    info!(
        name = %journey.name,
        version = %journey.version,
        target = %target,
        "Promoted version to latest"
    );
    Ok(())
}
