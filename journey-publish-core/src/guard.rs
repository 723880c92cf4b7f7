//! Version guard: confirms a target version is free before any upload starts.
//!
//! The published copy of `journey.json` acts as the existence sentinel: it is written
//! as part of every successful publish, so its presence under `{name}/{version}/`
//! means that version has already shipped. The guard is read-only and runs strictly
//! before the upload fan-out.

use thiserror::Error;
use tracing::info;

use crate::config::{Journey, RESERVED_VERSION};
use crate::contract::{ObjectStore, Presence};

#[derive(Debug, Error)]
pub enum GuardError {
    /// `latest` is an alias maintained by the promote operation, never a publish
    /// target.
    #[error("version {0} is a reserved version, please update and try again")]
    ReservedVersion(String),
    #[error("version {name}/{version} already exists, publishing failed")]
    VersionConflict { name: String, version: String },
    /// The probe failed for a reason other than a definitive not-found. Publishing
    /// must not proceed on an indeterminate answer.
    #[error("could not determine whether {key} exists: {message}")]
    Probe { key: String, message: String },
}

/// Validate that the journey's version is not reserved and not already in use.
/// We don't want to publish over something.
pub async fn check_version_available<S>(journey: &Journey, store: &S) -> Result<(), GuardError>
where
    S: ObjectStore,
{
    if journey.version == RESERVED_VERSION {
        return Err(GuardError::ReservedVersion(journey.version.clone()));
    }

    let sentinel = journey.journey_key();
    match store.probe(&journey.bucket, &sentinel).await {
        Ok(Presence::Present) => Err(GuardError::VersionConflict {
            name: journey.name.clone(),
            version: journey.version.clone(),
        }),
        Ok(Presence::Absent) => {
            info!(
                name = %journey.name,
                version = %journey.version,
                "Version is not being used already"
            );
            Ok(())
        }
        Err(e) => Err(GuardError::Probe {
            key: sentinel,
            message: e.to_string(),
        }),
    }
}
