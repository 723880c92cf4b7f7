/// `load_config` module: loads the on-disk JSON documents—journey.json and the asset
/// manifest—and adapts them into the core crate's validated value objects.
///
/// This module is the only place where untrusted JSON is parsed and mapped to rich,
/// strongly-typed internal structs.
///
/// # Responsibilities
/// - Parse the journey descriptor and asset-manifest JSON into type-safe structs
/// - Apply invocation-time inputs (bucket override, CDN domain, the descriptor's own
///   absolute path) that are not part of the document schema
/// - Run required-field validation before any publish work begins
/// - Ensure robust error messages for CLI and tests: any failure in loading must
///   result in clear diagnostics
///
/// # Errors
/// All errors in this module use `anyhow::Error` for context-rich diagnostics, and
/// are surfaced at the CLI boundary.
use std::fs;
use std::path::Path;

use anyhow::Result;
use tracing::{error, info};
use validator::Validate;

use journey_publish_core::config::{AssetManifest, Journey};

/// Load and validate journey.json. `bucket` (optional override) and `cdn_domain` are
/// invocation-time inputs; the descriptor's own path is recorded so it can be
/// re-uploaded verbatim as metadata.
pub fn load_journey<P: AsRef<Path>>(
    path: P,
    bucket: Option<String>,
    cdn_domain: String,
) -> Result<Journey> {
    let path_ref = path.as_ref();
    info!(journey_path = ?path_ref, "Loading journey configuration from file");

    let abs = fs::canonicalize(path_ref).map_err(|e| {
        error!(error = ?e, journey_path = ?path_ref, "Failed to resolve journey config path");
        anyhow::anyhow!("Failed to resolve journey config path {:?}: {}", path_ref, e)
    })?;

    let content = match fs::read_to_string(&abs) {
        Ok(content) => {
            info!(journey_path = ?abs, "Journey config file read successfully");
            content
        }
        Err(e) => {
            error!(error = ?e, journey_path = ?abs, "Failed to read journey config file");
            return Err(anyhow::anyhow!(
                "Failed to read journey config file {:?}: {}",
                abs,
                e
            ));
        }
    };

    let mut journey: Journey = match serde_json::from_str(&content) {
        Ok(journey) => {
            info!(journey_path = ?abs, "Parsed journey config JSON successfully");
            journey
        }
        Err(e) => {
            error!(error = ?e, journey_path = ?abs, "Failed to parse journey config JSON");
            return Err(anyhow::anyhow!("Failed to parse journey config JSON: {e}"));
        }
    };

    if let Some(bucket) = bucket {
        journey.bucket = bucket;
    }
    journey.journey_path = abs.to_string_lossy().into_owned();
    journey.cdn_domain = cdn_domain;

    if let Err(e) = journey.validate() {
        error!(error = %e, journey_path = ?abs, "Journey configuration is invalid");
        return Err(anyhow::anyhow!("Journey configuration is invalid: {e}"));
    }
    journey.trace_loaded();

    Ok(journey)
}

/// Load the asset manifest: a JSON map from logical asset name to build-relative
/// path.
pub fn load_asset_manifest<P: AsRef<Path>>(path: P) -> Result<AssetManifest> {
    let path_ref = path.as_ref();
    info!(manifest_path = ?path_ref, "Loading asset manifest from file");

    let abs = fs::canonicalize(path_ref).map_err(|e| {
        error!(error = ?e, manifest_path = ?path_ref, "Failed to resolve asset manifest path");
        anyhow::anyhow!("Failed to resolve asset manifest path {:?}: {}", path_ref, e)
    })?;

    let content = match fs::read_to_string(&abs) {
        Ok(content) => content,
        Err(e) => {
            error!(error = ?e, manifest_path = ?abs, "Failed to read asset manifest file");
            return Err(anyhow::anyhow!(
                "Failed to read asset manifest file {:?}: {}",
                abs,
                e
            ));
        }
    };

    let assets: AssetManifest = match serde_json::from_str(&content) {
        Ok(assets) => assets,
        Err(e) => {
            error!(error = ?e, manifest_path = ?abs, "Failed to parse asset manifest JSON");
            return Err(anyhow::anyhow!("Failed to parse asset manifest JSON: {e}"));
        }
    };

    info!(
        manifest_path = ?abs,
        assets = assets.len(),
        "Successfully loaded asset manifest configuration"
    );
    Ok(assets)
}
