use std::collections::HashMap;
use std::path::PathBuf;

use serde::Deserialize;
use tracing::{debug, info};
use validator::Validate;

/// Version alias reserved for the "current" pointer. Never a valid publish target;
/// [`crate::latest::promote_latest`] is the only operation that writes under it.
pub const RESERVED_VERSION: &str = "latest";

/// Fixed filename of the published descriptor copy. Doubles as the version-existence
/// sentinel probed by the guard.
pub const JOURNEY_FILE: &str = "journey.json";

/// Fixed filename of the published asset-manifest copy.
pub const ASSET_MANIFEST_FILE: &str = "asset-manifest.json";

/// Fixed filename of the derived public-URL manifest.
pub const JOURNEY_URLS_FILE: &str = "journey-urls.json";

/// Represents the journey.json configuration: the identity and layout of one
/// publishable bundle. `journey_path` and `cdn_domain` are not part of the document;
/// they are supplied at invocation time by the caller that loaded the file.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct Journey {
    #[validate(length(min = 1, message = "name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "version is required"))]
    pub version: String,
    #[serde(rename = "rootID")]
    #[validate(length(min = 1, message = "rootID is required"))]
    pub root_id: String,
    #[validate(length(min = 1, message = "build is required"))]
    pub build: String,
    #[validate(length(min = 1, message = "manifest is required"))]
    pub manifest: String,
    #[validate(length(min = 1, message = "bucket is required"))]
    pub bucket: String,
    /// Path to the journey.json file itself; re-uploaded verbatim as metadata.
    #[serde(skip)]
    #[validate(length(min = 1, message = "journey path is required"))]
    pub journey_path: String,
    /// URL prefix under which published assets are publicly reachable.
    #[serde(skip)]
    #[validate(length(min = 1, message = "CDN domain is required"))]
    pub cdn_domain: String,
}

impl Journey {
    /// Storage key for an asset under this journey's version prefix:
    /// `{name}/{version}/{path}`. Manifest paths conventionally carry a leading
    /// slash; it is trimmed so keys never contain empty segments.
    pub fn asset_key(&self, relative_path: &str) -> String {
        format!(
            "{}/{}/{}",
            self.name,
            self.version,
            relative_path.trim_start_matches('/')
        )
    }

    /// Local filesystem path of an asset: the build directory joined with the
    /// manifest-relative path.
    pub fn asset_path(&self, relative_path: &str) -> PathBuf {
        PathBuf::from(&self.build).join(relative_path.trim_start_matches('/'))
    }

    /// Key of the published descriptor copy, `{name}/{version}/journey.json`.
    pub fn journey_key(&self) -> String {
        self.asset_key(JOURNEY_FILE)
    }

    /// Key of the published asset-manifest copy.
    pub fn manifest_key(&self) -> String {
        self.asset_key(ASSET_MANIFEST_FILE)
    }

    /// Key of the derived URL manifest, `{name}/{version}/journey-urls.json`.
    pub fn urls_key(&self) -> String {
        self.asset_key(JOURNEY_URLS_FILE)
    }

    /// Key the URL manifest is promoted to by the latest operation.
    pub fn latest_urls_key(&self) -> String {
        format!("{}/{}/{}", self.name, RESERVED_VERSION, JOURNEY_URLS_FILE)
    }

    /// Public URL of an asset: the CDN domain followed by its storage key.
    pub fn public_url(&self, relative_path: &str) -> String {
        format!(
            "{}/{}",
            self.cdn_domain.trim_end_matches('/'),
            self.asset_key(relative_path)
        )
    }

    pub fn trace_loaded(&self) {
        info!(
            name = %self.name,
            version = %self.version,
            bucket = %self.bucket,
            "Loaded journey configuration"
        );
        debug!(?self, "Journey configuration (full debug)");
    }
}

/// Mapping from logical asset name (e.g. `main.js`) to a path relative to the build
/// directory, as produced by the frontend build. Keys carry no semantics here; values
/// are treated purely as relative file paths. Iteration order is map order and
/// therefore unordered.
#[derive(Debug, Clone, Default, serde::Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetManifest(pub HashMap<String, String>);

impl AssetManifest {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &String)> {
        self.0.iter()
    }
}
