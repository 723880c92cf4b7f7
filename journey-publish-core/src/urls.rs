//! Builds the public-URL manifest (`journey-urls.json`) from the asset manifest.
//!
//! Pure transformation, no I/O: every asset is addressed under the CDN domain at its
//! versioned storage key, then classified by file extension. Consumers of the
//! published manifest (the journey registry and its loaders) resolve stylesheets and
//! scripts from it instead of hardcoding asset hashes.

use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::config::{AssetManifest, Journey};

/// One stylesheet entry in the published URL manifest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CssAsset {
    pub url: String,
}

/// One script entry in the published URL manifest. Carries the DOM node id the
/// bundle mounts into, so loaders can place it without reading journey.json.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JsAsset {
    pub url: String,
    #[serde(rename = "rootID")]
    pub root_id: String,
}

/// The derived URL index uploaded as `journey-urls.json`.
///
/// Entry order within each list follows asset-manifest map iteration and is not
/// stable across runs; consumers must rely on membership only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JourneyUrls {
    pub css: Vec<CssAsset>,
    pub js: Vec<JsAsset>,
}

/// Build the journey URLs struct with a list of css and js objects, one per
/// supported asset in the manifest. Assets with any other extension are skipped.
pub fn build_journey_urls(journey: &Journey, assets: &AssetManifest) -> JourneyUrls {
    let mut urls = JourneyUrls::default();

    for (_, relative_path) in assets.iter() {
        let url = journey.public_url(relative_path);

        match Path::new(relative_path).extension().and_then(|e| e.to_str()) {
            Some("css") => urls.css.push(CssAsset { url }),
            Some("js") => urls.js.push(JsAsset {
                url,
                root_id: journey.root_id.clone(),
            }),
            other => {
                warn!(
                    path = %relative_path,
                    extension = ?other,
                    "Unsupported asset type for journey-urls.json, skipping"
                );
            }
        }
    }

    urls
}
