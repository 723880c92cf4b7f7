use std::collections::HashMap;
use std::fs;
use std::sync::{Arc, Mutex};

use tempfile::tempdir;

use journey_publish_core::config::{AssetManifest, Journey};
use journey_publish_core::contract::{MockObjectStore, Presence};
use journey_publish_core::guard::GuardError;
use journey_publish_core::latest::{promote_latest, PromoteError};
use journey_publish_core::publish::{publish, PublishError, PublishOptions};

fn journey(build: &str, manifest: &str, journey_path: &str) -> Journey {
    Journey {
        name: "demo".into(),
        version: "1.0.0".into(),
        root_id: "app-root".into(),
        build: build.into(),
        manifest: manifest.into(),
        bucket: "releases".into(),
        journey_path: journey_path.into(),
        cdn_domain: "https://cdn.example.com/".into(),
    }
}

#[tokio::test]
async fn reserved_version_is_rejected_before_any_probe() {
    // No expectations at all: any call on the store would fail the test.
    let store = MockObjectStore::new();

    let mut j = journey("./build", "./asset-manifest.json", "./journey.json");
    j.version = "latest".into();

    let result = publish(&j, &AssetManifest::default(), &store, &PublishOptions::default()).await;

    match result {
        Err(PublishError::Guard(GuardError::ReservedVersion(v))) => assert_eq!(v, "latest"),
        other => panic!("expected ReservedVersion, got: {other:?}"),
    }
}

#[tokio::test]
async fn existing_sentinel_aborts_with_version_conflict() {
    let mut store = MockObjectStore::new();
    store
        .expect_probe()
        .withf(|bucket: &str, key: &str| bucket == "releases" && key == "demo/1.0.0/journey.json")
        .times(1)
        .returning(|_, _| Ok(Presence::Present));
    // No put expectation: an upload attempt would fail the test.

    let j = journey("./build", "./asset-manifest.json", "./journey.json");
    let result = publish(&j, &AssetManifest::default(), &store, &PublishOptions::default()).await;

    match result {
        Err(PublishError::Guard(GuardError::VersionConflict { name, version })) => {
            assert_eq!(name, "demo");
            assert_eq!(version, "1.0.0");
        }
        other => panic!("expected VersionConflict, got: {other:?}"),
    }
}

#[tokio::test]
async fn indeterminate_probe_is_fatal_not_treated_as_absent() {
    let mut store = MockObjectStore::new();
    store
        .expect_probe()
        .times(1)
        .returning(|_, _| Err("connection reset by peer".into()));

    let j = journey("./build", "./asset-manifest.json", "./journey.json");
    let result = publish(&j, &AssetManifest::default(), &store, &PublishOptions::default()).await;

    match result {
        Err(PublishError::Guard(GuardError::Probe { key, message })) => {
            assert_eq!(key, "demo/1.0.0/journey.json");
            assert!(message.contains("connection reset"));
        }
        other => panic!("expected a probe failure, got: {other:?}"),
    }
}

#[tokio::test]
async fn publish_uploads_every_asset_and_the_three_metadata_objects() {
    let dir = tempdir().expect("tempdir");
    let build = dir.path().join("build");
    fs::create_dir(&build).unwrap();
    fs::write(build.join("main.abc123.js"), b"console.log('demo')").unwrap();
    fs::write(build.join("main.abc123.css"), b"body{}").unwrap();

    let manifest_path = dir.path().join("asset-manifest.json");
    fs::write(
        &manifest_path,
        br#"{"main.js": "/main.abc123.js", "main.css": "/main.abc123.css"}"#,
    )
    .unwrap();

    let journey_path = dir.path().join("journey.json");
    fs::write(
        &journey_path,
        br#"{"name":"demo","version":"1.0.0","rootID":"app-root","build":"./build","manifest":"./asset-manifest.json","bucket":"releases"}"#,
    )
    .unwrap();

    let mut assets = HashMap::new();
    assets.insert("main.js".to_string(), "/main.abc123.js".to_string());
    assets.insert("main.css".to_string(), "/main.abc123.css".to_string());
    let assets = AssetManifest(assets);

    let j = journey(
        build.to_str().unwrap(),
        manifest_path.to_str().unwrap(),
        journey_path.to_str().unwrap(),
    );

    let uploaded_keys = Arc::new(Mutex::new(Vec::<(String, String)>::new()));
    let seen = uploaded_keys.clone();

    let mut store = MockObjectStore::new();
    store
        .expect_probe()
        .times(1)
        .returning(|_, _| Ok(Presence::Absent));
    store
        .expect_put()
        .withf(|bucket: &str, _key: &str, _body: &Vec<u8>, _ct: &str| bucket == "releases")
        .times(5)
        .returning(move |_, key, _, content_type| {
            seen.lock()
                .unwrap()
                .push((key.to_string(), content_type.to_string()));
            Ok(())
        });

    let report = publish(&j, &assets, &store, &PublishOptions::default())
        .await
        .expect("publish should succeed");

    assert_eq!(report.uploaded, 5);
    assert_eq!(report.name, "demo");
    assert_eq!(report.version, "1.0.0");
    assert_eq!(report.urls.js.len(), 1);
    assert_eq!(report.urls.css.len(), 1);
    assert_eq!(
        report.urls.js[0].url,
        "https://cdn.example.com/demo/1.0.0/main.abc123.js"
    );
    assert_eq!(report.urls.js[0].root_id, "app-root");

    let seen = uploaded_keys.lock().unwrap();
    let keys: Vec<&str> = seen.iter().map(|(k, _)| k.as_str()).collect();
    for expected in [
        "demo/1.0.0/main.abc123.js",
        "demo/1.0.0/main.abc123.css",
        "demo/1.0.0/asset-manifest.json",
        "demo/1.0.0/journey.json",
        "demo/1.0.0/journey-urls.json",
    ] {
        assert!(keys.contains(&expected), "missing upload for {expected}, got {keys:?}");
    }

    let urls_upload = seen
        .iter()
        .find(|(k, _)| k == "demo/1.0.0/journey-urls.json")
        .unwrap();
    assert_eq!(urls_upload.1, "application/json");
}

#[tokio::test]
async fn failed_asset_reports_aggregate_but_guard_passed_uploads_still_ran() {
    let dir = tempdir().expect("tempdir");
    let build = dir.path().join("build");
    fs::create_dir(&build).unwrap();
    fs::write(build.join("main.abc123.js"), b"ok").unwrap();
    // main.abc123.css is deliberately not written.

    let manifest_path = dir.path().join("asset-manifest.json");
    fs::write(
        &manifest_path,
        br#"{"main.js": "/main.abc123.js", "main.css": "/main.abc123.css"}"#,
    )
    .unwrap();
    let journey_path = dir.path().join("journey.json");
    fs::write(&journey_path, b"{}").unwrap();

    let mut assets = HashMap::new();
    assets.insert("main.js".to_string(), "/main.abc123.js".to_string());
    assets.insert("main.css".to_string(), "/main.abc123.css".to_string());
    let assets = AssetManifest(assets);

    let j = journey(
        build.to_str().unwrap(),
        manifest_path.to_str().unwrap(),
        journey_path.to_str().unwrap(),
    );

    let mut store = MockObjectStore::new();
    store
        .expect_probe()
        .times(1)
        .returning(|_, _| Ok(Presence::Absent));
    // The missing css file never reaches the store; the other four objects do.
    store.expect_put().times(4).returning(|_, _, _, _| Ok(()));

    let result = publish(&j, &assets, &store, &PublishOptions::default()).await;

    match result {
        Err(PublishError::Upload(aggregate)) => {
            assert_eq!(aggregate.failures.len(), 1);
            assert_eq!(aggregate.failures[0].key, "demo/1.0.0/main.abc123.css");
        }
        other => panic!("expected an aggregate upload error, got: {other:?}"),
    }
}

#[tokio::test]
async fn promote_latest_copies_the_urls_manifest_onto_the_alias() {
    let mut store = MockObjectStore::new();
    store
        .expect_copy()
        .withf(|bucket: &str, from: &str, to: &str| {
            bucket == "releases"
                && from == "demo/1.0.0/journey-urls.json"
                && to == "demo/latest/journey-urls.json"
        })
        .times(1)
        .returning(|_, _, _| Ok(()));

    let j = journey("./build", "./asset-manifest.json", "./journey.json");
    promote_latest(&j, &store)
        .await
        .expect("promotion should succeed");
}

#[tokio::test]
async fn promote_latest_rejects_the_reserved_alias_as_source() {
    let store = MockObjectStore::new();

    let mut j = journey("./build", "./asset-manifest.json", "./journey.json");
    j.version = "latest".into();

    match promote_latest(&j, &store).await {
        Err(PromoteError::Reserved(v)) => assert_eq!(v, "latest"),
        other => panic!("expected Reserved, got: {other:?}"),
    }
}
