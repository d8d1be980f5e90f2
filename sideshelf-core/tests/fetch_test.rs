//! Manifest fetching and merging against a stub transport

mod common;

use async_trait::async_trait;
use common::{
    fetcher, init_test_logging, location, manifest, manifest_url, StubResponse, StubTransport,
};
use pretty_assertions::assert_eq;
use serde_json::json;
use sideshelf_core::catalog::{CatalogSelection, ManifestFetcher, ManifestTransport};
use sideshelf_core::FetchError;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Barrier;

#[tokio::test]
async fn test_standard_is_a_single_request() {
    init_test_logging();
    let transport = StubTransport::new();
    transport.respond_json(
        CatalogSelection::Standard,
        manifest(&[("a.b", "Foo", 100, "2024-01-01")]),
    );

    let apps = fetcher(&transport)
        .load_catalog(CatalogSelection::Standard)
        .await
        .unwrap();

    assert_eq!(apps.len(), 1);
    assert_eq!(transport.calls(), 1);
    assert_eq!(
        transport.requested(),
        vec!["https://cdn.test/repo/sources/standard/source.json".to_string()]
    );
}

#[tokio::test]
async fn test_all_merges_standard_before_nsfw() {
    init_test_logging();
    let transport = StubTransport::new();
    transport.respond_json(
        CatalogSelection::Standard,
        manifest(&[("x", "Standard X", 10, "2024-01-01"), ("s", "Only Standard", 5, "2024-01-02")]),
    );
    transport.respond_json(
        CatalogSelection::Nsfw,
        manifest(&[("x", "Nsfw X", 99, "2024-03-01"), ("n", "Only Nsfw", 7, "2024-01-03")]),
    );

    let load = fetcher(&transport)
        .load_catalog_detailed(CatalogSelection::All)
        .await
        .unwrap();

    let names: Vec<&str> = load.apps.iter().map(|app| app.name.as_str()).collect();
    assert_eq!(names, vec!["Standard X", "Only Standard", "Only Nsfw"]);
    assert!(!load.is_partial());
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn test_all_with_failed_standard_is_partial_not_error() {
    init_test_logging();
    let transport = StubTransport::new();
    transport.respond(CatalogSelection::Standard, StubResponse::Status(500));
    transport.respond_json(
        CatalogSelection::Nsfw,
        manifest(&[("n.one", "Solo", 1, "2024-01-01")]),
    );

    let load = fetcher(&transport)
        .load_catalog_detailed(CatalogSelection::All)
        .await
        .unwrap();

    assert_eq!(load.apps.len(), 1);
    assert_eq!(load.apps[0].name, "Solo");
    assert_eq!(load.missing, vec![CatalogSelection::Standard]);
    // Both requests ran even though one failed
    assert_eq!(transport.calls(), 2);
}

#[tokio::test]
async fn test_all_with_both_failing_reports_both_causes() {
    init_test_logging();
    let transport = StubTransport::new();
    transport.respond(CatalogSelection::Standard, StubResponse::Status(503));
    transport.respond(CatalogSelection::Nsfw, StubResponse::Offline);

    let err = fetcher(&transport)
        .load_catalog(CatalogSelection::All)
        .await
        .unwrap_err();

    match err {
        FetchError::AllSourcesFailed { standard, nsfw } => {
            assert_eq!(standard.status(), Some(503));
            assert_eq!(nsfw.kind(), "network");
        }
        other => panic!("expected AllSourcesFailed, got {other:?}"),
    }
}

#[tokio::test]
async fn test_status_and_network_errors_pass_through() {
    let transport = StubTransport::new();
    transport.respond(CatalogSelection::Standard, StubResponse::Status(404));
    transport.respond(CatalogSelection::Nsfw, StubResponse::Offline);
    let fetcher = fetcher(&transport);

    let err = fetcher
        .load_catalog(CatalogSelection::Standard)
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert!(err.to_string().contains(&manifest_url(CatalogSelection::Standard)));

    let err = fetcher.load_catalog(CatalogSelection::Nsfw).await.unwrap_err();
    assert_eq!(err.kind(), "network");
}

#[tokio::test]
async fn test_malformed_body_is_a_decode_error() {
    let transport = StubTransport::new();
    transport.respond(
        CatalogSelection::Standard,
        StubResponse::Body("<html>not json</html>".to_string()),
    );

    let err = fetcher(&transport)
        .load_catalog(CatalogSelection::Standard)
        .await
        .unwrap_err();
    assert_eq!(err.kind(), "decode");
}

#[tokio::test]
async fn test_missing_or_null_apps_is_an_empty_catalog() {
    let transport = StubTransport::new();
    transport.respond_json(CatalogSelection::Standard, json!({ "name": "Source" }));
    transport.respond_json(CatalogSelection::Nsfw, json!({ "apps": null }));
    let fetcher = fetcher(&transport);

    assert!(fetcher
        .load_catalog(CatalogSelection::Standard)
        .await
        .unwrap()
        .is_empty());
    assert!(fetcher
        .load_catalog(CatalogSelection::Nsfw)
        .await
        .unwrap()
        .is_empty());
}

/// Parks each request on a shared barrier before answering it
struct RendezvousTransport {
    barrier: Barrier,
    bodies: HashMap<String, String>,
}

#[async_trait]
impl ManifestTransport for RendezvousTransport {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        self.barrier.wait().await;
        self.bodies
            .get(url)
            .cloned()
            .ok_or_else(|| FetchError::Status {
                url: url.to_string(),
                status: 404,
            })
    }

    fn name(&self) -> &'static str {
        "rendezvous"
    }
}

#[tokio::test]
async fn test_all_requests_both_sources_concurrently() {
    init_test_logging();
    let bodies = HashMap::from([
        (
            manifest_url(CatalogSelection::Standard),
            manifest(&[("s", "Standard", 1, "2024-01-01")]).to_string(),
        ),
        (
            manifest_url(CatalogSelection::Nsfw),
            manifest(&[("n", "Nsfw", 1, "2024-01-02")]).to_string(),
        ),
    ]);
    let transport: Arc<dyn ManifestTransport> = Arc::new(RendezvousTransport {
        barrier: Barrier::new(2),
        bodies,
    });
    let fetcher = ManifestFetcher::new(transport, location());

    // Sequential requests would park the first one on the barrier forever
    let apps = tokio::time::timeout(
        Duration::from_secs(5),
        fetcher.load_catalog(CatalogSelection::All),
    )
    .await
    .expect("standard and nsfw were not requested concurrently")
    .unwrap();

    let names: Vec<&str> = apps.iter().map(|app| app.name.as_str()).collect();
    assert_eq!(names, vec!["Standard", "Nsfw"]);
}
