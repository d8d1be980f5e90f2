//! Shared helpers for integration tests
//!
//! `StubTransport` stands in for HTTP: responses are keyed by manifest URL
//! and every request is counted, so tests can assert on network activity.

#![allow(dead_code)]

use async_trait::async_trait;
use serde_json::{json, Value};
use sideshelf_core::catalog::{
    CatalogSelection, ManifestFetcher, ManifestTransport, SourceLocation,
};
use sideshelf_core::state::MemoryFragmentStore;
use sideshelf_core::{CatalogSession, FetchError};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};

pub const BASE: &str = "https://cdn.test/repo/";

static INIT: Once = Once::new();

/// Initialize logging for tests (only once per test run)
pub fn init_test_logging() {
    INIT.call_once(|| {
        use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

        let _ = tracing_subscriber::registry()
            .with(
                tracing_subscriber::fmt::layer()
                    .with_test_writer()
                    .with_target(true)
                    .with_level(true),
            )
            .with(tracing_subscriber::filter::EnvFilter::from_default_env())
            .try_init();
    });
}

/// Canned reply for one URL
#[derive(Debug, Clone)]
pub enum StubResponse {
    Body(String),
    Status(u16),
    Offline,
}

#[derive(Default)]
pub struct StubTransport {
    responses: Mutex<HashMap<String, StubResponse>>,
    calls: AtomicUsize,
    requested: Mutex<Vec<String>>,
}

impl StubTransport {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn respond(&self, selection: CatalogSelection, response: StubResponse) {
        let url = manifest_url(selection);
        self.responses.lock().unwrap().insert(url, response);
    }

    pub fn respond_json(&self, selection: CatalogSelection, body: Value) {
        self.respond(selection, StubResponse::Body(body.to_string()));
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl ManifestTransport for StubTransport {
    async fn get(&self, url: &str) -> Result<String, FetchError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().unwrap().push(url.to_string());

        let response = self.responses.lock().unwrap().get(url).cloned();
        match response {
            Some(StubResponse::Body(body)) => Ok(body),
            Some(StubResponse::Status(status)) => Err(FetchError::Status {
                url: url.to_string(),
                status,
            }),
            Some(StubResponse::Offline) => Err(FetchError::network(url, "connection refused")),
            None => Err(FetchError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }

    fn name(&self) -> &'static str {
        "stub"
    }
}

pub fn location() -> SourceLocation {
    SourceLocation::new(BASE, "http://localhost:8000/", false)
}

pub fn manifest_url(selection: CatalogSelection) -> String {
    location()
        .manifest_url(selection)
        .expect("concrete selection has a manifest")
}

pub fn fetcher(transport: &Arc<StubTransport>) -> ManifestFetcher {
    let transport: Arc<dyn ManifestTransport> = transport.clone();
    ManifestFetcher::new(transport, location())
}

pub fn session(transport: &Arc<StubTransport>) -> CatalogSession {
    CatalogSession::new(fetcher(transport), Box::new(MemoryFragmentStore::new()))
}

/// Manifest body with one record per `(bundle id, name, size, date)`
pub fn manifest(records: &[(&str, &str, u64, &str)]) -> Value {
    let apps: Vec<Value> = records
        .iter()
        .map(|(id, name, size, date)| {
            json!({
                "bundleIdentifier": id,
                "name": name,
                "size": size,
                "versionDate": date,
            })
        })
        .collect();
    json!({ "apps": apps })
}

pub fn names(apps: &[&sideshelf_core::catalog::AppRecord]) -> Vec<String> {
    apps.iter().map(|app| app.name.clone()).collect()
}
