//! In-process mock backends and fixtures for exercising the runtime without
//! the hosted service.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::extract::Request;
use axum::middleware::Next;
use axum::Router;
use serde_json::{json, Value};

use crate::api::ApiClient;
use crate::config::Config;
use crate::token_store::TokenStore;

/// Binds an ephemeral port, serves `router` on it, and returns the base URL.
pub async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A gateway wired to a temp token store and a short request timeout.
pub struct TestClient {
    pub api: ApiClient,
    pub tokens: TokenStore,
    _dir: tempfile::TempDir,
}

pub fn test_config(base_url: &str, token_path: std::path::PathBuf) -> Config {
    Config {
        api_base_url: base_url.to_string(),
        request_timeout: Duration::from_millis(500),
        token_path,
        rust_log: "debug".to_string(),
    }
}

pub fn test_client(base_url: &str) -> TestClient {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(base_url, dir.path().join("credentials"));
    let tokens = TokenStore::new(config.token_path.clone());
    TestClient {
        api: ApiClient::new(&config, tokens.clone()),
        tokens,
        _dir: dir,
    }
}

pub fn profile_json(name: &str) -> Value {
    json!({
        "_id": "u-1",
        "name": name,
        "email": "a@b.com",
        "defaultCoverLetter": "Dear Hiring Team,",
    })
}

/// Counts every request a router serves; lets tests assert "no network call".
#[derive(Clone, Default)]
pub struct CallCounter {
    hits: Arc<AtomicUsize>,
}

impl CallCounter {
    pub fn total(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn count_all(&self, router: Router) -> Router {
        let hits = self.hits.clone();
        router.layer(axum::middleware::from_fn(
            move |req: Request, next: Next| {
                let hits = hits.clone();
                async move {
                    hits.fetch_add(1, Ordering::SeqCst);
                    next.run(req).await
                }
            },
        ))
    }
}
