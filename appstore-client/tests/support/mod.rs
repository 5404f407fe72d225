//! In-process fake backend for client integration tests.

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::Router;
use axum::http::{HeaderMap, Method, StatusCode, Uri, header};
use client::{AppStoreClient, MemoryTokenStore, TokenStore};
use tokio::net::TcpListener;

/// A request as the fake backend saw it.
#[derive(Debug, Clone)]
pub struct Recorded {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

#[derive(Debug, Clone)]
struct Canned {
    status: u16,
    body: String,
    delay: Option<Duration>,
}

/// Answers canned responses by method and path and records every request.
#[derive(Debug, Clone, Default)]
pub struct FakeBackend {
    routes: Arc<Mutex<HashMap<(String, String), Canned>>>,
    log: Arc<Mutex<Vec<Recorded>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, method: &str, path: &str, status: u16, body: &str) -> Self {
        self.insert(method, path, status, body, None);
        self
    }

    pub fn respond_slowly(
        self,
        method: &str,
        path: &str,
        status: u16,
        body: &str,
        delay: Duration,
    ) -> Self {
        self.insert(method, path, status, body, Some(delay));
        self
    }

    fn insert(&self, method: &str, path: &str, status: u16, body: &str, delay: Option<Duration>) {
        self.routes.lock().unwrap().insert(
            (method.to_string(), path.to_string()),
            Canned {
                status,
                body: body.to_string(),
                delay,
            },
        );
    }

    /// Binds an ephemeral port and returns the base URL.
    pub async fn start(&self) -> String {
        let backend = self.clone();
        let app = Router::new().fallback(
            move |method: Method, uri: Uri, headers: HeaderMap, body: String| {
                let backend = backend.clone();
                async move { backend.handle(&method, &uri, &headers, body).await }
            },
        );

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}")
    }

    async fn handle(
        &self,
        method: &Method,
        uri: &Uri,
        headers: &HeaderMap,
        body: String,
    ) -> (StatusCode, String) {
        let header_text = |name: header::HeaderName| {
            headers
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        self.log.lock().unwrap().push(Recorded {
            method: method.to_string(),
            path: uri.path().to_string(),
            query: uri.query().map(str::to_string),
            authorization: header_text(header::AUTHORIZATION),
            content_type: header_text(header::CONTENT_TYPE),
            body,
        });

        let canned = self
            .routes
            .lock()
            .unwrap()
            .get(&(method.to_string(), uri.path().to_string()))
            .cloned();

        match canned {
            Some(canned) => {
                if let Some(delay) = canned.delay {
                    tokio::time::sleep(delay).await;
                }
                (
                    StatusCode::from_u16(canned.status).unwrap(),
                    canned.body,
                )
            }
            None => (
                StatusCode::NOT_FOUND,
                r#"{"detail":"Not Found"}"#.to_string(),
            ),
        }
    }

    pub fn requests(&self) -> Vec<Recorded> {
        self.log.lock().unwrap().clone()
    }

    pub fn requests_to(&self, path: &str) -> Vec<Recorded> {
        self.requests()
            .into_iter()
            .filter(|request| request.path == path)
            .collect()
    }
}

/// Client against `base_url` backed by a memory store holding `token`.
pub fn client_with_token(base_url: &str, token: Option<&str>) -> (AppStoreClient, Arc<MemoryTokenStore>) {
    let store = Arc::new(MemoryTokenStore::new());
    store.set(token);
    let tokens: Arc<dyn TokenStore> = store.clone();
    (AppStoreClient::new(base_url, tokens), store)
}

pub const PROFILE: &str = r#"{"id": 1, "email": "a@b.com", "display_name": "Ada"}"#;
