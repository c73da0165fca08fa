//! In-process fake of the workflow host and tabular store.

use std::net::SocketAddr;
use std::sync::{Arc, Mutex};

use axum::Router;
use axum::body::to_bytes;
use axum::extract::{Request, State};
use axum::http::{HeaderMap, Method, StatusCode};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use url::Url;

/// A request as seen by the fake server.
#[derive(Debug, Clone)]
pub struct SeenRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl SeenRequest {
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_slice(&self.body).unwrap()
    }
}

type Seen = Arc<Mutex<Vec<SeenRequest>>>;

pub struct TestServer {
    addr: SocketAddr,
    seen: Seen,
}

impl TestServer {
    pub async fn start() -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let seen = Seen::default();

        let router = Router::new().fallback(handle).with_state(seen.clone());
        tokio::spawn(async move {
            axum::serve(listener, router).await.unwrap();
        });

        Self { addr, seen }
    }

    pub fn url(&self) -> Url {
        Url::parse(&format!("http://{}", self.addr)).unwrap()
    }

    pub fn last_request(&self) -> Option<SeenRequest> {
        self.seen.lock().unwrap().last().cloned()
    }
}

async fn handle(State(seen): State<Seen>, request: Request) -> (StatusCode, String) {
    let (parts, body) = request.into_parts();
    let body = to_bytes(body, usize::MAX).await.unwrap().to_vec();

    let request = SeenRequest {
        method: parts.method.to_string(),
        path: parts.uri.path().to_owned(),
        query: parts.uri.query().map(str::to_owned),
        headers: parts.headers,
        body,
    };
    seen.lock().unwrap().push(request.clone());

    let segments: Vec<&str> = request.path.trim_start_matches('/').split('/').collect();
    let (status, body) = match (&parts.method, segments.as_slice()) {
        (_, ["api", "v1", "workflows", ..]) if request.header("x-n8n-api-key") != Some("test-key") => {
            (StatusCode::UNAUTHORIZED, json!({"message": "unauthorized"}))
        }
        (&Method::GET, ["api", "v1", "workflows", id]) => {
            (StatusCode::OK, json!({"id": id, "name": "Fixture", "nodes": [], "connections": {}}))
        }
        (&Method::POST, ["api", "v1", "workflows"]) => {
            let mut created = request.json();
            created["id"] = json!("created-1");
            (StatusCode::OK, created)
        }
        (&Method::PUT, ["api", "v1", "workflows", id]) => {
            let mut updated = request.json();
            updated["id"] = json!(id);
            (StatusCode::OK, updated)
        }
        (&Method::POST, ["webhook", "ugc-video-generate" | "ugc-video-generate-v2"]) => {
            (StatusCode::OK, json!({"message": "Workflow was started"}))
        }
        (&Method::GET, ["rest", "v1", "videos"]) => {
            let id = request
                .query
                .as_deref()
                .and_then(|query| query.split('&').find_map(|pair| pair.strip_prefix("id=eq.")))
                .unwrap_or_default();
            match id {
                "missing" => (StatusCode::OK, json!([])),
                id => (StatusCode::OK, json!([{"id": id, "status": "processing"}])),
            }
        }
        (&Method::POST, ["rest", "v1", _]) => {
            (StatusCode::CREATED, json!([request.json()]))
        }
        _ => (StatusCode::NOT_FOUND, json!({"message": "not found"})),
    };

    (status, body.to_string())
}
