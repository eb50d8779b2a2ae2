//! In-process stand-in for the remote shop service.
//!
//! `MockServer` binds an axum router to `127.0.0.1:0`, answers with canned
//! responses registered per method and path, and records every request it
//! sees so tests can assert on headers and bodies.

use std::sync::{Arc, Mutex};

use axum::{
    extract::State,
    http::{header, HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};

/// Path prefix the mock serves under, mirroring the real `/api` mount
const API_PREFIX: &str = "/api";

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub content_type: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).unwrap_or(Value::Null)
    }
}

struct CannedResponse {
    method: Method,
    path: String,
    status: StatusCode,
    body: Value,
}

#[derive(Default)]
struct MockState {
    routes: Mutex<Vec<CannedResponse>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

pub struct MockServer {
    base_url: String,
    state: Arc<MockState>,
}

impl MockServer {
    pub async fn start() -> Self {
        let state = Arc::new(MockState::default());
        let app = Router::new()
            .fallback(handle)
            .with_state(Arc::clone(&state));

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("failed to bind mock server");
        let addr = listener.local_addr().expect("mock server has no address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self {
            base_url: format!("http://{}{}", addr, API_PREFIX),
            state,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Answer `method path` with `status` and a JSON body. The most recent
    /// registration for a route wins.
    pub fn respond(&self, method: Method, path: &str, status: StatusCode, body: Value) {
        self.state
            .routes
            .lock()
            .expect("routes lock poisoned")
            .push(CannedResponse {
                method,
                path: format!("{}{}", API_PREFIX, path),
                status,
                body,
            });
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state
            .requests
            .lock()
            .expect("requests lock poisoned")
            .clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests().len()
    }

    pub fn last_request(&self) -> RecordedRequest {
        self.requests()
            .pop()
            .expect("mock server has not received any request")
    }
}

async fn handle(
    State(state): State<Arc<MockState>>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: String,
) -> Response {
    let header_value = |name: header::HeaderName| {
        headers
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string)
    };

    let recorded = RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: header_value(header::AUTHORIZATION),
        content_type: header_value(header::CONTENT_TYPE),
        body,
    };
    state
        .requests
        .lock()
        .expect("requests lock poisoned")
        .push(recorded);

    let routes = state.routes.lock().expect("routes lock poisoned");
    match routes
        .iter()
        .rev()
        .find(|r| r.method == method && r.path == uri.path())
    {
        Some(canned) => (canned.status, Json(canned.body.clone())).into_response(),
        None => (StatusCode::NOT_FOUND, Json(json!({"detail": "Not Found"}))).into_response(),
    }
}

// ============================================================================
// Fixtures
// ============================================================================

pub fn user_json(id: i64, email: &str) -> Value {
    json!({
        "id": id,
        "email": email,
        "full_name": null,
        "is_admin": false,
        "created_at": "2024-03-01T10:00:00"
    })
}

pub fn sweet_json(id: i64, name: &str) -> Value {
    json!({
        "id": id,
        "name": name,
        "description": null,
        "category": "Candy",
        "price": 1.5,
        "quantity": 10,
        "image_url": null,
        "created_at": "2024-03-01T10:00:00",
        "updated_at": null
    })
}

pub fn purchase_json(id: i64, sweet_id: i64, quantity: i32) -> Value {
    json!({
        "id": id,
        "user_id": 1,
        "sweet_id": sweet_id,
        "quantity": quantity,
        "total_price": 1.5 * f64::from(quantity),
        "created_at": "2024-03-01T10:00:00",
        "sweet": sweet_json(sweet_id, "Gum")
    })
}
