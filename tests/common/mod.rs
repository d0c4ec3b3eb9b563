//! Scripted stand-in for the Azure Resource Manager API.
//!
//! Serves canned JSON per `METHOD path` on a loopback port and records every
//! request it receives, so tests can assert on exactly what went over the wire.

#![allow(dead_code)]

use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, Method, StatusCode, Uri},
    response::{IntoResponse, Response},
    Json, Router,
};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: String,
    pub path: String,
    pub query: Option<String>,
    pub authorization: Option<String>,
    pub body: String,
}

impl RecordedRequest {
    pub fn json_body(&self) -> Value {
        serde_json::from_str(&self.body).unwrap()
    }
}

#[derive(Clone, Default)]
struct MockState {
    responses: Arc<Mutex<HashMap<String, (StatusCode, String)>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub struct MockArm {
    pub base_url: String,
    state: MockState,
}

impl MockArm {
    pub async fn start() -> Self {
        let state = MockState::default();
        let app = Router::new().fallback(handle_any).with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self {
            base_url: format!("http://{}", addr),
            state,
        }
    }

    /// Answer `method path` with `status` and a JSON body
    pub fn respond(&self, method: Method, path: &str, status: StatusCode, body: Value) {
        self.respond_raw(method, path, status, &body.to_string());
    }

    pub fn respond_raw(&self, method: Method, path: &str, status: StatusCode, body: &str) {
        self.state
            .responses
            .lock()
            .unwrap()
            .insert(key(&method, path), (status, body.to_string()));
    }

    /// Answer a GET with an ARM list envelope `{"value": [...]}`
    pub fn list(&self, path: &str, items: Value) {
        self.respond(Method::GET, path, StatusCode::OK, json!({ "value": items }));
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.state.requests.lock().unwrap().clone()
    }

    pub fn requests_with_method(&self, method: &str) -> Vec<RecordedRequest> {
        self.requests()
            .into_iter()
            .filter(|r| r.method == method)
            .collect()
    }
}

fn key(method: &Method, path: &str) -> String {
    format!("{} {}", method, path)
}

async fn handle_any(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    state.requests.lock().unwrap().push(RecordedRequest {
        method: method.to_string(),
        path: uri.path().to_string(),
        query: uri.query().map(str::to_string),
        authorization: headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        body: String::from_utf8_lossy(&body).to_string(),
    });

    let scripted = state
        .responses
        .lock()
        .unwrap()
        .get(&key(&method, uri.path()))
        .cloned();

    match scripted {
        Some((status, body)) => (
            status,
            [(axum::http::header::CONTENT_TYPE, "application/json")],
            body,
        )
            .into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({
                "error": { "code": "ResourceNotFound", "message": format!("no route for {}", uri.path()) }
            })),
        )
            .into_response(),
    }
}

/// Two subscriptions, three groups, three resources (one untagged, one with an
/// empty tag map).
pub fn script_small_tenant(mock: &MockArm) {
    mock.list(
        "/subscriptions",
        json!([
            { "subscriptionId": "sub-1", "displayName": "Production", "state": "Enabled" },
            { "subscriptionId": "sub-2", "displayName": "Staging", "state": "Enabled" }
        ]),
    );
    mock.list(
        "/subscriptions/sub-1/resourcegroups",
        json!([
            { "id": "/subscriptions/sub-1/resourceGroups/rg-web", "name": "rg-web", "location": "westeurope" },
            { "id": "/subscriptions/sub-1/resourceGroups/rg-empty", "name": "rg-empty", "location": "westeurope" }
        ]),
    );
    mock.list(
        "/subscriptions/sub-2/resourcegroups",
        json!([
            { "id": "/subscriptions/sub-2/resourceGroups/rg-data", "name": "rg-data", "location": "northeurope" }
        ]),
    );
    mock.list(
        "/subscriptions/sub-1/resourceGroups/rg-web/resources",
        json!([
            {
                "id": "/subscriptions/sub-1/resourceGroups/rg-web/providers/Microsoft.Web/sites/shop",
                "name": "shop",
                "type": "Microsoft.Web/sites",
                "tags": { "env": "prod", "owner": "web-team" }
            },
            {
                "id": "/subscriptions/sub-1/resourceGroups/rg-web/providers/Microsoft.Storage/storageAccounts/shopassets",
                "name": "shopassets",
                "type": "Microsoft.Storage/storageAccounts"
            }
        ]),
    );
    mock.list("/subscriptions/sub-1/resourceGroups/rg-empty/resources", json!([]));
    mock.list(
        "/subscriptions/sub-2/resourceGroups/rg-data/resources",
        json!([
            {
                "id": "/subscriptions/sub-2/resourceGroups/rg-data/providers/Microsoft.Sql/servers/reports",
                "name": "reports",
                "tags": {}
            }
        ]),
    );
}
