//! Stub WeatherAPI.com server for unit tests.
//!
//! An axum router on `127.0.0.1:0` serving canned responses keyed by endpoint
//! name (e.g. `"forecast.json"`) under `/v1/`, recording every request URI.

use std::{
    collections::HashMap,
    net::SocketAddr,
    sync::{Arc, Mutex},
    time::Duration,
};

use axum::{
    Router,
    extract::{Path, State},
    http::{StatusCode, Uri, header},
    response::{IntoResponse, Response},
    routing::get,
};
use tokio::net::TcpListener;

#[derive(Debug, Clone)]
pub struct StubRoute {
    pub status: u16,
    pub body: String,
    pub delay: Option<Duration>,
}

impl StubRoute {
    pub fn json(status: u16, body: &serde_json::Value) -> Self {
        Self { status, body: body.to_string(), delay: None }
    }

    pub fn text(status: u16, body: &str) -> Self {
        Self { status, body: body.to_string(), delay: None }
    }

    pub fn delayed(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

#[derive(Clone)]
struct StubState {
    routes: Arc<HashMap<String, StubRoute>>,
    requests: Arc<Mutex<Vec<String>>>,
}

pub struct StubProvider {
    pub addr: SocketAddr,
    requests: Arc<Mutex<Vec<String>>>,
}

impl StubProvider {
    pub async fn start(routes: Vec<(&'static str, StubRoute)>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = StubState {
            routes: Arc::new(routes.into_iter().map(|(e, r)| (e.to_string(), r)).collect()),
            requests: requests.clone(),
        };

        let app = Router::new().route("/v1/{endpoint}", get(serve_endpoint)).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind stub provider");
        let addr = listener.local_addr().expect("stub provider address");
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, requests }
    }

    /// Base URL in the provider's `{host}/v1` form.
    pub fn base_url(&self) -> String {
        format!("http://{}/v1", self.addr)
    }

    /// Request targets (path and query) received so far.
    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().expect("stub request log").clone()
    }
}

async fn serve_endpoint(
    State(state): State<StubState>,
    Path(endpoint): Path<String>,
    uri: Uri,
) -> Response {
    state.requests.lock().expect("stub request log").push(uri.to_string());

    let Some(route) = state.routes.get(&endpoint).cloned() else {
        return (StatusCode::NOT_FOUND, "no such stub route").into_response();
    };

    if let Some(delay) = route.delay {
        tokio::time::sleep(delay).await;
    }

    let status = StatusCode::from_u16(route.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, [(header::CONTENT_TYPE, "application/json")], route.body).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn serves_routes_and_records_requests() {
        let stub = StubProvider::start(vec![(
            "current.json",
            StubRoute::json(200, &serde_json::json!({ "ok": true })),
        )])
        .await;
        let client = reqwest::Client::new();

        let resp =
            client.get(format!("{}/current.json?q=Oslo", stub.base_url())).send().await.unwrap();
        assert_eq!(resp.status().as_u16(), 200);
        assert_eq!(resp.text().await.unwrap(), r#"{"ok":true}"#);

        let resp = client.get(format!("{}/search.json", stub.base_url())).send().await.unwrap();
        assert_eq!(resp.status().as_u16(), 404);

        assert_eq!(stub.requests(), ["/v1/current.json?q=Oslo", "/v1/search.json"]);
    }
}
