//! A stand-in Sierra API served on an ephemeral local port.

use anyhow::Context as _;
use axum::{
    extract::{Path, RawQuery, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::{
    atomic::{AtomicU64, AtomicUsize, Ordering},
    Arc, Mutex,
};
use std::time::Duration;

const ACCESS_TOKEN: &str = "fake-sierra-token";

/// Forced response for the search endpoint.
#[derive(Debug, Clone)]
pub enum SearchBehavior {
    Hits,
    Status(u16, String),
    Garbage,
    /// Answer with hits after a delay.
    Slow(Duration),
}

#[derive(Clone)]
struct FakeState {
    token_requests: Arc<AtomicUsize>,
    /// Tokens from earlier generations are refused.
    token_generation: Arc<AtomicUsize>,
    token_lifetime: Arc<AtomicU64>,
    search_queries: Arc<Mutex<Vec<String>>>,
    search_behavior: Arc<Mutex<SearchBehavior>>,
}

impl FakeState {
    fn current_token(&self) -> String {
        format!(
            "{ACCESS_TOKEN}-{}",
            self.token_generation.load(Ordering::SeqCst)
        )
    }
}

pub struct FakeSierra {
    addr: SocketAddr,
    state: FakeState,
}

impl FakeSierra {
    pub async fn start() -> anyhow::Result<Self> {
        let state = FakeState {
            token_requests: Arc::new(AtomicUsize::new(0)),
            token_generation: Arc::new(AtomicUsize::new(0)),
            token_lifetime: Arc::new(AtomicU64::new(3600)),
            search_queries: Arc::new(Mutex::new(Vec::new())),
            search_behavior: Arc::new(Mutex::new(SearchBehavior::Hits)),
        };

        let app = Router::new()
            .route("/iii/sierra-api/about", get(|| async { Json(json!({"version": "6.0"})) }))
            .route("/iii/sierra-api/v5/token", post(token))
            .route("/iii/sierra-api/v5/bibs/search", get(search))
            .route("/iii/sierra-api/v5/bibs/:id", get(bib))
            .with_state(state.clone());

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .context("bind fake sierra")?;
        let addr = listener.local_addr()?;
        tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Ok(Self { addr, state })
    }

    pub fn api_url(&self) -> String {
        format!("http://{}/iii/sierra-api/v5", self.addr)
    }

    pub fn token_requests(&self) -> usize {
        self.state.token_requests.load(Ordering::SeqCst)
    }

    /// Raw query strings received by the search endpoint, oldest first.
    pub fn search_queries(&self) -> Vec<String> {
        self.state
            .search_queries
            .lock()
            .map(|q| q.clone())
            .unwrap_or_default()
    }

    pub fn set_search_behavior(&self, behavior: SearchBehavior) {
        if let Ok(mut current) = self.state.search_behavior.lock() {
            *current = behavior;
        }
    }

    /// `expires_in` reported for tokens issued from now on.
    pub fn set_token_lifetime(&self, seconds: u64) {
        self.state.token_lifetime.store(seconds, Ordering::SeqCst);
    }

    /// Stop accepting every token issued so far.
    pub fn revoke_tokens(&self) {
        self.state.token_generation.fetch_add(1, Ordering::SeqCst);
    }
}

fn authorized(state: &FakeState, headers: &HeaderMap) -> bool {
    let bearer = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(|v| v == format!("Bearer {}", state.current_token()))
        .unwrap_or(false);
    let flag = |name: &str| headers.get(name).and_then(|v| v.to_str().ok()) == Some("false");
    bearer && flag("deleted") && flag("suppressed")
}

async fn token(State(state): State<FakeState>, headers: HeaderMap) -> Response {
    state.token_requests.fetch_add(1, Ordering::SeqCst);
    // base64("pool-key:pool-secret")
    let expected = "Basic cG9vbC1rZXk6cG9vbC1zZWNyZXQ=";
    if headers.get("authorization").and_then(|v| v.to_str().ok()) != Some(expected) {
        return (StatusCode::UNAUTHORIZED, "invalid client credentials").into_response();
    }
    Json(json!({
        "access_token": state.current_token(),
        "token_type": "bearer",
        "expires_in": state.token_lifetime.load(Ordering::SeqCst),
    }))
    .into_response()
}

async fn search(
    State(state): State<FakeState>,
    headers: HeaderMap,
    RawQuery(query): RawQuery,
) -> Response {
    if !authorized(&state, &headers) {
        return (StatusCode::UNAUTHORIZED, "missing token").into_response();
    }
    if let Ok(mut queries) = state.search_queries.lock() {
        queries.push(query.unwrap_or_default());
    }

    let behavior = state
        .search_behavior
        .lock()
        .map(|b| b.clone())
        .unwrap_or(SearchBehavior::Hits);
    match behavior {
        SearchBehavior::Hits => hits().into_response(),
        SearchBehavior::Slow(delay) => {
            tokio::time::sleep(delay).await;
            hits().into_response()
        }
        SearchBehavior::Status(status, body) => (
            StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body,
        )
            .into_response(),
        SearchBehavior::Garbage => (StatusCode::OK, "<html>not json</html>").into_response(),
    }
}

fn hits() -> Json<Value> {
    Json(json!({
        "count": 2,
        "total": 2,
        "start": 0,
        "entries": [
            {"relevance": 9.5, "bib": moby_dick()},
            {"relevance": 1.0, "bib": {"id": "1000002", "available": false, "varFields": []}}
        ]
    }))
}

async fn bib(
    State(state): State<FakeState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Response {
    if !authorized(&state, &headers) {
        return (StatusCode::UNAUTHORIZED, "missing token").into_response();
    }
    match id.as_str() {
        "1000001" => Json(moby_dick()).into_response(),
        "1000002" => Json(json!({"id": "1000002", "varFields": []})).into_response(),
        _ => (StatusCode::NOT_FOUND, "Record not found").into_response(),
    }
}

pub fn moby_dick() -> Value {
    json!({
        "id": "1000001",
        "publishYear": 1851,
        "lang": {"code": "eng", "name": "English", "value": "English"},
        "materialType": {"code": "z", "value": "E-BOOK"},
        "locations": [{"code": "cen", "name": "Central Library"}],
        "available": true,
        "varFields": [
            {"marcTag": "100", "subfields": [{"tag": "a", "content": "Melville, Herman"}]},
            {"marcTag": "245", "subfields": [
                {"tag": "a", "content": "Moby Dick, or, The whale /"},
                {"tag": "c", "content": "Herman Melville."}
            ]},
            {"marcTag": "650", "subfields": [{"tag": "a", "content": "Whaling."}]},
            {"marcTag": "650", "subfields": [{"tag": "a", "content": "Sea stories."}]},
            {"marcTag": "856", "subfields": [{"tag": "u", "content": "https://jmrl.overdrive.com/media/1851"}]}
        ]
    })
}
