pub mod fake_sierra;

use anyhow::Context as _;
use axum::{
    body::{Body, Bytes},
    http::{HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode},
    Router,
};
use jmrl_pool::{api::create_router, AppState, Config};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use serde_json::json;
use tower::ServiceExt as _;

pub use fake_sierra::FakeSierra;

pub const JWT_KEY: &str = "test-signing-key";

pub struct TestApp {
    pub router: Router,
    pub state: AppState,
    pub sierra: FakeSierra,
}

impl TestApp {
    pub async fn new() -> anyhow::Result<Self> {
        Self::new_with_config(|_| {}).await
    }

    pub async fn new_with_config(configure: impl FnOnce(&mut Config)) -> anyhow::Result<Self> {
        let sierra = FakeSierra::start().await?;

        let mut config = Config::default();
        config.upstream.api_url = sierra.api_url();
        config.upstream.api_key = "pool-key".to_string();
        config.upstream.api_secret = "pool-secret".to_string();
        config.auth.jwt_key = JWT_KEY.to_string();
        configure(&mut config);
        config
            .validate()
            .map_err(|e| anyhow::anyhow!("invalid test config: {e}"))?;

        let state = AppState::without_token(config).context("initialize AppState")?;
        let router = create_router(state.clone());

        Ok(Self {
            router,
            state,
            sierra,
        })
    }

    /// A signed Virgo4 JWT valid for five minutes.
    pub fn bearer(&self) -> String {
        let exp = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_secs() + 300)
            .unwrap_or_default();
        let token = encode(
            &Header::new(Algorithm::HS256),
            &json!({"userId": "mst3k", "exp": exp}),
            &EncodingKey::from_secret(JWT_KEY.as_bytes()),
        )
        .unwrap_or_default();
        format!("Bearer {token}")
    }

    pub async fn get(&self, path: &str) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        self.request(Method::GET, path, None, &[]).await
    }

    /// Authenticated GET.
    pub async fn api_get(&self, path: &str) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let bearer = self.bearer();
        self.request(Method::GET, path, None, &[("authorization", &bearer)])
            .await
    }

    /// Authenticated JSON POST.
    pub async fn api_post(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let bearer = self.bearer();
        self.request(
            Method::POST,
            path,
            Some(Bytes::from(serde_json::to_vec(&body)?)),
            &[("authorization", &bearer)],
        )
        .await
    }

    pub async fn request(
        &self,
        method: Method,
        path_and_query: &str,
        body: Option<Bytes>,
        extra_headers: &[(&str, &str)],
    ) -> anyhow::Result<(StatusCode, HeaderMap, Bytes)> {
        let mut request = Request::builder()
            .method(method)
            .uri(path_and_query)
            .header("host", "pool.example.org")
            .header("content-type", "application/json")
            .body(match body {
                Some(bytes) => Body::from(bytes),
                None => Body::empty(),
            })
            .context("build request")?;

        for (name, value) in extra_headers {
            request.headers_mut().insert(
                name.parse::<HeaderName>().context("parse header name")?,
                value.parse::<HeaderValue>().context("parse header value")?,
            );
        }

        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .context("dispatch request")?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .context("read response body")?;

        Ok((status, headers, body))
    }
}

pub fn json_body(body: &Bytes) -> anyhow::Result<serde_json::Value> {
    serde_json::from_slice(body).context("parse response JSON")
}
