//! Sierra access token cache
//!
//! Sierra issues short-lived bearer tokens from `POST {api}/token` in
//! exchange for HTTP Basic client credentials. One token is shared by all
//! requests and refreshed once it expires.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::Deserialize;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

use crate::error::{Error, Result};
use crate::metrics;
use crate::upstream::client::read_response;

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    expires_in: u64,
}

#[derive(Debug, Clone)]
struct AccessToken {
    value: String,
    expires_at: Instant,
}

impl AccessToken {
    fn is_fresh(&self) -> bool {
        Instant::now() < self.expires_at
    }
}

pub struct TokenCache {
    http: reqwest::Client,
    token_url: String,
    credentials: String,
    current: RwLock<Option<AccessToken>>,
}

impl TokenCache {
    pub fn new(http: reqwest::Client, token_url: String, key: &str, secret: &str) -> Self {
        Self {
            http,
            token_url,
            credentials: STANDARD.encode(format!("{key}:{secret}")),
            current: RwLock::new(None),
        }
    }

    /// A valid bearer token, refreshing it first if needed.
    ///
    /// Concurrent callers that find the token expired wait on the write lock;
    /// only the first performs the refresh. A failed refresh clears the cached
    /// token and surfaces as 401.
    pub async fn bearer(&self) -> Result<String> {
        {
            let current = self.current.read().await;
            if let Some(token) = current.as_ref().filter(|t| t.is_fresh()) {
                return Ok(token.value.clone());
            }
        }

        let mut current = self.current.write().await;
        if let Some(token) = current.as_ref().filter(|t| t.is_fresh()) {
            return Ok(token.value.clone());
        }

        tracing::info!("Access token has expired; requesting a new one");
        match self.fetch().await {
            Ok(token) => {
                let value = token.value.clone();
                *current = Some(token);
                Ok(value)
            }
            Err(err) => {
                *current = None;
                Err(Error::upstream(401, err.to_string()))
            }
        }
    }

    /// Whole seconds until the cached token expires; zero when there is none.
    pub async fn seconds_remaining(&self) -> u64 {
        self.current
            .read()
            .await
            .as_ref()
            .map(|t| t.expires_at.saturating_duration_since(Instant::now()).as_secs())
            .unwrap_or(0)
    }

    /// Drop the cached token so the next call refreshes.
    pub async fn invalidate(&self) {
        *self.current.write().await = None;
    }

    async fn fetch(&self) -> Result<AccessToken> {
        let start = Instant::now();
        let result = self
            .http
            .post(&self.token_url)
            .header(
                reqwest::header::AUTHORIZATION,
                format!("Basic {}", self.credentials),
            )
            .send()
            .await;
        let result = read_response(&self.token_url, result).await;
        let elapsed = start.elapsed();

        let body = match result {
            Ok(body) => body,
            Err(err) => {
                metrics::record_upstream("token", err.status().as_u16(), elapsed.as_secs_f64());
                metrics::TOKEN_REFRESHES_TOTAL
                    .with_label_values(&["failure"])
                    .inc();
                tracing::error!(
                    url = %self.token_url,
                    elapsed_ms = elapsed.as_millis() as u64,
                    error = %err,
                    "Failed to obtain Sierra access token"
                );
                return Err(err);
            }
        };
        metrics::record_upstream("token", 200, elapsed.as_secs_f64());

        let parsed: TokenResponse = serde_json::from_slice(&body).map_err(|err| {
            metrics::TOKEN_REFRESHES_TOTAL
                .with_label_values(&["failure"])
                .inc();
            tracing::error!(error = %err, "Unable to parse Sierra token response");
            Error::from(err)
        })?;

        metrics::TOKEN_REFRESHES_TOTAL
            .with_label_values(&["success"])
            .inc();
        tracing::info!(
            expires_in = parsed.expires_in,
            elapsed_ms = elapsed.as_millis() as u64,
            "Sierra authentication successful"
        );

        Ok(AccessToken {
            value: parsed.access_token,
            expires_at: Instant::now() + Duration::from_secs(parsed.expires_in),
        })
    }
}
