//! Shared application state

use std::sync::Arc;

use crate::auth::JwtVerifier;
use crate::config::Config;
use crate::error::Result;
use crate::upstream::SierraClient;

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub sierra: SierraClient,
    /// `None` when authentication is disabled.
    pub jwt: Option<Arc<JwtVerifier>>,
}

impl AppState {
    /// Build the state and try to obtain a first Sierra token. A failed
    /// token request is logged; the next API call retries it.
    pub async fn new(config: Config) -> Result<Self> {
        let state = Self::without_token(config)?;
        if let Err(err) = state.sierra.tokens().bearer().await {
            tracing::warn!(error = %err, "Initial Sierra authentication failed");
        }
        Ok(state)
    }

    /// Build the state without contacting Sierra.
    pub fn without_token(config: Config) -> Result<Self> {
        let sierra = SierraClient::new(&config.upstream)?;
        let jwt = config
            .auth
            .enabled
            .then(|| Arc::new(JwtVerifier::new(&config.auth.jwt_key)));

        Ok(Self {
            config: Arc::new(config),
            sierra,
            jwt,
        })
    }
}
