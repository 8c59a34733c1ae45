//! Bearer token authentication for the `/api` routes.
//!
//! Virgo4 clients send the JWT minted by the Virgo4 auth service; it is
//! validated against the shared HS256 signing key.

use axum::{
    extract::{FromRequestParts, State},
    http::{header, request::Parts, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// The authenticated caller, attached to request extensions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Principal {
    pub user_id: String,
    pub claims: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    MalformedHeader(String),
    UndefinedToken,
    InvalidToken(String),
}

impl AuthError {
    fn diagnostics(&self) -> String {
        match self {
            Self::MissingToken => "Missing Authorization header".to_string(),
            Self::MalformedHeader(header) => format!("Invalid Authorization header: [{header}]"),
            Self::UndefinedToken => "Bearer token is undefined".to_string(),
            Self::InvalidToken(msg) => format!("JWT signature is invalid: {msg}"),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        tracing::warn!(reason = %self.diagnostics(), "Authentication failed");
        let mut response = StatusCode::UNAUTHORIZED.into_response();
        response.headers_mut().insert(
            header::WWW_AUTHENTICATE,
            header::HeaderValue::from_static("Bearer"),
        );
        response
    }
}

#[derive(Clone)]
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn new(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    pub fn authenticate_headers(&self, headers: &HeaderMap) -> Result<Principal, AuthError> {
        let authz = headers
            .get(header::AUTHORIZATION)
            .ok_or(AuthError::MissingToken)?;
        let authz = authz.to_str().map_err(|_| {
            AuthError::MalformedHeader("Authorization header is not valid UTF-8".to_string())
        })?;

        let token = bearer_token(authz)?;
        if token == "undefined" {
            return Err(AuthError::UndefinedToken);
        }
        self.verify(token)
    }

    pub fn verify(&self, token: &str) -> Result<Principal, AuthError> {
        let data = decode::<serde_json::Value>(token, &self.key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        let user_id = data
            .claims
            .get("userId")
            .or_else(|| data.claims.get("sub"))
            .and_then(|v| v.as_str())
            .unwrap_or_default()
            .to_string();

        Ok(Principal {
            user_id,
            claims: data.claims,
        })
    }
}

/// Exactly two whitespace-separated components: `Bearer` and the token.
fn bearer_token(authorization: &str) -> Result<&str, AuthError> {
    let parts: Vec<&str> = authorization.split_whitespace().collect();
    match parts.as_slice() {
        ["Bearer", token] => Ok(*token),
        _ => Err(AuthError::MalformedHeader(authorization.to_string())),
    }
}

/// Extractor for the principal attached by [`auth_middleware`].
#[derive(Debug, Clone)]
pub struct AuthenticatedPrincipal(pub Principal);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthenticatedPrincipal
where
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthenticatedPrincipal)
            .ok_or_else(|| AuthError::MissingToken.into_response())
    }
}

pub async fn auth_middleware(
    State(state): State<AppState>,
    mut req: axum::extract::Request,
    next: axum::middleware::Next,
) -> Response {
    let Some(verifier) = state.jwt.as_ref() else {
        return next.run(req).await;
    };
    if req.method() == axum::http::Method::OPTIONS {
        return next.run(req).await;
    }

    match verifier.authenticate_headers(req.headers()) {
        Ok(principal) => {
            tracing::debug!(user_id = %principal.user_id, "Authenticated request");
            req.extensions_mut().insert::<Principal>(principal);
            next.run(req).await
        }
        Err(err) => err.into_response(),
    }
}
