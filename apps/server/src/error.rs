//! Error types for the pool service

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("invalid request")]
    InvalidRequest(String),

    #[error(transparent)]
    Query(#[from] jmrl_query::Error),

    /// A failed Sierra call, carrying the status the caller should see.
    #[error("{message}")]
    Upstream { status: u16, message: String },

    #[error("{0}")]
    UpstreamParse(#[from] serde_json::Error),

    #[error(transparent)]
    Record(#[from] jmrl_marc::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Error {
    pub fn upstream(status: u16, message: impl Into<String>) -> Self {
        Self::Upstream {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Error::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            Error::Query(jmrl_query::Error::Unsupported { .. }) => StatusCode::NOT_IMPLEMENTED,
            Error::Query(_) => StatusCode::BAD_REQUEST,
            Error::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            Error::UpstreamParse(_) | Error::Record(_) | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Message sent to the client.
    pub fn message(&self) -> String {
        match self {
            Error::Query(
                err @ (jmrl_query::Error::MalformedQuery { .. } | jmrl_query::Error::UnknownField(_)),
            ) => format!("Malformed search: {err}"),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            Error::InvalidRequest(detail) => {
                tracing::error!(detail = %detail, "Unable to parse request");
            }
            Error::Query(jmrl_query::Error::Unsupported { .. }) => {
                tracing::warn!(error = %self, "Unsupported query");
            }
            Error::Query(_) => tracing::info!(error = %self, "Query is not valid"),
            Error::Upstream { .. } => {
                tracing::warn!(status = status.as_u16(), error = %self, "Upstream request failed")
            }
            Error::UpstreamParse(_) | Error::Record(_) | Error::Internal(_) => {
                tracing::error!(error = %self, "Internal error");
            }
        }

        (status, Json(self.message())).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jmrl_query::Field;

    #[test]
    fn query_errors_map_to_client_statuses() {
        let unsupported = Error::from(jmrl_query::Error::Unsupported { field: Field::Date });
        assert_eq!(unsupported.status(), StatusCode::NOT_IMPLEMENTED);
        assert_eq!(unsupported.message(), "Date queries are not supported");

        let malformed = Error::from(jmrl_query::Error::UnknownField("color".to_string()));
        assert_eq!(malformed.status(), StatusCode::BAD_REQUEST);
        assert!(malformed.message().starts_with("Malformed search"));
    }

    #[test]
    fn upstream_status_is_passed_through() {
        let err = Error::upstream(404, "Record not found");
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.message(), "Record not found");

        assert_eq!(Error::upstream(42, "odd").status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn missing_title_is_a_server_error() {
        let err = Error::from(jmrl_marc::Error::MissingRequiredField {
            id: "1".to_string(),
            field: "title",
        });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
