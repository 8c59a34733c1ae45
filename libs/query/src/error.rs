use thiserror::Error;

use crate::ast::Field;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The query scopes a field the upstream catalog cannot search at all.
    #[error("{} queries are not supported", .field.label())]
    Unsupported { field: Field },

    #[error("malformed query at byte {pos}: {message}")]
    MalformedQuery { pos: usize, message: String },

    #[error("unknown search field '{0}'")]
    UnknownField(String),
}

impl Error {
    pub(crate) fn malformed(pos: usize, message: impl Into<String>) -> Self {
        Self::MalformedQuery {
            pos,
            message: message.into(),
        }
    }
}
