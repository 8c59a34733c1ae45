use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("bib {id} has no {field}")]
    MissingRequiredField { id: String, field: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
