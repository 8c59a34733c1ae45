//! Sierra bib records and their mapping onto pool record fields.

#![forbid(unsafe_code)]

mod error;
mod extract;
mod model;
mod normalize;

pub use error::{Error, Result};
pub use extract::{extract, extract_first, strip_trailing_punctuation, Subfield};
pub use model::{BibRecord, CodeValue, MarcSubfield, SearchEntry, SearchPage, VariableField};
pub use normalize::{normalize, Availability, LIBRARY_NAME, SUBJECT_TAGS};
