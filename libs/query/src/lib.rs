//! Pool query translation
//!
//! Rewrites a federated pool query (`title: {moby dick} AND author: {melville}`)
//! into the Sierra ILS search syntax (`t:(moby dick) AND a:(melville)`).
//!
//! ```
//! use jmrl_query::{translate, Translation};
//!
//! let Translation::Upstream(q) = translate("keyword: {cats}").unwrap() else {
//!     unreachable!()
//! };
//! assert_eq!(q.as_str(), "(cats)");
//! ```

#![forbid(unsafe_code)]

pub mod ast;
mod error;
mod lexer;
mod parser;
mod token;
mod translate;

pub use ast::{BoolOp, Expr, Field};
pub use error::{Error, Result};
pub use parser::parse;
pub use translate::{
    translate, translate_with, IdentifierPolicy, TranslateOptions, TranslatedQuery, Translation,
    MATCH_ALL,
};
