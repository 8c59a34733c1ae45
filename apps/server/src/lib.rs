//! JMRL search pool
//!
//! A Virgo4 search pool backed by the Jefferson-Madison Regional Library
//! Sierra catalog:
//! - pool queries translated to Sierra search syntax
//! - Sierra bib records normalized to pool record fields
//! - pool identity, health and provider endpoints

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod i18n;
pub mod logging;
pub mod metrics;
pub mod state;
pub mod upstream;

pub use config::Config;
pub use error::{Error, Result};
pub use state::AppState;
