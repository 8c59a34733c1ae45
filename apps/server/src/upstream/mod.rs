//! Sierra ILS API access

pub mod client;
pub mod token;

pub use client::{SierraClient, UpstreamHealth, BIB_FIELDS, PAGE_SIZE};
pub use token::TokenCache;
