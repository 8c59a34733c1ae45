//! Federated search pool protocol types
//!
//! The shapes exchanged between a search pool and the meta-search frontend:
//! search requests, pool results made of grouped records, pool identity and
//! the (always empty) facet response.

#![forbid(unsafe_code)]

mod facet;
mod identity;
mod record;
mod search;

pub use facet::{Bucket, Facet};
pub use identity::{PoolAttribute, PoolIdentity, PoolProviders, ProviderDetails};
pub use record::{Group, Record, RecordField};
pub use search::{
    has_facet_selection, FacetFilter, FacetsResponse, Filter, Pagination, PoolResult,
    SearchRequest,
};
