use serde::{Deserialize, Serialize};

use crate::facet::Facet;
use crate::record::Group;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub rows: usize,
    #[serde(default)]
    pub total: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacetFilter {
    pub facet_id: String,
    pub value: String,
}

/// Facet selections the frontend attached for one pool.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    #[serde(default)]
    pub pool_id: String,
    #[serde(default)]
    pub facets: Vec<FacetFilter>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    pub query: String,
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub filters: Vec<Filter>,
}

/// Whether the request carries a concrete facet selection.
///
/// Next-page requests arrive with a single filter entry that has no facets;
/// that shape is not a selection.
pub fn has_facet_selection(filters: &[Filter]) -> bool {
    match filters {
        [] => false,
        [only] => !only.facets.is_empty(),
        _ => true,
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolResult {
    pub elapsed_ms: u64,
    pub pagination: Pagination,
    #[serde(rename = "group_list")]
    pub groups: Vec<Group>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facet_list: Option<Vec<Facet>>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub confidence: String,
    #[serde(default)]
    pub warnings: Vec<String>,
    pub status_code: u16,
    #[serde(rename = "status_msg", default, skip_serializing_if = "String::is_empty")]
    pub status_message: String,
    /// Sent as the `Content-Language` header, never in the body.
    #[serde(skip)]
    pub content_language: String,
}

impl PoolResult {
    /// A successful result with no hits.
    pub fn empty(confidence: &str) -> Self {
        Self {
            elapsed_ms: 0,
            pagination: Pagination::default(),
            groups: Vec::new(),
            facet_list: None,
            confidence: confidence.to_string(),
            warnings: Vec::new(),
            status_code: 200,
            status_message: String::new(),
            content_language: String::new(),
        }
    }

    /// A failed result carrying the status of whatever went wrong.
    pub fn failed(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            status_message: message.into(),
            ..Self::empty("low")
        }
    }
}

/// Facet response for a pool with no facet support.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FacetsResponse {
    #[serde(rename = "facets")]
    pub facet_list: Vec<Facet>,
}
