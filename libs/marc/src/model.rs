//! Sierra bib records as returned with `fields=default,varFields,locations,available`

use serde::{Deserialize, Serialize};

/// A code with its display value (or name, for locations).
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeValue {
    #[serde(default)]
    pub code: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl CodeValue {
    pub fn value_or_empty(&self) -> &str {
        self.value.as_deref().unwrap_or_default()
    }

    pub fn name_or_empty(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MarcSubfield {
    #[serde(default)]
    pub tag: String,
    #[serde(default)]
    pub content: String,
}

/// A MARC variable field: three-character tag plus subfields in record order.
///
/// Control fields come back with `content` and no subfields; they keep an
/// empty subfield list here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariableField {
    #[serde(default)]
    pub marc_tag: String,
    #[serde(default)]
    pub subfields: Vec<MarcSubfield>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BibRecord {
    pub id: String,
    #[serde(default)]
    pub publish_year: i32,
    #[serde(default)]
    pub lang: CodeValue,
    #[serde(default)]
    pub material_type: CodeValue,
    #[serde(default)]
    pub locations: Vec<CodeValue>,
    #[serde(default)]
    pub available: bool,
    #[serde(default)]
    pub var_fields: Vec<VariableField>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchEntry {
    #[serde(default)]
    pub relevance: f32,
    pub bib: BibRecord,
}

/// One page of `bibs/search` results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchPage {
    #[serde(default)]
    pub count: usize,
    #[serde(default)]
    pub total: usize,
    #[serde(default)]
    pub start: usize,
    #[serde(default)]
    pub entries: Vec<SearchEntry>,
}
