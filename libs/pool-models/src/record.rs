use serde::{Deserialize, Serialize};

/// A single named value of a pool record.
///
/// Optional members are omitted from the wire format when empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordField {
    pub name: String,
    #[serde(rename = "type", default, skip_serializing_if = "String::is_empty")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub citation_part: Option<String>,
}

impl RecordField {
    /// Field whose name doubles as its type.
    pub fn new(name: &str, label: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            kind: name.to_string(),
            label: label.to_string(),
            value: value.into(),
            ..Default::default()
        }
    }

    pub fn with_kind(mut self, kind: &str) -> Self {
        self.kind = kind.to_string();
        self
    }

    pub fn detailed(mut self) -> Self {
        self.visibility = Some("detailed".to_string());
        self
    }

    pub fn display(mut self, hint: &str) -> Self {
        self.display = Some(hint.to_string());
        self
    }

    pub fn provider(mut self, provider: &str) -> Self {
        self.provider = Some(provider.to_string());
        self
    }

    pub fn citation(mut self, part: &str) -> Self {
        self.citation_part = Some(part.to_string());
        self
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    pub fields: Vec<RecordField>,
}

/// Records grouped under a shared value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Group {
    pub value: String,
    pub count: usize,
    #[serde(rename = "record_list", default)]
    pub records: Vec<Record>,
}

impl Group {
    /// Wrap one record in a group keyed by `value`.
    pub fn singleton(value: impl Into<String>, record: Record) -> Self {
        Self {
            value: value.into(),
            count: 1,
            records: vec![record],
        }
    }
}
