use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolAttribute {
    pub name: String,
    pub supported: bool,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub value: String,
}

impl PoolAttribute {
    pub fn supported(name: &str, value: &str) -> Self {
        Self {
            name: name.to_string(),
            supported: true,
            value: value.to_string(),
        }
    }

    pub fn unsupported(name: &str) -> Self {
        Self {
            name: name.to_string(),
            supported: false,
            value: String::new(),
        }
    }
}

/// What the pool tells the frontend about itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolIdentity {
    pub name: String,
    pub description: String,
    pub mode: String,
    pub attributes: Vec<PoolAttribute>,
}

/// An online-access provider referenced by `access_url` record fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderDetails {
    pub provider: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub label: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub homepage_url: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub logo_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PoolProviders {
    pub providers: Vec<ProviderDetails>,
}
