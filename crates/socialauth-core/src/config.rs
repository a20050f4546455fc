// Provider configuration as supplied by the host.
//
// How the host sources these entries (environment, files) is its own
// business; the core only consumes the resulting list.

use serde::{Deserialize, Serialize};

/// One configured provider: a user-chosen name plus the credentials issued
/// by the identity service. Immutable once handed to the registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// The name the host configured, matched against available provider
    /// implementations by case-insensitive prefix.
    pub name: String,
    /// Consumer/client key.
    pub key: String,
    /// Consumer/client secret.
    pub secret: String,
    /// Requested scopes; when empty the provider's defaults apply.
    #[serde(default)]
    pub scopes: Vec<String>,
}

impl ProviderConfig {
    pub fn new(
        name: impl Into<String>,
        key: impl Into<String>,
        secret: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            key: key.into(),
            secret: secret.into(),
            scopes: Vec::new(),
        }
    }

    pub fn with_scopes(mut self, scopes: &str) -> Self {
        self.scopes = parse_scopes(scopes);
        self
    }
}

/// The credentials a provider constructor receives from the registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderParams {
    pub key: String,
    pub secret: String,
    pub scopes: Vec<String>,
}

impl ProviderParams {
    pub fn new(key: impl Into<String>, secret: impl Into<String>, scopes: Vec<String>) -> Self {
        Self {
            key: key.into(),
            secret: secret.into(),
            scopes,
        }
    }
}

/// Split a comma-delimited scope string into a scope list, dropping empty
/// entries and surrounding whitespace.
pub fn parse_scopes(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}
