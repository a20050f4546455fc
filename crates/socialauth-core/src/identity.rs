// Canonical identity model.
//
// Every provider, whatever its wire shape, maps into `UserInformation`.
// Absent optional fields become empty strings (or `Gender::Unknown`),
// never a panic on a missing value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Gender as reported by a provider, where the provider reports one at all.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    #[default]
    Unknown,
    Male,
    Female,
}

impl Gender {
    /// Case-insensitive parse; anything unrecognised (including an empty
    /// or whitespace value) is `Unknown`.
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "male" | "m" => Self::Male,
            "female" | "f" => Self::Female,
            _ => Self::Unknown,
        }
    }
}

/// The canonical user shape every provider normalizes into.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserInformation {
    pub id: String,
    pub name: String,
    pub email: String,
    pub gender: Gender,
    pub locale: String,
    pub picture_url: String,
    pub user_name: String,
}

/// An access token returned by a provider's token endpoint.
///
/// OAuth1 tokens carry a secret alongside the token; OAuth2 tokens may
/// carry an expiry instant derived from the provider's `expires_in`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessToken {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl AccessToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            secret: None,
            expires_at: None,
        }
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn with_expiry(mut self, expires_at: DateTime<Utc>) -> Self {
        self.expires_at = Some(expires_at);
        self
    }
}

/// The end result of a completed authentication attempt.
///
/// `raw_profile` is the unmodified provider response body, retained
/// alongside the normalized result for audit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedIdentity {
    pub provider_name: String,
    pub access_token: AccessToken,
    pub user_information: UserInformation,
    pub raw_profile: String,
}

/// A required profile field that could not be interpreted.
///
/// Engines map this into [`FlowError::Normalization`].
///
/// [`FlowError::Normalization`]: crate::error::FlowError
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProfileFieldError {
    pub field: &'static str,
}

impl ProfileFieldError {
    pub fn new(field: &'static str) -> Self {
        Self { field }
    }
}

/// A pure per-provider mapping from decoded profile data to the canonical
/// user shape.
pub type ProfileMapper = fn(&serde_json::Value) -> Result<UserInformation, ProfileFieldError>;
