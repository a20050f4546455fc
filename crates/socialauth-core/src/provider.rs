// The provider contract.
//
// Both OAuth dialect engines implement `AuthenticationProvider`; the
// registry stores trait objects so a host never has to know which dialect
// a given provider speaks.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::FlowError;
use crate::identity::AuthenticatedIdentity;

/// Ephemeral per-attempt state produced by `begin_authentication`.
///
/// The engine produces and validates it but never persists it: the host
/// must carry it across the redirect round trip and hand back the exact
/// value at completion. It serializes cleanly so hosts can round-trip it
/// through a cookie or session store.
///
/// For OAuth1 the temporary-credential secret rides here; it is required
/// to sign the token exchange at completion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlowState {
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temporary_secret: Option<String>,
    pub callback_url: String,
}

impl FlowState {
    pub fn new(state: impl Into<String>, callback_url: impl Into<String>) -> Self {
        Self {
            state: state.into(),
            temporary_secret: None,
            callback_url: callback_url.into(),
        }
    }

    pub fn with_temporary_secret(mut self, secret: impl Into<String>) -> Self {
        self.temporary_secret = Some(secret.into());
        self
    }
}

/// Where to send the user, and the state the host must hold onto until the
/// provider redirects back.
#[derive(Debug, Clone)]
pub struct RedirectInstruction {
    pub url: Url,
    pub state: FlowState,
}

/// A configured OAuth client for one identity service.
///
/// Instances are immutable after construction and safe for concurrent use
/// by arbitrarily many simultaneous authentication attempts.
#[async_trait]
pub trait AuthenticationProvider: Send + Sync {
    /// The provider's canonical name (e.g. "Google").
    fn name(&self) -> &str;

    /// Start an authentication attempt: produce the redirect the host
    /// should answer with, plus the state to validate the callback
    /// against.
    ///
    /// `extra_params` are appended to the authorize URL without removing
    /// required parameters. OAuth2 providers perform no I/O here; OAuth1
    /// providers must first obtain a temporary credential.
    async fn begin_authentication(
        &self,
        callback_url: &str,
        extra_params: &[(String, String)],
    ) -> Result<RedirectInstruction, FlowError>;

    /// Finish an authentication attempt from the provider's callback
    /// query. Any failure at any step aborts the whole attempt; a partial
    /// identity is never returned.
    async fn complete_authentication(
        &self,
        query: &HashMap<String, String>,
        state: &FlowState,
    ) -> Result<AuthenticatedIdentity, FlowError>;
}
