// Error taxonomy.
//
// Registry-construction errors are fatal at startup: the host must never
// proceed with a partially built registry. Per-attempt flow errors are
// recovered at the flow boundary into a typed result and handed to the
// host's error handler together with an HTTP-status-class hint.
//
// Messages carry the provider name, the offending configuration key, and
// the upstream HTTP status where relevant. They never carry the client
// secret.

use thiserror::Error;

/// HTTP status class a host should render a flow error with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusHint {
    /// The user (or the provider, on the user's behalf) rejected the
    /// attempt: render a 401-class response.
    Unauthorized = 401,
    /// Something on our side or the provider's side broke: render a
    /// 500-class response.
    ServerError = 500,
}

impl StatusHint {
    pub fn status_code(&self) -> u16 {
        *self as u16
    }
}

/// Errors raised while building a [`ProviderRegistry`].
///
/// [`ProviderRegistry`]: https://docs.rs/socialauth
#[derive(Debug, Clone, Error)]
pub enum RegistryError {
    #[error("at least one provider configuration entry is required to build a registry")]
    Configuration,

    #[error("no provider implementations were supplied to match configurations against")]
    Registration,

    #[error(
        "the configured provider name '{key}' does not match any available \
         provider implementation; check for a typo in the name"
    )]
    ProviderNotFound { key: String },

    #[error(
        "the configured provider name '{key}' is ambiguous; it matches more \
         than one available implementation: {candidates:?}"
    )]
    Ambiguous {
        key: String,
        candidates: Vec<String>,
    },
}

/// Errors raised by a single authentication attempt.
///
/// Each variant names the provider the attempt ran against. The messages
/// embed the upstream HTTP status where one exists; the status is also
/// available structurally for hosts that branch on it.
#[derive(Debug, Clone, Error)]
pub enum FlowError {
    #[error(
        "{provider}: the callback state does not match the value issued when \
         the authentication attempt started"
    )]
    StateMismatch { provider: String },

    #[error("{provider}: the user denied the authorization request: {message}")]
    UserDenied { provider: String, message: String },

    #[error("{provider}: token exchange failed: {message}")]
    TokenExchange {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    #[error("{provider}: profile fetch failed: {message}")]
    ProfileFetch {
        provider: String,
        status: Option<u16>,
        message: String,
    },

    #[error("{provider}: the profile field '{field}' could not be interpreted")]
    Normalization {
        provider: String,
        field: &'static str,
    },

    #[error("{provider}: the authentication attempt was cancelled")]
    Cancelled { provider: String },

    #[error("{provider}: invalid callback or endpoint URL: {message}")]
    InvalidUrl { provider: String, message: String },
}

impl FlowError {
    pub fn token_exchange(
        provider: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        let message = match status {
            Some(code) => format!("upstream status {code}: {message}"),
            None => message,
        };
        Self::TokenExchange {
            provider: provider.into(),
            status,
            message,
        }
    }

    pub fn profile_fetch(
        provider: impl Into<String>,
        status: Option<u16>,
        message: impl Into<String>,
    ) -> Self {
        let message = message.into();
        let message = match status {
            Some(code) => format!("upstream status {code}: {message}"),
            None => message,
        };
        Self::ProfileFetch {
            provider: provider.into(),
            status,
            message,
        }
    }

    /// Which provider this attempt ran against.
    pub fn provider(&self) -> &str {
        match self {
            Self::StateMismatch { provider }
            | Self::UserDenied { provider, .. }
            | Self::TokenExchange { provider, .. }
            | Self::ProfileFetch { provider, .. }
            | Self::Normalization { provider, .. }
            | Self::Cancelled { provider }
            | Self::InvalidUrl { provider, .. } => provider,
        }
    }

    /// The HTTP status class the host should answer the callback with.
    pub fn status_hint(&self) -> StatusHint {
        match self {
            Self::StateMismatch { .. } | Self::UserDenied { .. } => StatusHint::Unauthorized,
            Self::TokenExchange { .. }
            | Self::ProfileFetch { .. }
            | Self::Normalization { .. }
            | Self::Cancelled { .. }
            | Self::InvalidUrl { .. } => StatusHint::ServerError,
        }
    }
}

/// Errors surfaced by an [`HttpTransport`] implementation.
///
/// `Cancelled` is kept distinct so a deadline or cancellation signal
/// honoured by the transport aborts the flow with a distinguishable
/// [`FlowError::Cancelled`] instead of masquerading as a provider failure.
///
/// [`HttpTransport`]: crate::transport::HttpTransport
#[derive(Debug, Clone, Error)]
pub enum TransportError {
    #[error("the request was cancelled or its deadline elapsed")]
    Cancelled,

    #[error("{0}")]
    Io(String),
}
