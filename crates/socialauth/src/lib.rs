// socialauth — normalized social identity for Rust hosts.
//
// Wires the provider registry to the two dialect engines and the built-in
// provider table. A host supplies provider configurations, receives named
// provider instances, and runs begin/complete round trips against them.

pub mod builtin;
pub mod registry;

// Re-exports
pub use builtin::builtin_providers;
pub use registry::{AvailableProvider, ProviderConstructor, ProviderRegistry};
pub use socialauth_core::{
    parse_scopes, AccessToken, AuthenticatedIdentity, AuthenticationProvider, FlowError,
    FlowLogger, FlowState, Gender, HttpRequest, HttpResponse, HttpTransport, LogHandler, LogLevel,
    LoggerConfig, ProfileFieldError, ProfileMapper, ProviderConfig, ProviderParams,
    RedirectInstruction, RegistryError, ReqwestTransport, StatusHint, TransportError,
    UserInformation,
};
pub use socialauth_oauth1::{OAuth1Descriptor, OAuth1Provider};
pub use socialauth_oauth2::{OAuth2Descriptor, OAuth2Provider, TokenResponseFormat};
