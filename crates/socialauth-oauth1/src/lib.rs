// socialauth-oauth1 — the OAuth 1.0a three-legged engine.
//
// Request signing follows RFC 5849 base-string rules exactly; any
// deviation breaks provider-side signature verification.

pub mod flow;
pub mod providers;
pub mod signature;

// Re-exports
pub use flow::{OAuth1Descriptor, OAuth1Provider};
pub use providers::twitter;
pub use signature::{hmac_sha1_signature, percent_encode, signature_base_string};
