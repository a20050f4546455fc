// Per-provider capability descriptors.
//
// A descriptor captures everything that distinguishes one OAuth2 provider
// from another: endpoints, default scopes, how its token endpoint encodes
// the response, and the pure function that maps its profile shape into the
// canonical one.

use chrono::Utc;
use serde::Deserialize;
use socialauth_core::{AccessToken, ProfileMapper};

/// How the token endpoint encodes its response body.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenResponseFormat {
    Json,
    /// `access_token=...&expires=...` key/value pairs (Facebook's Graph
    /// token endpoint).
    FormEncoded,
}

/// Static capability description of one OAuth2 provider.
#[derive(Debug, Clone, Copy)]
pub struct OAuth2Descriptor {
    /// Canonical provider name (e.g. "Google").
    pub name: &'static str,
    pub authorize_endpoint: &'static str,
    pub token_endpoint: &'static str,
    /// May already carry query parameters (e.g. a `fields` selector);
    /// the engine appends `access_token` when fetching.
    pub profile_endpoint: &'static str,
    pub default_scopes: &'static [&'static str],
    pub scope_separator: &'static str,
    pub token_response: TokenResponseFormat,
    pub map_profile: ProfileMapper,
}

/// JSON token response wire shape.
#[derive(Debug, Deserialize)]
struct JsonTokenResponse {
    access_token: Option<String>,
    expires_in: Option<serde_json::Value>,
}

/// Parse a token-endpoint response body into an [`AccessToken`].
///
/// Returns a message describing what was wrong when the body is
/// unparsable or carries no `access_token`.
pub fn parse_access_token(
    format: TokenResponseFormat,
    body: &str,
) -> Result<AccessToken, String> {
    match format {
        TokenResponseFormat::Json => {
            let response: JsonTokenResponse = serde_json::from_str(body)
                .map_err(|e| format!("unparsable token response body: {e}"))?;
            let token = response
                .access_token
                .filter(|t| !t.is_empty())
                .ok_or_else(|| "token response did not contain an access_token".to_string())?;

            let mut access_token = AccessToken::new(token);
            if let Some(seconds) = expiry_seconds(response.expires_in.as_ref()) {
                access_token = access_token
                    .with_expiry(Utc::now() + chrono::Duration::seconds(seconds));
            }
            Ok(access_token)
        }
        TokenResponseFormat::FormEncoded => {
            let pairs: Vec<(String, String)> = url::form_urlencoded::parse(body.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect();

            let token = pairs
                .iter()
                .find(|(k, _)| k == "access_token")
                .map(|(_, v)| v.clone())
                .filter(|t| !t.is_empty())
                .ok_or_else(|| "token response did not contain an access_token".to_string())?;

            let mut access_token = AccessToken::new(token);
            let seconds = pairs
                .iter()
                .find(|(k, _)| k == "expires" || k == "expires_in")
                .and_then(|(_, v)| v.parse::<i64>().ok());
            if let Some(seconds) = seconds {
                access_token = access_token
                    .with_expiry(Utc::now() + chrono::Duration::seconds(seconds));
            }
            Ok(access_token)
        }
    }
}

/// `expires_in` arrives as a number from most providers but as a numeric
/// string from some.
fn expiry_seconds(value: Option<&serde_json::Value>) -> Option<i64> {
    match value {
        Some(serde_json::Value::Number(n)) => n.as_i64(),
        Some(serde_json::Value::String(s)) => s.parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_json_token_response() {
        let token =
            parse_access_token(TokenResponseFormat::Json, r#"{"access_token":"T","expires_in":3600}"#)
                .unwrap();
        assert_eq!(token.token, "T");
        assert!(token.expires_at.is_some());
        assert!(token.secret.is_none());
    }

    #[test]
    fn test_parse_json_token_response_string_expiry() {
        let token = parse_access_token(
            TokenResponseFormat::Json,
            r#"{"access_token":"T","expires_in":"3600"}"#,
        )
        .unwrap();
        assert!(token.expires_at.is_some());
    }

    #[test]
    fn test_parse_json_token_response_without_expiry() {
        let token =
            parse_access_token(TokenResponseFormat::Json, r#"{"access_token":"T"}"#).unwrap();
        assert_eq!(token.token, "T");
        assert!(token.expires_at.is_none());
    }

    #[test]
    fn test_missing_access_token_is_an_error() {
        let err =
            parse_access_token(TokenResponseFormat::Json, r#"{"token_type":"Bearer"}"#).unwrap_err();
        assert!(err.contains("access_token"));
    }

    #[test]
    fn test_unparsable_json_is_an_error() {
        let err = parse_access_token(TokenResponseFormat::Json, "<html>nope</html>").unwrap_err();
        assert!(err.contains("unparsable"));
    }

    #[test]
    fn test_parse_form_encoded_token_response() {
        let token = parse_access_token(
            TokenResponseFormat::FormEncoded,
            "access_token=CAAE123&expires=5108186",
        )
        .unwrap();
        assert_eq!(token.token, "CAAE123");
        assert!(token.expires_at.is_some());
    }

    #[test]
    fn test_form_encoded_missing_token_is_an_error() {
        let err =
            parse_access_token(TokenResponseFormat::FormEncoded, "expires=5108186").unwrap_err();
        assert!(err.contains("access_token"));
    }
}
