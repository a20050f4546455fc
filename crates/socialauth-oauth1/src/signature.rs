// RFC 5849 request signing.
//
// Base-string construction: uppercase HTTP method, normalized URL
// (scheme + authority + path, no query or fragment, no default port), and
// all OAuth + request parameters percent-encoded and sorted
// lexicographically by key then value. The signing key is
// `consumer_secret&token_secret`, both percent-encoded, with an empty
// token secret when none exists yet.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use hmac::{Hmac, Mac};
use sha1::Sha1;
use url::Url;

type HmacSha1 = Hmac<Sha1>;

/// Percent-encode per RFC 3986 section 2.1: everything outside the
/// unreserved set (`A-Z a-z 0-9 - . _ ~`) becomes `%XX` with uppercase
/// hex digits.
pub fn percent_encode(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for byte in input.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}

/// Scheme + authority + path, lower-cased scheme/host, default ports
/// elided, query and fragment dropped.
fn normalized_url(url: &Url) -> String {
    let scheme = url.scheme().to_lowercase();
    let host = url.host_str().unwrap_or_default().to_lowercase();
    // `Url::port` already answers None for the scheme's default port.
    let port = match url.port() {
        Some(port) => format!(":{port}"),
        None => String::new(),
    };
    format!("{scheme}://{host}{port}{}", url.path())
}

/// Build the signature base string over the given method, URL, and the
/// full parameter set (OAuth protocol parameters, URL query parameters,
/// and any form body parameters — everything except `oauth_signature`).
pub fn signature_base_string(method: &str, url: &Url, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let joined = encoded
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(&normalized_url(url)),
        percent_encode(&joined)
    )
}

/// HMAC-SHA1 over the base string, base64-encoded.
pub fn hmac_sha1_signature(
    base_string: &str,
    consumer_secret: &str,
    token_secret: Option<&str>,
) -> String {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret.unwrap_or_default())
    );
    let mut mac = HmacSha1::new_from_slice(key.as_bytes()).expect("HMAC can take key of any size");
    mac.update(base_string.as_bytes());
    STANDARD.encode(mac.finalize().into_bytes())
}

/// Sign a request in one go: base string, then HMAC-SHA1.
pub fn sign_request(
    method: &str,
    url: &Url,
    params: &[(String, String)],
    consumer_secret: &str,
    token_secret: Option<&str>,
) -> String {
    let base = signature_base_string(method, url, params);
    hmac_sha1_signature(&base, consumer_secret, token_secret)
}

/// Render OAuth protocol parameters (including the signature) as an
/// `Authorization: OAuth ...` header value.
pub fn authorization_header(params: &[(String, String)]) -> String {
    let fields = params
        .iter()
        .map(|(k, v)| format!(r#"{}="{}""#, percent_encode(k), percent_encode(v)))
        .collect::<Vec<_>>()
        .join(", ");
    format!("OAuth {fields}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_percent_encode_unreserved_passthrough() {
        assert_eq!(percent_encode("abcXYZ019-._~"), "abcXYZ019-._~");
    }

    #[test]
    fn test_percent_encode_reserved_uppercase_hex() {
        assert_eq!(percent_encode("Ladies + Gentlemen"), "Ladies%20%2B%20Gentlemen");
        assert_eq!(percent_encode("An encoded string!"), "An%20encoded%20string%21");
        assert_eq!(percent_encode("Dogs, Cats & Mice"), "Dogs%2C%20Cats%20%26%20Mice");
        assert_eq!(percent_encode("☃"), "%E2%98%83");
    }

    #[test]
    fn test_normalized_url_drops_query_and_default_port() {
        let url = Url::parse("HTTPS://Api.Twitter.com:443/oauth/request_token?a=b").unwrap();
        assert_eq!(normalized_url(&url), "https://api.twitter.com/oauth/request_token");

        let url = Url::parse("http://example.com:8080/r%20v/X?id=123").unwrap();
        assert_eq!(normalized_url(&url), "http://example.com:8080/r%20v/X");
    }

    // The worked example from Twitter's "Creating a signature"
    // documentation; both the base string and the signature are checked
    // byte-for-byte.
    #[test]
    fn test_documented_signature_fixture() {
        let url =
            Url::parse("https://api.twitter.com/1.1/statuses/update.json?include_entities=true")
                .unwrap();
        let params = owned(&[
            ("status", "Hello Ladies + Gentlemen, a signed OAuth request!"),
            ("include_entities", "true"),
            ("oauth_consumer_key", "xvz1evFS4wEEPTGEFPHBog"),
            ("oauth_nonce", "kYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg"),
            ("oauth_signature_method", "HMAC-SHA1"),
            ("oauth_timestamp", "1318622958"),
            (
                "oauth_token",
                "370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb",
            ),
            ("oauth_version", "1.0"),
        ]);

        let base = signature_base_string("post", &url, &params);
        assert_eq!(
            base,
            "POST&https%3A%2F%2Fapi.twitter.com%2F1.1%2Fstatuses%2Fupdate.json&\
             include_entities%3Dtrue%26\
             oauth_consumer_key%3Dxvz1evFS4wEEPTGEFPHBog%26\
             oauth_nonce%3DkYjzVBB8Y0ZFabxSWbWovY3uYSQ2pTgmZeNu2VS4cg%26\
             oauth_signature_method%3DHMAC-SHA1%26\
             oauth_timestamp%3D1318622958%26\
             oauth_token%3D370773112-GmHxMAgYyLbNEtIKZeRNFsMKPR9EyMZeS9weJAEb%26\
             oauth_version%3D1.0%26\
             status%3DHello%2520Ladies%2520%252B%2520Gentlemen%252C%2520a%2520signed%2520OAuth%2520request%2521"
        );

        let signature = hmac_sha1_signature(
            &base,
            "kAcSOqF21Fu85e7zjz7ZN2U4ZRhfV3WpwPAoE3Z7kBw",
            Some("LswwdoUaIvS8ltyTt5jkRh4J50vUPVVHtR2YPi5kE"),
        );
        assert_eq!(signature, "hCtSmYh+iHYCEqBWrE7C7hYmtUk=");
    }

    #[test]
    fn test_parameters_sort_by_key_then_value() {
        let url = Url::parse("https://example.com/r").unwrap();
        let params = owned(&[("a", "2"), ("a", "1"), ("b", "1")]);
        let base = signature_base_string("GET", &url, &params);
        assert!(base.ends_with(&percent_encode("a=1&a=2&b=1")));
    }

    #[test]
    fn test_signing_key_with_absent_token_secret() {
        // RFC 5849 keeps the trailing '&' when no token secret exists yet.
        let a = hmac_sha1_signature("base", "secret", None);
        let b = hmac_sha1_signature("base", "secret", Some(""));
        assert_eq!(a, b);
    }

    #[test]
    fn test_authorization_header_shape() {
        let header = authorization_header(&owned(&[
            ("oauth_consumer_key", "key"),
            ("oauth_signature", "sig+/="),
        ]));
        assert!(header.starts_with("OAuth "));
        assert!(header.contains(r#"oauth_consumer_key="key""#));
        assert!(header.contains(r#"oauth_signature="sig%2B%2F%3D""#));
    }
}
