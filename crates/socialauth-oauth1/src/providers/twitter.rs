// Twitter.
//
// REFERENCE: https://developer.twitter.com/en/docs/authentication/oauth-1-0a
//
// `verify_credentials` only returns an email address when the app has been
// whitelisted for it; the normalizer treats it as optional. Twitter
// reports no gender at all.

use serde_json::Value;
use socialauth_core::{Gender, ProfileFieldError, UserInformation};

use crate::flow::OAuth1Descriptor;

pub static TWITTER: OAuth1Descriptor = OAuth1Descriptor {
    name: "Twitter",
    request_token_endpoint: "https://api.twitter.com/oauth/request_token",
    authorize_endpoint: "https://api.twitter.com/oauth/authenticate",
    access_token_endpoint: "https://api.twitter.com/oauth/access_token",
    profile_endpoint: "https://api.twitter.com/1.1/account/verify_credentials.json?include_email=true",
    map_profile: map_profile,
};

pub fn map_profile(profile: &Value) -> Result<UserInformation, ProfileFieldError> {
    // `id_str` is authoritative; the numeric `id` loses precision in
    // JSON implementations that parse it as a double.
    let id = match profile.get("id_str").and_then(Value::as_str) {
        Some(id) => id.to_string(),
        None => profile
            .get("id")
            .and_then(Value::as_i64)
            .map(|id| id.to_string())
            .ok_or(ProfileFieldError::new("id"))?,
    };

    let name = profile
        .get("name")
        .and_then(Value::as_str)
        .ok_or(ProfileFieldError::new("name"))?;

    let field = |key: &str| {
        profile
            .get(key)
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string()
    };

    Ok(UserInformation {
        id,
        name: name.trim().to_string(),
        email: field("email"),
        gender: Gender::Unknown,
        locale: field("lang"),
        picture_url: field("profile_image_url_https"),
        user_name: field("screen_name"),
    })
}
