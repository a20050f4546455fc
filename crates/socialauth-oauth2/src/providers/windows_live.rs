// Windows Live.
//
// REFERENCE: https://msdn.microsoft.com/en-us/library/hh243647.aspx
//
// The profile carries addresses under `emails.preferred`/`emails.account`,
// never exposes a username, and has no direct picture field — the picture
// URL is synthesized from the user id.

use serde_json::Value;
use socialauth_core::{Gender, ProfileFieldError, UserInformation};

use crate::descriptor::{OAuth2Descriptor, TokenResponseFormat};

use super::{optional_string, string_field};

pub static WINDOWS_LIVE: OAuth2Descriptor = OAuth2Descriptor {
    name: "WindowsLive",
    authorize_endpoint: "https://login.live.com/oauth20_authorize.srf",
    token_endpoint: "https://login.live.com/oauth20_token.srf",
    profile_endpoint: "https://apis.live.net/v5.0/me",
    default_scopes: &["wl.signin", "wl.basic", "wl.emails"],
    scope_separator: ",",
    token_response: TokenResponseFormat::Json,
    map_profile: map_profile,
};

pub fn map_profile(profile: &Value) -> Result<UserInformation, ProfileFieldError> {
    let id = string_field(profile, "id").ok_or(ProfileFieldError::new("id"))?;
    let name = string_field(profile, "name").ok_or(ProfileFieldError::new("name"))?;

    let email = profile
        .get("emails")
        .map(|emails| {
            let preferred = optional_string(emails, "preferred");
            if preferred.is_empty() {
                optional_string(emails, "account")
            } else {
                preferred
            }
        })
        .unwrap_or_default();

    Ok(UserInformation {
        picture_url: format!("https://apis.live.net/v5.0/{id}/picture"),
        id,
        name: name.trim().to_string(),
        email,
        gender: Gender::parse(&optional_string(profile, "gender")),
        locale: optional_string(profile, "locale"),
        user_name: String::new(),
    })
}
