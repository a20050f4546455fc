// Google.
//
// REFERENCE: https://developers.google.com/identity/protocols/oauth2/web-server

use serde_json::Value;
use socialauth_core::{Gender, ProfileFieldError, UserInformation};

use crate::descriptor::{OAuth2Descriptor, TokenResponseFormat};

use super::{optional_string, string_field};

pub static GOOGLE: OAuth2Descriptor = OAuth2Descriptor {
    name: "Google",
    authorize_endpoint: "https://accounts.google.com/o/oauth2/auth",
    token_endpoint: "https://accounts.google.com/o/oauth2/token",
    profile_endpoint: "https://www.googleapis.com/oauth2/v2/userinfo",
    default_scopes: &["profile", "email"],
    scope_separator: " ",
    token_response: TokenResponseFormat::Json,
    map_profile: map_profile,
};

/// Google's userinfo response carries no username field.
pub fn map_profile(profile: &Value) -> Result<UserInformation, ProfileFieldError> {
    let id = string_field(profile, "id").ok_or(ProfileFieldError::new("id"))?;
    let name = string_field(profile, "name").ok_or(ProfileFieldError::new("name"))?;

    Ok(UserInformation {
        id,
        name: name.trim().to_string(),
        email: optional_string(profile, "email"),
        gender: Gender::parse(&optional_string(profile, "gender")),
        locale: optional_string(profile, "locale"),
        picture_url: optional_string(profile, "picture"),
        user_name: String::new(),
    })
}
