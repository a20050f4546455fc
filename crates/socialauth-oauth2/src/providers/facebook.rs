// Facebook.
//
// REFERENCE: https://developers.facebook.com/docs/facebook-login/login-flow-for-web-no-jssdk/
//
// Quirks the normalizer reproduces: the Graph token endpoint answers with
// form-encoded key/values rather than JSON; a negative sentinel id
// normalizes to "0"; the picture URL is synthesized from the raw id; the
// username field was removed in Graph API >= 2.0.

use serde_json::Value;
use socialauth_core::{Gender, ProfileFieldError, UserInformation};

use crate::descriptor::{OAuth2Descriptor, TokenResponseFormat};

use super::optional_string;

pub static FACEBOOK: OAuth2Descriptor = OAuth2Descriptor {
    name: "Facebook",
    authorize_endpoint: "https://www.facebook.com/dialog/oauth",
    token_endpoint: "https://graph.facebook.com/oauth/access_token",
    profile_endpoint: "https://graph.facebook.com/v2.0/me?fields=id,name,gender,email,link,locale",
    default_scopes: &["public_profile", "email"],
    scope_separator: ",",
    token_response: TokenResponseFormat::FormEncoded,
    map_profile: map_profile,
};

/// The mobile dialog variant; everything but the authorize endpoint is
/// shared with [`FACEBOOK`].
pub static FACEBOOK_MOBILE: OAuth2Descriptor = OAuth2Descriptor {
    name: "Facebook",
    authorize_endpoint: "https://m.facebook.com/dialog/oauth",
    token_endpoint: "https://graph.facebook.com/oauth/access_token",
    profile_endpoint: "https://graph.facebook.com/v2.0/me?fields=id,name,gender,email,link,locale",
    default_scopes: &["public_profile", "email"],
    scope_separator: ",",
    token_response: TokenResponseFormat::FormEncoded,
    map_profile: map_profile,
};

/// Facebook's `display` authorize hint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Display {
    Page,
    Popup,
    Touch,
}

impl Display {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Page => "page",
            Self::Popup => "popup",
            Self::Touch => "touch",
        }
    }
}

pub fn map_profile(profile: &Value) -> Result<UserInformation, ProfileFieldError> {
    let raw_id = match profile.get("id") {
        Some(Value::Number(n)) => n.as_i64().ok_or(ProfileFieldError::new("id"))?,
        Some(Value::String(s)) => s.parse().map_err(|_| ProfileFieldError::new("id"))?,
        _ => return Err(ProfileFieldError::new("id")),
    };

    let name = profile
        .get("name")
        .and_then(Value::as_str)
        .ok_or(ProfileFieldError::new("name"))?;

    Ok(UserInformation {
        id: if raw_id < 0 {
            "0".to_string()
        } else {
            raw_id.to_string()
        },
        name: name.trim().to_string(),
        email: optional_string(profile, "email"),
        gender: Gender::parse(&optional_string(profile, "gender")),
        locale: optional_string(profile, "locale"),
        picture_url: format!("https://graph.facebook.com/{raw_id}/picture"),
        user_name: String::new(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_map_full_profile() {
        let profile = json!({
            "id": 451140615335716_i64,
            "name": "Caramon Majere",
            "email": "caramon.majere@InnOfLastHope.krynn",
            "gender": "male",
            "link": "https://www.facebook.com/caramon.majere",
            "locale": "en_US"
        });

        let info = map_profile(&profile).unwrap();
        assert_eq!(info.id, "451140615335716");
        assert_eq!(info.name, "Caramon Majere");
        assert_eq!(info.gender, Gender::Male);
        assert_eq!(info.locale, "en_US");
        assert_eq!(
            info.picture_url,
            "https://graph.facebook.com/451140615335716/picture"
        );
        assert_eq!(info.user_name, "");
    }

    #[test]
    fn test_negative_sentinel_id_normalizes_to_zero() {
        let profile = json!({"id": -1, "name": "Nobody"});
        let info = map_profile(&profile).unwrap();
        assert_eq!(info.id, "0");
        // The synthesized picture URL keeps the raw value.
        assert_eq!(info.picture_url, "https://graph.facebook.com/-1/picture");
    }

    #[test]
    fn test_string_id_is_accepted() {
        let profile = json!({"id": "1234", "name": "Stringy"});
        assert_eq!(map_profile(&profile).unwrap().id, "1234");
    }

    #[test]
    fn test_blank_gender_is_unknown() {
        let profile = json!({"id": 1, "name": "x", "gender": "  "});
        assert_eq!(map_profile(&profile).unwrap().gender, Gender::Unknown);
    }

    #[test]
    fn test_name_is_trimmed() {
        let profile = json!({"id": 1, "name": "  Tika Waylan  "});
        assert_eq!(map_profile(&profile).unwrap().name, "Tika Waylan");
    }

    #[test]
    fn test_mobile_descriptor_only_changes_authorize_endpoint() {
        assert_eq!(
            FACEBOOK_MOBILE.authorize_endpoint,
            "https://m.facebook.com/dialog/oauth"
        );
        assert_eq!(FACEBOOK_MOBILE.token_endpoint, FACEBOOK.token_endpoint);
    }

    #[test]
    fn test_display_values() {
        assert_eq!(Display::Popup.as_str(), "popup");
        assert_eq!(Display::Page.as_str(), "page");
        assert_eq!(Display::Touch.as_str(), "touch");
    }
}
