// The authorization-code flow engine.
//
// Completion runs its steps strictly in order: state check, denial check,
// token exchange, token parse, profile fetch, normalization. A failure at
// any step aborts the whole attempt.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use socialauth_core::{
    generate_state, AuthenticatedIdentity, AuthenticationProvider, FlowError, FlowLogger,
    FlowState, HttpRequest, HttpTransport, ProviderParams, RedirectInstruction, ReqwestTransport,
    TransportError,
};
use url::Url;

use crate::descriptor::{parse_access_token, OAuth2Descriptor};

/// A configured OAuth2 client for one identity service.
///
/// Immutable after construction; one instance serves arbitrarily many
/// concurrent authentication attempts.
pub struct OAuth2Provider {
    descriptor: OAuth2Descriptor,
    params: ProviderParams,
    extra_authorize_params: Vec<(String, String)>,
    transport: Arc<dyn HttpTransport>,
    logger: FlowLogger,
}

impl fmt::Debug for OAuth2Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth2Provider")
            .field("name", &self.descriptor.name)
            .finish()
    }
}

impl OAuth2Provider {
    pub fn new(
        descriptor: OAuth2Descriptor,
        params: ProviderParams,
        transport: Option<Arc<dyn HttpTransport>>,
        logger: FlowLogger,
    ) -> Self {
        Self {
            descriptor,
            params,
            extra_authorize_params: Vec::new(),
            transport: transport.unwrap_or_else(|| Arc::new(ReqwestTransport::new())),
            logger,
        }
    }

    /// Append a provider-specific authorize parameter (e.g. Facebook's
    /// `display` hint) to every redirect this instance produces.
    pub fn with_authorize_param(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.extra_authorize_params.push((name.into(), value.into()));
        self
    }

    pub fn descriptor(&self) -> &OAuth2Descriptor {
        &self.descriptor
    }

    /// Configured scopes joined by the provider's separator, or the
    /// provider defaults when none were configured.
    fn scope_value(&self) -> String {
        if self.params.scopes.is_empty() {
            self.descriptor
                .default_scopes
                .join(self.descriptor.scope_separator)
        } else {
            self.params.scopes.join(self.descriptor.scope_separator)
        }
    }

    fn invalid_url(&self, message: impl Into<String>) -> FlowError {
        FlowError::InvalidUrl {
            provider: self.descriptor.name.to_string(),
            message: message.into(),
        }
    }

    fn build_authorize_url(
        &self,
        callback_url: &str,
        state: &str,
        extra_params: &[(String, String)],
    ) -> Result<Url, FlowError> {
        let mut url = Url::parse(self.descriptor.authorize_endpoint)
            .map_err(|e| self.invalid_url(format!("authorize endpoint: {e}")))?;

        url.query_pairs_mut()
            .append_pair("client_id", &self.params.key)
            .append_pair("redirect_uri", callback_url)
            .append_pair("response_type", "code")
            .append_pair("scope", &self.scope_value())
            .append_pair("state", state);

        for (name, value) in &self.extra_authorize_params {
            url.query_pairs_mut().append_pair(name, value);
        }
        for (name, value) in extra_params {
            url.query_pairs_mut().append_pair(name, value);
        }

        Ok(url)
    }

    fn map_transport_error(&self, err: TransportError, step: FlowStep) -> FlowError {
        let name = self.descriptor.name;
        match err {
            TransportError::Cancelled => FlowError::Cancelled {
                provider: name.to_string(),
            },
            TransportError::Io(message) => match step {
                FlowStep::TokenExchange => FlowError::token_exchange(name, None, message),
                FlowStep::ProfileFetch => FlowError::profile_fetch(name, None, message),
            },
        }
    }
}

#[derive(Clone, Copy)]
enum FlowStep {
    TokenExchange,
    ProfileFetch,
}

#[async_trait]
impl AuthenticationProvider for OAuth2Provider {
    fn name(&self) -> &str {
        self.descriptor.name
    }

    async fn begin_authentication(
        &self,
        callback_url: &str,
        extra_params: &[(String, String)],
    ) -> Result<RedirectInstruction, FlowError> {
        if callback_url.is_empty() {
            return Err(self.invalid_url("callback URL is required"));
        }

        let state = generate_state();
        let url = self.build_authorize_url(callback_url, &state, extra_params)?;

        self.logger.debug(&format!(
            "{}: redirecting to authorize endpoint",
            self.descriptor.name
        ));

        Ok(RedirectInstruction {
            url,
            state: FlowState::new(state, callback_url),
        })
    }

    async fn complete_authentication(
        &self,
        query: &HashMap<String, String>,
        state: &FlowState,
    ) -> Result<AuthenticatedIdentity, FlowError> {
        let name = self.descriptor.name;

        // 1. State check, before anything touches the network.
        let presented = query.get("state").map(String::as_str).unwrap_or_default();
        if state.state.is_empty() || presented != state.state {
            return Err(FlowError::StateMismatch {
                provider: name.to_string(),
            });
        }

        // 2. Did the user deny the request?
        if let Some(error) = query.get("error") {
            let message = match query.get("error_description") {
                Some(description) => format!("{error}: {description}"),
                None => error.clone(),
            };
            return Err(FlowError::UserDenied {
                provider: name.to_string(),
                message,
            });
        }

        let code = query.get("code").ok_or_else(|| {
            FlowError::token_exchange(name, None, "callback did not include an authorization code")
        })?;

        // 3. Exchange the code for an access token.
        let form = vec![
            ("code".to_string(), code.clone()),
            ("client_id".to_string(), self.params.key.clone()),
            ("client_secret".to_string(), self.params.secret.clone()),
            ("redirect_uri".to_string(), state.callback_url.clone()),
            ("grant_type".to_string(), "authorization_code".to_string()),
        ];
        let request = HttpRequest::post_form(self.descriptor.token_endpoint, form)
            .with_header("Accept", "application/json");

        let response = self
            .transport
            .execute(request)
            .await
            .map_err(|e| self.map_transport_error(e, FlowStep::TokenExchange))?;

        if !response.is_success() {
            self.logger
                .warn(&format!("{name}: token endpoint answered {}", response.status));
            return Err(FlowError::token_exchange(
                name,
                Some(response.status),
                "token endpoint rejected the authorization code",
            ));
        }

        // 4. Parse the token response.
        let access_token = parse_access_token(self.descriptor.token_response, &response.body)
            .map_err(|message| FlowError::token_exchange(name, Some(response.status), message))?;

        // 5. Fetch the profile.
        let mut profile_url = Url::parse(self.descriptor.profile_endpoint)
            .map_err(|e| self.invalid_url(format!("profile endpoint: {e}")))?;
        profile_url
            .query_pairs_mut()
            .append_pair("access_token", &access_token.token);

        let response = self
            .transport
            .execute(HttpRequest::get(profile_url))
            .await
            .map_err(|e| self.map_transport_error(e, FlowStep::ProfileFetch))?;

        if !response.is_success() {
            return Err(FlowError::profile_fetch(
                name,
                Some(response.status),
                "profile endpoint rejected the access token",
            ));
        }

        let profile: serde_json::Value = serde_json::from_str(&response.body).map_err(|e| {
            FlowError::profile_fetch(
                name,
                Some(response.status),
                format!("unparsable profile body: {e}"),
            )
        })?;

        // 6. Normalize.
        let user_information =
            (self.descriptor.map_profile)(&profile).map_err(|e| FlowError::Normalization {
                provider: name.to_string(),
                field: e.field,
            })?;

        self.logger
            .info(&format!("{name}: authenticated user {}", user_information.id));

        // 7. Assemble.
        Ok(AuthenticatedIdentity {
            provider_name: name.to_string(),
            access_token,
            user_information,
            raw_profile: response.body,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::google::GOOGLE;

    fn provider_with_scopes(scopes: Vec<String>) -> OAuth2Provider {
        OAuth2Provider::new(
            GOOGLE,
            ProviderParams::new("some ** key", "some secret", scopes),
            None,
            FlowLogger::disabled(),
        )
    }

    async fn begin(provider: &OAuth2Provider) -> RedirectInstruction {
        provider
            .begin_authentication("http://www.localhost.me/?provider=google", &[])
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_authorize_url_carries_required_parameters() {
        let provider = provider_with_scopes(vec![]);
        let redirect = begin(&provider).await;

        let query: HashMap<String, String> = redirect
            .url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(query["client_id"], "some ** key");
        assert_eq!(query["redirect_uri"], "http://www.localhost.me/?provider=google");
        assert_eq!(query["response_type"], "code");
        assert_eq!(query["scope"], "profile email");
        assert_eq!(query["state"], redirect.state.state);
    }

    #[tokio::test]
    async fn test_configured_scopes_replace_defaults() {
        let provider = provider_with_scopes(vec!["email".into()]);
        let redirect = begin(&provider).await;
        assert!(redirect.url.as_str().contains("scope=email"));
    }

    #[tokio::test]
    async fn test_states_are_unique_per_call() {
        let provider = provider_with_scopes(vec![]);
        let first = begin(&provider).await;
        let second = begin(&provider).await;
        assert_ne!(first.state.state, second.state.state);
        assert!(first.state.state.len() >= 32);
    }

    #[tokio::test]
    async fn test_extra_params_are_appended() {
        let provider = provider_with_scopes(vec![]).with_authorize_param("display", "popup");
        let redirect = provider
            .begin_authentication(
                "http://www.localhost.me/",
                &[("login_hint".to_string(), "someone".to_string())],
            )
            .await
            .unwrap();

        let url = redirect.url.as_str();
        assert!(url.contains("display=popup"));
        assert!(url.contains("login_hint=someone"));
        // Required parameters survive.
        assert!(url.contains("response_type=code"));
    }

    #[tokio::test]
    async fn test_empty_callback_is_rejected() {
        let provider = provider_with_scopes(vec![]);
        let err = provider.begin_authentication("", &[]).await.unwrap_err();
        assert!(matches!(err, FlowError::InvalidUrl { .. }));
    }
}
