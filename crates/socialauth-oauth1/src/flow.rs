// The three-legged flow engine.
//
// begin: signed request for a temporary credential, then a redirect to the
// authorize endpoint carrying the temporary token. The temporary secret
// rides back to the host inside the flow state; it is required to sign the
// exchange at completion.
//
// complete: validate the returned token against the one issued at begin,
// exchange the verifier for a permanent credential, fetch and normalize
// the profile. Steps run strictly in order.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use socialauth_core::{
    random::generate_random_string, AccessToken, AuthenticatedIdentity, AuthenticationProvider,
    FlowError, FlowLogger, FlowState, HttpRequest, HttpTransport, ProfileMapper, ProviderParams,
    RedirectInstruction, ReqwestTransport, TransportError,
};
use url::Url;

use crate::signature::{authorization_header, sign_request};

/// Static capability description of one OAuth1 provider.
#[derive(Debug, Clone, Copy)]
pub struct OAuth1Descriptor {
    /// Canonical provider name (e.g. "Twitter").
    pub name: &'static str,
    pub request_token_endpoint: &'static str,
    pub authorize_endpoint: &'static str,
    pub access_token_endpoint: &'static str,
    /// May carry query parameters; they participate in the signature.
    pub profile_endpoint: &'static str,
    pub map_profile: ProfileMapper,
}

/// A configured OAuth1 client for one identity service.
pub struct OAuth1Provider {
    descriptor: OAuth1Descriptor,
    params: ProviderParams,
    transport: Arc<dyn HttpTransport>,
    logger: FlowLogger,
}

impl fmt::Debug for OAuth1Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OAuth1Provider")
            .field("name", &self.descriptor.name)
            .finish()
    }
}

impl OAuth1Provider {
    pub fn new(
        descriptor: OAuth1Descriptor,
        params: ProviderParams,
        transport: Option<Arc<dyn HttpTransport>>,
        logger: FlowLogger,
    ) -> Self {
        Self {
            descriptor,
            params,
            transport: transport.unwrap_or_else(|| Arc::new(ReqwestTransport::new())),
            logger,
        }
    }

    pub fn descriptor(&self) -> &OAuth1Descriptor {
        &self.descriptor
    }

    fn invalid_url(&self, message: impl Into<String>) -> FlowError {
        FlowError::InvalidUrl {
            provider: self.descriptor.name.to_string(),
            message: message.into(),
        }
    }

    /// The protocol parameters every signed request starts from.
    fn base_oauth_params(&self) -> Vec<(String, String)> {
        vec![
            ("oauth_consumer_key".to_string(), self.params.key.clone()),
            ("oauth_nonce".to_string(), generate_random_string(32)),
            (
                "oauth_signature_method".to_string(),
                "HMAC-SHA1".to_string(),
            ),
            (
                "oauth_timestamp".to_string(),
                chrono::Utc::now().timestamp().to_string(),
            ),
            ("oauth_version".to_string(), "1.0".to_string()),
        ]
    }

    /// Sign `oauth_params` for a request against `url` and return them
    /// with `oauth_signature` appended, ready for the header.
    fn signed_params(
        &self,
        method: &str,
        url: &Url,
        mut oauth_params: Vec<(String, String)>,
        token_secret: Option<&str>,
    ) -> Vec<(String, String)> {
        // URL query parameters participate in the signature.
        let mut signature_params = oauth_params.clone();
        for (k, v) in url.query_pairs() {
            signature_params.push((k.into_owned(), v.into_owned()));
        }

        let signature = sign_request(
            method,
            url,
            &signature_params,
            &self.params.secret,
            token_secret,
        );
        oauth_params.push(("oauth_signature".to_string(), signature));
        oauth_params
    }

    async fn execute_signed_post(
        &self,
        url: &Url,
        oauth_params: Vec<(String, String)>,
        token_secret: Option<&str>,
    ) -> Result<HashMap<String, String>, FlowError> {
        let name = self.descriptor.name;
        let header_params = self.signed_params("POST", url, oauth_params, token_secret);

        let request = HttpRequest::post_form(url.as_str(), Vec::new())
            .with_header("Authorization", authorization_header(&header_params));

        let response = self.transport.execute(request).await.map_err(|e| match e {
            TransportError::Cancelled => FlowError::Cancelled {
                provider: name.to_string(),
            },
            TransportError::Io(message) => FlowError::token_exchange(name, None, message),
        })?;

        if !response.is_success() {
            return Err(FlowError::token_exchange(
                name,
                Some(response.status),
                "credential endpoint rejected the signed request",
            ));
        }

        Ok(parse_form_body(&response.body))
    }
}

/// Decode an `application/x-www-form-urlencoded` body.
fn parse_form_body(body: &str) -> HashMap<String, String> {
    url::form_urlencoded::parse(body.as_bytes())
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect()
}

#[async_trait]
impl AuthenticationProvider for OAuth1Provider {
    fn name(&self) -> &str {
        self.descriptor.name
    }

    async fn begin_authentication(
        &self,
        callback_url: &str,
        extra_params: &[(String, String)],
    ) -> Result<RedirectInstruction, FlowError> {
        let name = self.descriptor.name;
        if callback_url.is_empty() {
            return Err(self.invalid_url("callback URL is required"));
        }

        let request_token_url = Url::parse(self.descriptor.request_token_endpoint)
            .map_err(|e| self.invalid_url(format!("request token endpoint: {e}")))?;

        // Temporary-credential request, signed with the consumer secret
        // only; there is no token secret yet.
        let mut oauth_params = self.base_oauth_params();
        oauth_params.push(("oauth_callback".to_string(), callback_url.to_string()));

        let credentials = self
            .execute_signed_post(&request_token_url, oauth_params, None)
            .await?;

        if credentials.get("oauth_callback_confirmed").map(String::as_str) != Some("true") {
            return Err(FlowError::token_exchange(
                name,
                None,
                "provider did not confirm the callback",
            ));
        }

        let token = credentials.get("oauth_token").ok_or_else(|| {
            FlowError::token_exchange(name, None, "temporary credential carried no oauth_token")
        })?;
        let secret = credentials.get("oauth_token_secret").ok_or_else(|| {
            FlowError::token_exchange(
                name,
                None,
                "temporary credential carried no oauth_token_secret",
            )
        })?;

        let mut url = Url::parse(self.descriptor.authorize_endpoint)
            .map_err(|e| self.invalid_url(format!("authorize endpoint: {e}")))?;
        url.query_pairs_mut().append_pair("oauth_token", token);
        for (name, value) in extra_params {
            url.query_pairs_mut().append_pair(name, value);
        }

        self.logger
            .debug(&format!("{name}: redirecting to authorize endpoint"));

        Ok(RedirectInstruction {
            url,
            state: FlowState::new(token, callback_url).with_temporary_secret(secret),
        })
    }

    async fn complete_authentication(
        &self,
        query: &HashMap<String, String>,
        state: &FlowState,
    ) -> Result<AuthenticatedIdentity, FlowError> {
        let name = self.descriptor.name;

        // The user backed out at the provider.
        if let Some(token) = query.get("denied") {
            return Err(FlowError::UserDenied {
                provider: name.to_string(),
                message: format!("authorization for token '{token}' was denied"),
            });
        }

        // The returned token must be the one issued at begin, and a
        // verifier must be present; neither check touches the network.
        let token = query.get("oauth_token").map(String::as_str).unwrap_or_default();
        if state.state.is_empty() || token != state.state {
            return Err(FlowError::StateMismatch {
                provider: name.to_string(),
            });
        }
        let verifier = query.get("oauth_verifier").ok_or(FlowError::StateMismatch {
            provider: name.to_string(),
        })?;
        let temporary_secret =
            state
                .temporary_secret
                .as_deref()
                .ok_or(FlowError::StateMismatch {
                    provider: name.to_string(),
                })?;

        // Exchange the verifier for a permanent credential, signed with
        // consumer + temporary secret.
        let access_token_url = Url::parse(self.descriptor.access_token_endpoint)
            .map_err(|e| self.invalid_url(format!("access token endpoint: {e}")))?;

        let mut oauth_params = self.base_oauth_params();
        oauth_params.push(("oauth_token".to_string(), token.to_string()));
        oauth_params.push(("oauth_verifier".to_string(), verifier.clone()));

        let credentials = self
            .execute_signed_post(&access_token_url, oauth_params, Some(temporary_secret))
            .await?;

        let permanent_token = credentials.get("oauth_token").ok_or_else(|| {
            FlowError::token_exchange(name, None, "permanent credential carried no oauth_token")
        })?;
        let permanent_secret = credentials.get("oauth_token_secret").ok_or_else(|| {
            FlowError::token_exchange(
                name,
                None,
                "permanent credential carried no oauth_token_secret",
            )
        })?;
        let access_token = AccessToken::new(permanent_token.clone()).with_secret(permanent_secret.clone());

        // Fetch the profile, signed with consumer + permanent secret.
        let profile_url = Url::parse(self.descriptor.profile_endpoint)
            .map_err(|e| self.invalid_url(format!("profile endpoint: {e}")))?;

        let mut oauth_params = self.base_oauth_params();
        oauth_params.push(("oauth_token".to_string(), permanent_token.clone()));
        let header_params = self.signed_params(
            "GET",
            &profile_url,
            oauth_params,
            Some(permanent_secret.as_str()),
        );

        let request = HttpRequest::get(profile_url.as_str())
            .with_header("Authorization", authorization_header(&header_params));

        let response = self.transport.execute(request).await.map_err(|e| match e {
            TransportError::Cancelled => FlowError::Cancelled {
                provider: name.to_string(),
            },
            TransportError::Io(message) => FlowError::profile_fetch(name, None, message),
        })?;

        if !response.is_success() {
            return Err(FlowError::profile_fetch(
                name,
                Some(response.status),
                "profile endpoint rejected the signed request",
            ));
        }

        let profile: serde_json::Value = serde_json::from_str(&response.body).map_err(|e| {
            FlowError::profile_fetch(
                name,
                Some(response.status),
                format!("unparsable profile body: {e}"),
            )
        })?;

        let user_information =
            (self.descriptor.map_profile)(&profile).map_err(|e| FlowError::Normalization {
                provider: name.to_string(),
                field: e.field,
            })?;

        self.logger
            .info(&format!("{name}: authenticated user {}", user_information.id));

        Ok(AuthenticatedIdentity {
            provider_name: name.to_string(),
            access_token,
            user_information,
            raw_profile: response.body,
        })
    }
}
