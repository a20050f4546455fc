// The built-in provider table.
//
// An explicit, build-time-checked list of (name, constructor) pairs —
// the registry never inspects types at runtime. Hosts that write their
// own providers append to a copy of this table before building.

use std::sync::Arc;

use socialauth_core::{AuthenticationProvider, FlowLogger, HttpTransport, ProviderParams};
use socialauth_oauth1::{providers::twitter, OAuth1Provider};
use socialauth_oauth2::{
    providers::{facebook, google, windows_live},
    OAuth2Provider,
};

use crate::registry::AvailableProvider;

fn construct_google(
    params: ProviderParams,
    transport: Option<Arc<dyn HttpTransport>>,
    logger: FlowLogger,
) -> Arc<dyn AuthenticationProvider> {
    Arc::new(OAuth2Provider::new(google::GOOGLE, params, transport, logger))
}

fn construct_facebook(
    params: ProviderParams,
    transport: Option<Arc<dyn HttpTransport>>,
    logger: FlowLogger,
) -> Arc<dyn AuthenticationProvider> {
    Arc::new(OAuth2Provider::new(
        facebook::FACEBOOK,
        params,
        transport,
        logger,
    ))
}

fn construct_twitter(
    params: ProviderParams,
    transport: Option<Arc<dyn HttpTransport>>,
    logger: FlowLogger,
) -> Arc<dyn AuthenticationProvider> {
    Arc::new(OAuth1Provider::new(
        twitter::TWITTER,
        params,
        transport,
        logger,
    ))
}

fn construct_windows_live(
    params: ProviderParams,
    transport: Option<Arc<dyn HttpTransport>>,
    logger: FlowLogger,
) -> Arc<dyn AuthenticationProvider> {
    Arc::new(OAuth2Provider::new(
        windows_live::WINDOWS_LIVE,
        params,
        transport,
        logger,
    ))
}

/// The providers this workspace ships: Google, Facebook, Twitter,
/// Windows Live.
pub fn builtin_providers() -> Vec<AvailableProvider> {
    vec![
        AvailableProvider {
            name: "Google",
            construct: construct_google,
        },
        AvailableProvider {
            name: "Facebook",
            construct: construct_facebook,
        },
        AvailableProvider {
            name: "Twitter",
            construct: construct_twitter,
        },
        AvailableProvider {
            name: "WindowsLive",
            construct: construct_windows_live,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table_names() {
        let names: Vec<&str> = builtin_providers().iter().map(|p| p.name).collect();
        assert_eq!(names, vec!["Google", "Facebook", "Twitter", "WindowsLive"]);
    }

    #[test]
    fn test_constructors_produce_named_providers() {
        for available in builtin_providers() {
            let provider = (available.construct)(
                ProviderParams::new("key", "secret", Vec::new()),
                None,
                FlowLogger::disabled(),
            );
            assert_eq!(provider.name(), available.name);
        }
    }
}
