// The provider registry.
//
// Resolves host configuration entries to concrete provider instances by
// matching configured names against an explicit table of available
// implementations. Purely in-memory construction, no I/O; errors here are
// fatal at startup and the host never receives a partially built registry.

use std::collections::HashMap;
use std::sync::Arc;

use socialauth_core::{
    AuthenticationProvider, FlowLogger, HttpTransport, ProviderConfig, ProviderParams,
    RegistryError,
};

/// Builds one provider instance from credentials, an optional injected
/// transport, and the logger.
pub type ProviderConstructor = fn(
    ProviderParams,
    Option<Arc<dyn HttpTransport>>,
    FlowLogger,
) -> Arc<dyn AuthenticationProvider>;

/// One entry in the table of available implementations: a canonical name
/// plus the constructor the registry calls when a configuration matches.
#[derive(Clone, Copy)]
pub struct AvailableProvider {
    pub name: &'static str,
    pub construct: ProviderConstructor,
}

/// Named, configured provider instances, keyed case-insensitively.
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn AuthenticationProvider>>,
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry")
            .field("providers", &self.providers.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl ProviderRegistry {
    /// Build a registry from host configuration.
    ///
    /// Each configured name is matched against available implementation
    /// names with a lower-cased prefix rule, so a user-chosen short name
    /// binds to the implementation's identifier ("windows" finds
    /// "WindowsLive"). Zero matches and ambiguous matches are both fatal.
    ///
    /// When two configurations resolve to the same canonical key, the
    /// first wins and later ones are ignored.
    pub fn build(
        configs: &[ProviderConfig],
        available: &[AvailableProvider],
        transport: Option<Arc<dyn HttpTransport>>,
        logger: FlowLogger,
    ) -> Result<Self, RegistryError> {
        if configs.is_empty() {
            return Err(RegistryError::Configuration);
        }
        if available.is_empty() {
            return Err(RegistryError::Registration);
        }

        let mut providers: HashMap<String, Arc<dyn AuthenticationProvider>> = HashMap::new();

        for config in configs {
            let configured = config.name.to_lowercase();

            let matches: Vec<&AvailableProvider> = available
                .iter()
                .filter(|candidate| candidate.name.to_lowercase().starts_with(&configured))
                .collect();

            let matched = match matches.as_slice() {
                [] => {
                    return Err(RegistryError::ProviderNotFound {
                        key: configured.clone(),
                    })
                }
                [single] => *single,
                many => {
                    return Err(RegistryError::Ambiguous {
                        key: configured.clone(),
                        candidates: many.iter().map(|c| c.name.to_string()).collect(),
                    })
                }
            };

            let key = matched.name.to_lowercase();
            if providers.contains_key(&key) {
                logger.warn(&format!(
                    "duplicate configuration for provider '{key}'; keeping the first entry"
                ));
                continue;
            }

            let params = ProviderParams::new(
                config.key.clone(),
                config.secret.clone(),
                config.scopes.clone(),
            );
            let provider = (matched.construct)(params, transport.clone(), logger.clone());
            providers.insert(key, provider);
        }

        logger.info(&format!(
            "registry built with {} provider(s)",
            providers.len()
        ));

        Ok(Self { providers })
    }

    /// Case-insensitive lookup by configured or canonical name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn AuthenticationProvider>> {
        self.providers.get(&name.to_lowercase()).cloned()
    }

    /// The canonical (lower-cased) provider keys, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.providers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}
