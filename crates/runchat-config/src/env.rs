//! Credentials read from the process environment.

use std::fmt;

use runchat_common::ConfigError;

pub const ENDPOINT_VAR: &str = "AZURE_OPENAI_ENDPOINT";
pub const API_KEY_VAR: &str = "AZURE_OPENAI_API_KEY";
pub const API_VERSION_VAR: &str = "AZURE_OPENAI_API_VERSION";
pub const SEARCH_ENDPOINT_VAR: &str = "AZURE_SEARCH_ENDPOINT";
pub const SEARCH_API_KEY_VAR: &str = "AZURE_SEARCH_API_KEY";
pub const SEARCH_INDEX_VAR: &str = "AZURE_SEARCH_INDEX";

pub const DEFAULT_API_VERSION: &str = "2024-05-01-preview";

/// Connection details for the hosted assistant service.
#[derive(Clone)]
pub struct Credentials {
    pub endpoint: String,
    pub api_key: String,
    pub api_version: String,
    /// Retrieval augmentation, enabled only when all three search variables are set.
    pub search: Option<SearchCredentials>,
}

/// Connection details for the search index used for retrieval augmentation.
#[derive(Clone)]
pub struct SearchCredentials {
    pub endpoint: String,
    pub api_key: String,
    pub index_name: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("api_version", &self.api_version)
            .field("search", &self.search)
            .finish()
    }
}

impl fmt::Debug for SearchCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchCredentials")
            .field("endpoint", &self.endpoint)
            .field("api_key", &"[REDACTED]")
            .field("index_name", &self.index_name)
            .finish()
    }
}

impl Credentials {
    /// Read credentials from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read credentials through an arbitrary lookup. Empty values count as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let endpoint =
            get(ENDPOINT_VAR).ok_or_else(|| ConfigError::MissingEnv(ENDPOINT_VAR.into()))?;
        let api_key =
            get(API_KEY_VAR).ok_or_else(|| ConfigError::MissingEnv(API_KEY_VAR.into()))?;
        let api_version = get(API_VERSION_VAR).unwrap_or_else(|| DEFAULT_API_VERSION.to_string());

        let search = match (
            get(SEARCH_ENDPOINT_VAR),
            get(SEARCH_API_KEY_VAR),
            get(SEARCH_INDEX_VAR),
        ) {
            (Some(endpoint), Some(api_key), Some(index_name)) => Some(SearchCredentials {
                endpoint,
                api_key,
                index_name,
            }),
            (None, None, None) => None,
            _ => {
                tracing::warn!(
                    "retrieval augmentation disabled: {SEARCH_ENDPOINT_VAR}, \
                     {SEARCH_API_KEY_VAR} and {SEARCH_INDEX_VAR} must all be set"
                );
                None
            }
        };

        Ok(Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            api_key,
            api_version,
            search,
        })
    }
}
