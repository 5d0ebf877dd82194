//! Client configuration: API key and server location.

use crate::{
    error::{DataFlowError, DataFlowResult},
    validate::validate_str,
};
use log::info;
use url::Url;

/// Staging server used when no base URL is supplied
pub const DEFAULT_BASE_URL: &str = "https://dataflow-staging.ornl.gov/api/v1";

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "DATAFLOW_API_KEY";

/// Environment variable holding an optional server URL
pub const BASE_URL_ENV: &str = "DATAFLOW_URL";

/// Immutable connection settings for a [`DataFlowClient`](crate::DataFlowClient)
#[derive(Clone)]
pub struct DataFlowConfig {
    api_key: String,
    base_url: Url,
}

impl DataFlowConfig {
    /// Configuration pointing at the staging server
    pub fn new(api_key: impl Into<String>) -> DataFlowResult<Self> {
        info!("Using staging server as default");
        Self::with_base_url(api_key, DEFAULT_BASE_URL)
    }

    /// Configuration pointing at an explicit server
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl AsRef<str>) -> DataFlowResult<Self> {
        let api_key = api_key.into();
        validate_str(&api_key, "api_key")?;
        let base_url = Url::parse(base_url.as_ref().trim_end_matches('/'))?;

        Ok(Self { api_key, base_url })
    }

    /// Read `DATAFLOW_API_KEY` and, if set, `DATAFLOW_URL`
    pub fn from_env() -> DataFlowResult<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| {
            DataFlowError::invalid_param(format!(
                "{} is not set. Generate an API key from DataFlow",
                API_KEY_ENV
            ))
        })?;

        match std::env::var(BASE_URL_ENV) {
            Ok(url) if !url.trim().is_empty() => Self::with_base_url(api_key, url.trim()),
            _ => Self::new(api_key),
        }
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Absolute URL for a path relative to the base URL
    pub fn endpoint(&self, path: &str) -> DataFlowResult<Url> {
        let url = format!(
            "{}/{}",
            self.base_url.as_str().trim_end_matches('/'),
            path.trim_start_matches('/')
        );
        Ok(Url::parse(&url)?)
    }
}

impl std::fmt::Debug for DataFlowConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DataFlowConfig")
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url.as_str())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_staging_server() {
        let config = DataFlowConfig::new("key").unwrap();
        assert_eq!(config.base_url().as_str(), DEFAULT_BASE_URL);
        assert_eq!(config.api_key(), "key");
    }

    #[test]
    fn endpoint_appends_path_to_base() {
        let config = DataFlowConfig::with_base_url("key", "https://example.org/api/v1/").unwrap();
        assert_eq!(
            config.endpoint("datasets").unwrap().as_str(),
            "https://example.org/api/v1/datasets"
        );
        assert_eq!(
            config.endpoint("user-settings/").unwrap().as_str(),
            "https://example.org/api/v1/user-settings/"
        );
    }

    #[test]
    fn rejects_blank_api_key() {
        let result = DataFlowConfig::with_base_url("   ", DEFAULT_BASE_URL);
        assert!(matches!(result, Err(DataFlowError::InvalidParameter(_))));
    }

    #[test]
    fn rejects_malformed_base_url() {
        let result = DataFlowConfig::with_base_url("key", "not a url");
        assert!(matches!(result, Err(DataFlowError::Url(_))));
    }

    #[test]
    fn debug_output_hides_key() {
        let config = DataFlowConfig::new("super-secret").unwrap();
        assert!(!format!("{:?}", config).contains("super-secret"));
    }
}
