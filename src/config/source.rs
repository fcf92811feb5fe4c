//! GitLab and cache settings shared by every command

use std::path::PathBuf;

use reqwest::Url;

use crate::common::{CacheArgs, ConfigBuilder, GitLabArgs, required};
use crate::error::GomodGraphError;

#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub gitlab_base_url: String,
    pub token: Option<String>,
    /// `<gitlab host>/`, the prefix shared by all scanned module paths
    pub registry_prefix: String,
    pub cache_dir: PathBuf,
    pub refresh: bool,
}

impl SourceConfig {
    pub fn builder() -> SourceConfigBuilder {
        SourceConfigBuilder::new()
    }

    pub fn from_args(gitlab: GitLabArgs, cache: CacheArgs) -> Result<Self, GomodGraphError> {
        SourceConfig::builder()
            .with_gitlab_base_url(gitlab.gitlab_base_url)
            .with_token(gitlab.token)
            .with_cache_dir(cache.cache_dir)
            .with_refresh(cache.refresh)
            .build()
    }

    /// The token, or an error explaining why a download needs one
    pub fn require_token(&self) -> Result<&str, GomodGraphError> {
        self.token
            .as_deref()
            .filter(|token| !token.is_empty())
            .ok_or_else(|| GomodGraphError::ConfigurationError {
                message: "a GitLab API token is required to download manifests, set \
                          GITLAB_API_TOKEN or pass --token"
                    .to_string(),
            })
    }
}

#[derive(Default)]
pub struct SourceConfigBuilder {
    gitlab_base_url: Option<String>,
    token: Option<Option<String>>,
    cache_dir: Option<PathBuf>,
    refresh: Option<bool>,
}

impl SourceConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_gitlab_base_url(mut self, gitlab_base_url: impl Into<String>) -> Self {
        self.gitlab_base_url = Some(gitlab_base_url.into());
        self
    }

    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = Some(token);
        self
    }

    pub fn with_cache_dir(mut self, cache_dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(cache_dir.into());
        self
    }

    pub fn with_refresh(mut self, refresh: bool) -> Self {
        self.refresh = Some(refresh);
        self
    }
}

impl ConfigBuilder for SourceConfigBuilder {
    type Config = SourceConfig;

    fn build(self) -> Result<Self::Config, GomodGraphError> {
        let gitlab_base_url = required(self.gitlab_base_url, "gitlab_base_url")?;
        let registry_prefix = registry_prefix(&gitlab_base_url)?;

        Ok(SourceConfig {
            gitlab_base_url,
            token: self.token.flatten(),
            registry_prefix,
            cache_dir: required(self.cache_dir, "cache_dir")?,
            refresh: self.refresh.unwrap_or(false),
        })
    }
}

/// Derive `<host>/` from the GitLab base URL
fn registry_prefix(base_url: &str) -> Result<String, GomodGraphError> {
    let invalid = |reason: String| GomodGraphError::ConfigurationError {
        message: format!("GitLab base URL '{base_url}' is not a valid URL: {reason}"),
    };

    let url = Url::parse(base_url).map_err(|e| invalid(e.to_string()))?;
    if !matches!(url.scheme(), "http" | "https") {
        return Err(invalid(format!("unsupported scheme '{}'", url.scheme())));
    }
    let host = url
        .host_str()
        .ok_or_else(|| invalid("missing host".to_string()))?;

    Ok(format!("{host}/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> SourceConfigBuilder {
        SourceConfig::builder()
            .with_gitlab_base_url("https://gitlab.example.com:8443/api/v4")
            .with_cache_dir("/tmp/cache")
    }

    #[test]
    fn test_registry_prefix_is_host() {
        let config = builder().build().unwrap();
        assert_eq!(config.registry_prefix, "gitlab.example.com/");
        assert!(!config.refresh);
        assert_eq!(config.token, None);
    }

    #[test]
    fn test_invalid_base_url() {
        let err = builder()
            .with_gitlab_base_url("gitlab.example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, GomodGraphError::ConfigurationError { .. }));

        let err = builder()
            .with_gitlab_base_url("ftp://gitlab.example.com")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("unsupported scheme"));
    }

    #[test]
    fn test_missing_cache_dir() {
        let err = SourceConfig::builder()
            .with_gitlab_base_url("https://gitlab.example.com")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("cache_dir"));
    }

    #[test]
    fn test_require_token() {
        let config = builder().build().unwrap();
        assert!(config.require_token().is_err());

        let config = builder()
            .with_token(Some("glpat-123".to_string()))
            .build()
            .unwrap();
        assert_eq!(config.require_token().unwrap(), "glpat-123");

        let config = builder().with_token(Some(String::new())).build().unwrap();
        assert!(config.require_token().is_err());
    }
}
