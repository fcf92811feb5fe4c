//! Common functionality shared across commands

use std::path::PathBuf;

use clap::Args;

use crate::error::GomodGraphError;

/// GitLab connection arguments
#[derive(Args, Debug, Clone)]
pub struct GitLabArgs {
    /// Base URL of the GitLab instance, e.g. https://gitlab.example.com
    #[arg(long, value_name = "URL", env = "GITLAB_BASE_URL")]
    pub gitlab_base_url: String,

    /// API token with read_api scope (only needed to fill the cache)
    #[arg(long, env = "GITLAB_API_TOKEN", hide_env_values = true)]
    pub token: Option<String>,
}

/// Manifest cache arguments
#[derive(Args, Debug, Clone)]
pub struct CacheArgs {
    /// Directory holding the downloaded go.mod files
    #[arg(
        long,
        value_name = "DIR",
        default_value = crate::constants::cache::DEFAULT_DIR,
        env = "GOMODGRAPH_CACHE_DIR"
    )]
    pub cache_dir: PathBuf,

    /// Clear the cache and download all manifests again
    #[arg(long, env = "GOMODGRAPH_REFRESH")]
    pub refresh: bool,
}

/// Rendering arguments
#[derive(Args, Debug, Clone)]
pub struct RenderArgs {
    /// Graphviz `dot` executable used for SVG and PNG output
    #[arg(
        long,
        value_name = "PATH",
        default_value = crate::constants::render::DEFAULT_GRAPHVIZ_BIN,
        env = "GOMODGRAPH_GRAPHVIZ_BIN"
    )]
    pub graphviz_bin: PathBuf,
}

/// Generic builder trait for configuration objects
pub trait ConfigBuilder: Sized {
    type Config;

    /// Build the configuration, returning an error if validation fails
    fn build(self) -> Result<Self::Config, GomodGraphError>;
}

/// Trait for configurations that can be created from CLI commands
/// This trait simplifies command-to-config conversions
pub trait FromCommand: Sized {
    /// The command variant that this config can be created from
    fn from_command(command: crate::cli::Commands) -> Result<Self, GomodGraphError>;
}

/// Unwrap a builder field, failing with a configuration error if it was
/// never set
pub fn required<T>(value: Option<T>, field: &str) -> Result<T, GomodGraphError> {
    value.ok_or_else(|| GomodGraphError::ConfigurationError {
        message: format!("Missing required field: {field}"),
    })
}

/// Macro to implement `TryFrom<Commands>` using [`FromCommand`] trait
#[macro_export]
macro_rules! impl_try_from_command {
    ($config:ty) => {
        impl std::convert::TryFrom<$crate::cli::Commands> for $config {
            type Error = $crate::error::GomodGraphError;

            fn try_from(command: $crate::cli::Commands) -> Result<Self, Self::Error> {
                <$config as $crate::common::FromCommand>::from_command(command)
            }
        }
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_required_present() {
        assert_eq!(required(Some(3), "port").unwrap(), 3);
    }

    #[test]
    fn test_required_missing() {
        let err = required::<u16>(None, "port").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Configuration error: Missing required field: port"
        );
    }
}
