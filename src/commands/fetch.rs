//! Fetch command implementation

use miette::{Result, WrapErr};

use crate::cli::Commands;
use crate::common::{ConfigBuilder, FromCommand};
use crate::config::{FetchConfig, SourceConfig};
use crate::error::GomodGraphError;

impl FromCommand for FetchConfig {
    fn from_command(command: Commands) -> Result<Self, GomodGraphError> {
        match command {
            Commands::Fetch { gitlab, cache } => FetchConfig::builder()
                .with_source(SourceConfig::from_args(gitlab, cache)?)
                .build(),
            _ => Err(GomodGraphError::ConfigurationError {
                message: "Invalid command type for FetchConfig".to_string(),
            }),
        }
    }
}

crate::impl_try_from_command!(FetchConfig);

/// Execute the fetch command filling the manifest cache
pub fn execute_fetch_command(command: Commands) -> Result<()> {
    let config = FetchConfig::from_command(command)
        .wrap_err("Failed to parse fetch command configuration")?;

    use crate::executors::CommandExecutor;
    use crate::executors::fetch::FetchExecutor;
    FetchExecutor::execute(config)
}
