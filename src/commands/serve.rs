//! Serve command implementation

use miette::{Result, WrapErr};

use crate::cli::Commands;
use crate::common::{ConfigBuilder, FromCommand};
use crate::config::{ServeConfig, SourceConfig};
use crate::error::GomodGraphError;

impl FromCommand for ServeConfig {
    fn from_command(command: Commands) -> Result<Self, GomodGraphError> {
        match command {
            Commands::Serve {
                gitlab,
                cache,
                render,
                home_module,
                port,
            } => ServeConfig::builder()
                .with_source(SourceConfig::from_args(gitlab, cache)?)
                .with_graphviz_bin(render.graphviz_bin)
                .with_home_module(home_module)
                .with_port(port)
                .build(),
            _ => Err(GomodGraphError::ConfigurationError {
                message: "Invalid command type for ServeConfig".to_string(),
            }),
        }
    }
}

crate::impl_try_from_command!(ServeConfig);

/// Execute the serve command starting the HTTP front end
pub fn execute_serve_command(command: Commands) -> Result<()> {
    let config = ServeConfig::from_command(command)
        .wrap_err("Failed to parse serve command configuration")?;

    use crate::executors::CommandExecutor;
    use crate::executors::serve::ServeExecutor;
    ServeExecutor::execute(config)
}
