//! Render command implementation

use miette::{Result, WrapErr};

use crate::cli::Commands;
use crate::common::{ConfigBuilder, FromCommand};
use crate::config::{RenderConfig, SourceConfig};
use crate::error::GomodGraphError;

impl FromCommand for RenderConfig {
    fn from_command(command: Commands) -> Result<Self, GomodGraphError> {
        match command {
            Commands::Render {
                gitlab,
                cache,
                render,
                module,
                format,
                output,
            } => RenderConfig::builder()
                .with_source(SourceConfig::from_args(gitlab, cache)?)
                .with_graphviz_bin(render.graphviz_bin)
                .with_module(module)
                .with_format(format)
                .with_output(output)
                .build(),
            _ => Err(GomodGraphError::ConfigurationError {
                message: "Invalid command type for RenderConfig".to_string(),
            }),
        }
    }
}

crate::impl_try_from_command!(RenderConfig);

/// Execute the render command writing one graph image
pub fn execute_render_command(command: Commands) -> Result<()> {
    let config = RenderConfig::from_command(command)
        .wrap_err("Failed to parse render command configuration")?;

    use crate::executors::CommandExecutor;
    use crate::executors::render::RenderExecutor;
    RenderExecutor::execute(config)
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;
    use crate::cli::{Cli, ImageFormat};

    fn parse(args: &[&str]) -> Commands {
        let mut argv = vec!["gomodgraph"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command
    }

    #[test]
    fn test_render_config_from_command() {
        let command = parse(&[
            "render",
            "--gitlab-base-url",
            "https://gitlab.example.com",
            "--cache-dir",
            "/tmp/gomodgraph-test",
            "--mod",
            "team/api",
            "--format",
            "dot",
            "--output",
            "graph.dot",
        ]);

        let config = RenderConfig::try_from(command).unwrap();
        assert_eq!(config.module.as_deref(), Some("team/api"));
        assert_eq!(config.format, ImageFormat::Dot);
        assert_eq!(config.output.as_deref(), Some(std::path::Path::new("graph.dot")));
        assert_eq!(config.source.registry_prefix, "gitlab.example.com/");
    }

    #[test]
    fn test_wrong_command_is_rejected() {
        let command = parse(&[
            "serve",
            "--gitlab-base-url",
            "https://gitlab.example.com",
        ]);

        assert!(RenderConfig::try_from(command).is_err());
    }
}
