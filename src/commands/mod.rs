//! Command implementations for the gomodgraph CLI
//!
//! This module contains the implementations for each CLI command:
//! - fetch: Download all go.mod files into the local cache
//! - render: Render the dependency graph to a file
//! - serve: Serve the browsable dependency graph over HTTP

pub mod fetch;
pub mod render;
pub mod serve;

use miette::Result;

use crate::cli::Commands;

/// Execute a command based on CLI input
pub fn execute_command(command: Commands) -> Result<()> {
    match &command {
        Commands::Fetch { .. } => fetch::execute_fetch_command(command),
        Commands::Render { .. } => render::execute_render_command(command),
        Commands::Serve { .. } => serve::execute_serve_command(command),
    }
}
