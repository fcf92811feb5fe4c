//! Serve command executor

use std::sync::Arc;

use console::style;
use miette::{IntoDiagnostic, Result, WrapErr};
use tracing::warn;

use super::load_graph;
use crate::config::ServeConfig;
use crate::executors::CommandExecutor;
use crate::graph::{GraphRenderer, GraphvizEngine};
use crate::progress::ProgressReporter;
use crate::server::{self, ServerState};

pub struct ServeExecutor;

impl CommandExecutor for ServeExecutor {
    type Config = ServeConfig;

    fn execute(config: Self::Config) -> Result<()> {
        // The graph is built before the runtime exists; the blocking HTTP
        // client used for downloads must not run inside it
        let mut progress = ProgressReporter::new();
        let graph = load_graph(&config.source, &mut progress)?;

        let renderer = GraphRenderer::new(config.source.registry_prefix.clone());

        if let Some(home) = config.home_module.as_deref()
            && graph.resolve(home, renderer.registry_prefix()).is_none()
        {
            warn!(module = home, "home module is not among the scanned modules");
        }

        let state = ServerState::new(
            graph,
            renderer,
            Arc::new(GraphvizEngine::new(&config.graphviz_bin)),
        );

        eprintln!(
            "{} Serving {} modules on localhost (Ctrl+C to stop)",
            style("🌐").cyan(),
            style(state.graph().module_count()).yellow().bold()
        );

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .into_diagnostic()
            .wrap_err("Failed to start async runtime")?;

        runtime
            .block_on(server::serve(state, config.port, config.home_module.as_deref()))
            .wrap_err("Serving failed")?;

        Ok(())
    }
}
