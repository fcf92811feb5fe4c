//! Render command executor

use std::fs;
use std::io::{self, Write};

use console::style;
use miette::{IntoDiagnostic, Result, WrapErr};

use super::load_graph;
use crate::config::RenderConfig;
use crate::error::GomodGraphError;
use crate::executors::CommandExecutor;
use crate::graph::{GraphRenderer, GraphvizEngine};
use crate::progress::ProgressReporter;

pub struct RenderExecutor;

impl CommandExecutor for RenderExecutor {
    type Config = RenderConfig;

    fn execute(config: Self::Config) -> Result<()> {
        let mut progress = ProgressReporter::new();
        let graph = load_graph(&config.source, &mut progress)?;

        let renderer = GraphRenderer::new(config.source.registry_prefix.clone());
        let engine = GraphvizEngine::new(&config.graphviz_bin);

        let image = match config.module.as_deref() {
            Some(name) => {
                let center = graph
                    .resolve(name, renderer.registry_prefix())
                    .ok_or_else(|| GomodGraphError::UnknownModule {
                        name: name.to_string(),
                    })?;

                eprintln!(
                    "{} Rendering {} graph for {}...",
                    style("📊").cyan(),
                    config.format,
                    style(graph.module(center).name()).green()
                );
                renderer.render(&graph.subgraph_from(center), config.format, &engine)?
            }
            None => {
                eprintln!(
                    "{} Rendering {} overview graph...",
                    style("📊").cyan(),
                    config.format
                );
                renderer.render(&graph, config.format, &engine)?
            }
        };

        // The image is complete at this point, nothing half-written reaches
        // the output
        match config.output.as_ref() {
            Some(output_path) => {
                fs::write(output_path, &image)
                    .into_diagnostic()
                    .wrap_err_with(|| {
                        format!("Failed to write output file '{}'", output_path.display())
                    })?;
                eprintln!(
                    "{} Graph written to {}",
                    style("✓").green(),
                    style(output_path.display()).bold()
                );
            }
            None => {
                let mut stdout = io::stdout().lock();
                stdout
                    .write_all(&image)
                    .and_then(|()| stdout.flush())
                    .into_diagnostic()
                    .wrap_err("Failed to write graph to stdout")?;
            }
        }

        Ok(())
    }
}
