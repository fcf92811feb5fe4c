//! # gomodgraph - Dependency Graphs of the Go Modules on a GitLab Instance
//!
//! gomodgraph downloads the `go.mod` file of every project on a GitLab
//! instance, builds the dependency graph between the modules it found and
//! renders it through Graphviz. Edges requiring an outdated release of a
//! module are highlighted, so lagging dependents stand out.
//!
//! ## Main Components
//!
//! - **Manifest**: Parses `go.mod` files into module records
//! - **Cache**: Keeps downloaded manifests on disk between runs
//! - **GitLab**: Lists projects and downloads their manifests
//! - **Graph**: Builds the module graph, derives neighborhoods and renders
//!   them
//! - **Server**: Serves the rendered graphs over HTTP
//!
//! ## Usage
//!
//! ### Example: Rendering a Module's Neighborhood
//!
//! ```no_run
//! use gomodgraph::cache::ManifestCache;
//! use gomodgraph::cli::ImageFormat;
//! use gomodgraph::graph::{DependencyGraph, GraphRenderer, GraphvizEngine};
//! use miette::IntoDiagnostic;
//!
//! # fn main() -> miette::Result<()> {
//! // Step 1: Read the manifests a previous `gomodgraph fetch` downloaded
//! let cache = ManifestCache::new("/tmp/gomodgraph/");
//! let records = cache.read_records()?;
//!
//! // Step 2: Build the graph of all scanned modules
//! let graph = DependencyGraph::build(&records);
//! println!("Found {} modules", graph.module_count());
//!
//! // Step 3: Cut out the neighborhood of one module
//! let registry_prefix = "gitlab.example.com/";
//! let Some(center) = graph.resolve("team/api", registry_prefix) else {
//!     eprintln!("team/api is not a known module");
//!     return Ok(());
//! };
//! let neighborhood = graph.subgraph_from(center);
//!
//! // Step 4: Render it
//! let renderer = GraphRenderer::new(registry_prefix);
//! let svg = renderer.render(&neighborhood, ImageFormat::Svg, &GraphvizEngine::default())?;
//! std::fs::write("team-api.svg", svg).into_diagnostic()?;
//! # Ok(())
//! # }
//! ```
//!
//! ### Example: Finding Stale Requirements
//!
//! ```
//! use gomodgraph::graph::DependencyGraph;
//! use gomodgraph::manifest::{ModuleRecord, Requirement};
//!
//! let graph = DependencyGraph::build(&[
//!     ModuleRecord::new("gitlab.example.com/team/api")
//!         .with_requirement(Requirement::new("gitlab.example.com/team/model", "v1.0.0")),
//!     ModuleRecord::new("gitlab.example.com/team/model").with_latest_version("v1.3.0"),
//! ]);
//!
//! for (id, module) in graph.modules() {
//!     for dependency in graph.requires(id) {
//!         let target = graph.module(dependency.target);
//!         if target.is_stale(dependency.required_version) {
//!             println!(
//!                 "{} requires {} {} (latest {})",
//!                 module.name(),
//!                 target.name(),
//!                 dependency.required_version,
//!                 target.version().unwrap_or_default()
//!             );
//!         }
//!     }
//! }
//! ```

// Private modules
mod constants;
mod utils;

// Public modules
pub mod cache;
pub mod cli;
pub mod commands;
pub mod common;
pub mod config;
pub mod error;
pub mod executors;
pub mod gitlab;
pub mod graph;
pub mod logger;
pub mod manifest;
pub mod progress;
pub mod server;

// Main entry point for the library
pub fn run() -> miette::Result<()> {
    use clap::Parser;

    use crate::cli::Cli;
    use crate::commands::execute_command;

    let cli = Cli::parse();
    logger::init_logger(cli.verbose, cli.quiet);

    execute_command(cli.command)
}
