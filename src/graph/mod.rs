//! # Graph Construction and Rendering Module
//!
//! Builds the dependency graph of the scanned Go modules, derives
//! neighborhood views from it and renders both through Graphviz.
//!
//! ## Components
//!
//! ### Graph Building
//! - **DependencyGraphBuilder**: Constructs the graph from parsed manifests
//! - **DependencyGraph**: Immutable graph with name lookup and name-ordered
//!   iteration, shareable across threads
//! - **ModuleNode**: One Go module with its latest release and toolchain
//! - **DependencyEdge**: A direct `require` between two scanned modules
//!
//! ### Graph Rendering
//! - **GraphRenderer**: Styles the graph and emits Graphviz DOT
//! - **LayoutEngine**: Turns DOT into SVG or PNG, **GraphvizEngine** runs the
//!   `dot` program for it
//!
//! ## Example
//!
//! ```
//! use gomodgraph::graph::{DependencyGraph, GraphRenderer};
//! use gomodgraph::manifest::{ModuleRecord, Requirement};
//!
//! # fn main() -> miette::Result<()> {
//! let graph = DependencyGraph::build(&[
//!     ModuleRecord::new("gitlab.example.com/team/app")
//!         .with_toolchain_version("1.22")
//!         .with_requirement(Requirement::new("gitlab.example.com/team/lib", "v1.0.0")),
//!     ModuleRecord::new("gitlab.example.com/team/lib").with_latest_version("v1.1.0"),
//! ]);
//!
//! // Neighborhood of the library, with the library highlighted
//! let lib = graph.lookup("gitlab.example.com/team/lib").unwrap();
//! let neighborhood = graph.subgraph_from(lib);
//! assert_eq!(neighborhood.module_count(), 2);
//!
//! let renderer = GraphRenderer::new("gitlab.example.com/");
//! let mut output = Vec::new();
//! renderer.render_dot(&neighborhood, &mut output)?;
//!
//! let dot = String::from_utf8(output).unwrap();
//! assert!(dot.contains("team/app"));
//! // app requires an outdated release of lib
//! assert!(dot.contains("darkorange"));
//! # Ok(())
//! # }
//! ```

mod builder;
mod dependency_graph;
mod engine;
mod renderer;
mod subgraph;
mod types;

// Re-export main types and builders
pub use builder::DependencyGraphBuilder;
pub use dependency_graph::DependencyGraph;
pub use engine::{GraphvizEngine, LayoutEngine};
pub use renderer::{GraphRenderer, NodeShape, Scene, SceneEdge, SceneNode};
pub use types::{Dependency, DependencyEdge, ModuleId, ModuleNode};
