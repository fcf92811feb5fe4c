use std::io::Write;

use miette::{Result, WrapErr};

use super::dependency_graph::DependencyGraph;
use super::engine::LayoutEngine;
use crate::cli::ImageFormat;
use crate::constants::render::{NO_TOOLCHAIN_VERSION, NO_VERSION_PLACEHOLDER, colors};
use crate::error::GomodGraphError;

// Helper macro for write operations that converts IO errors
macro_rules! writeln_out {
    ($dst:expr) => {
        writeln!($dst).map_err(GomodGraphError::from)
    };
    ($dst:expr, $($arg:tt)*) => {
        writeln!($dst, $($arg)*).map_err(GomodGraphError::from)
    };
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeShape {
    Box,
    Egg,
}

impl NodeShape {
    fn as_str(self) -> &'static str {
        match self {
            NodeShape::Box => "box",
            NodeShape::Egg => "egg",
        }
    }
}

/// A module as it is handed to the layout engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneNode {
    pub id: String,
    pub label: String,
    pub shape: NodeShape,
    pub color: Option<&'static str>,
    pub fill_color: &'static str,
    /// Drill-down link, absent on the highlighted center module
    pub url: Option<String>,
}

/// A dependency as it is handed to the layout engine
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneEdge {
    pub from: String,
    pub to: String,
    pub label: String,
    pub stale: bool,
    pub color: &'static str,
}

/// Styled, ordered nodes and edges of one graph
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scene {
    pub nodes: Vec<SceneNode>,
    pub edges: Vec<SceneEdge>,
}

/// Turns dependency graphs into Graphviz input and rendered images
#[derive(Debug, Clone)]
pub struct GraphRenderer {
    registry_prefix: String,
}

impl GraphRenderer {
    /// `registry_prefix` is stripped from module paths in labels, e.g.
    /// `gitlab.example.com/`
    pub fn new(registry_prefix: impl Into<String>) -> Self {
        Self {
            registry_prefix: registry_prefix.into(),
        }
    }

    pub fn registry_prefix(&self) -> &str {
        &self.registry_prefix
    }

    /// Compute the styled nodes and edges of `graph`
    ///
    /// Nodes follow the graph's name order and edges are sorted by source,
    /// target and required version, so equal graphs give equal scenes no
    /// matter how they were assembled.
    pub fn scene(&self, graph: &DependencyGraph) -> Scene {
        let mut scene = Scene::default();

        for (_, module) in graph.modules() {
            let version = module.version().unwrap_or(NO_VERSION_PLACEHOLDER);
            let toolchain = module
                .toolchain_version()
                .map(|v| format!("go{v}"))
                .unwrap_or_else(|| NO_TOOLCHAIN_VERSION.to_string());

            let label = format!(
                "{}\n{} ({})",
                self.display_name(module.name()),
                version,
                toolchain
            );

            let node = if module.is_highlighted() {
                SceneNode {
                    id: module.name().to_string(),
                    label,
                    shape: NodeShape::Egg,
                    color: Some(colors::HIGHLIGHT_STROKE),
                    fill_color: colors::HIGHLIGHT_FILL,
                    url: None,
                }
            } else {
                SceneNode {
                    id: module.name().to_string(),
                    label,
                    shape: NodeShape::Box,
                    color: None,
                    fill_color: colors::NODE_FILL,
                    url: Some(format!("/?mod={}", urlencoding::encode(module.name()))),
                }
            };
            scene.nodes.push(node);
        }

        for (id, module) in graph.modules() {
            let mut dependencies = graph.requires(id);
            dependencies.sort_by(|a, b| {
                graph
                    .module(a.target)
                    .name()
                    .cmp(graph.module(b.target).name())
                    .then_with(|| a.required_version.cmp(b.required_version))
            });

            for dependency in dependencies {
                let target = graph.module(dependency.target);
                let stale = target.is_stale(dependency.required_version);

                scene.edges.push(SceneEdge {
                    from: module.name().to_string(),
                    to: target.name().to_string(),
                    label: dependency.required_version.to_string(),
                    stale,
                    color: if stale {
                        colors::STALE_EDGE
                    } else {
                        colors::EDGE
                    },
                });
            }
        }

        scene
    }

    pub fn render_dot(&self, graph: &DependencyGraph, output: &mut dyn Write) -> Result<()> {
        let scene = self.scene(graph);

        writeln_out!(output, "digraph modules {{")?;
        // Edges with the same target and label are merged
        writeln_out!(output, "    concentrate=true;")?;
        writeln_out!(output, "    center=true;")?;
        // Filled nodes make the whole box clickable
        writeln_out!(output, "    node [style=filled];")?;
        writeln_out!(output, "    edge [arrowsize=0.5];")?;
        writeln_out!(output)?;

        for node in &scene.nodes {
            let mut attributes = vec![
                format!("label=\"{}\"", escape_label(&node.label)),
                format!("shape={}", node.shape.as_str()),
            ];
            if let Some(color) = node.color {
                attributes.push(format!("color=\"{color}\""));
            }
            attributes.push(format!("fillcolor=\"{}\"", node.fill_color));
            if let Some(url) = &node.url {
                attributes.push(format!("URL=\"{}\"", escape(url)));
            }

            writeln_out!(
                output,
                "    \"{}\" [{}];",
                escape(&node.id),
                attributes.join(", ")
            )?;
        }

        if !scene.edges.is_empty() {
            writeln_out!(output)?;
        }

        for edge in &scene.edges {
            writeln_out!(
                output,
                r#"    "{}" -> "{}" [label="{}", color="{}", fontcolor="{}"];"#,
                escape(&edge.from),
                escape(&edge.to),
                escape(&edge.label),
                edge.color,
                edge.color
            )?;
        }

        writeln_out!(output, "}}")?;
        Ok(())
    }

    /// Render `graph` in `format`
    ///
    /// DOT output is produced directly, SVG and PNG go through `engine`. The
    /// whole image is buffered before it is returned.
    pub fn render(
        &self,
        graph: &DependencyGraph,
        format: ImageFormat,
        engine: &dyn LayoutEngine,
    ) -> Result<Vec<u8>> {
        let mut dot = Vec::new();
        self.render_dot(graph, &mut dot)
            .wrap_err("Failed to generate Graphviz input")?;

        if format == ImageFormat::Dot {
            return Ok(dot);
        }

        let dot = String::from_utf8(dot).map_err(|e| GomodGraphError::RenderError {
            message: format!("generated Graphviz input is not UTF-8: {e}"),
        })?;

        engine
            .layout(&dot, format)
            .wrap_err_with(|| format!("Failed to render {format} image"))
    }

    fn display_name<'a>(&self, name: &'a str) -> &'a str {
        name.strip_prefix(self.registry_prefix.as_str())
            .unwrap_or(name)
    }
}

fn escape(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

fn escape_label(label: &str) -> String {
    label
        .split('\n')
        .map(escape)
        .collect::<Vec<_>>()
        .join("\\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manifest::{ModuleRecord, Requirement};

    const PREFIX: &str = "gitlab.example.com/";

    fn graph() -> DependencyGraph {
        DependencyGraph::build(&[
            ModuleRecord::new("gitlab.example.com/team/a")
                .with_toolchain_version("1.21")
                .with_requirement(Requirement::new("gitlab.example.com/team/b", "v1.0.0"))
                .with_requirement(Requirement::new("gitlab.example.com/team/c", "v0.3.0")),
            ModuleRecord::new("gitlab.example.com/team/b")
                .with_latest_version("v1.2.0")
                .with_toolchain_version("1.20"),
            ModuleRecord::new("gitlab.example.com/team/c")
                .with_latest_version("v0.3.0")
                .with_toolchain_version("1.22"),
        ])
    }

    #[test]
    fn test_node_labels() {
        let scene = GraphRenderer::new(PREFIX).scene(&graph());

        let labels: Vec<&str> = scene.nodes.iter().map(|n| n.label.as_str()).collect();
        assert_eq!(
            labels,
            vec![
                "team/a\n<no version yet> (go1.21)",
                "team/b\nv1.2.0 (go1.20)",
                "team/c\nv0.3.0 (go1.22)",
            ]
        );
    }

    #[test]
    fn test_missing_toolchain_label() {
        let graph = DependencyGraph::build(&[ModuleRecord::new("x").with_latest_version("v1.0.0")]);
        let scene = GraphRenderer::new(PREFIX).scene(&graph);
        assert_eq!(scene.nodes[0].label, "x\nv1.0.0 (n.a.)");
    }

    #[test]
    fn test_links_on_regular_nodes_only() {
        let full = graph();
        let sub = full.subgraph_from(full.lookup("gitlab.example.com/team/b").unwrap());
        let scene = GraphRenderer::new(PREFIX).scene(&sub);

        let a = &scene.nodes[0];
        assert_eq!(a.shape, NodeShape::Box);
        assert_eq!(
            a.url.as_deref(),
            Some("/?mod=gitlab.example.com%2Fteam%2Fa")
        );

        let b = &scene.nodes[1];
        assert_eq!(b.shape, NodeShape::Egg);
        assert_eq!(b.url, None);
        assert_eq!(b.color, Some(colors::HIGHLIGHT_STROKE));
        assert_eq!(b.fill_color, colors::HIGHLIGHT_FILL);
    }

    #[test]
    fn test_stale_edge_coloring() {
        let scene = GraphRenderer::new(PREFIX).scene(&graph());

        let to_b = scene
            .edges
            .iter()
            .find(|e| e.to == "gitlab.example.com/team/b")
            .unwrap();
        assert!(to_b.stale);
        assert_eq!(to_b.color, colors::STALE_EDGE);
        assert_eq!(to_b.label, "v1.0.0");

        let to_c = scene
            .edges
            .iter()
            .find(|e| e.to == "gitlab.example.com/team/c")
            .unwrap();
        assert!(!to_c.stale);
        assert_eq!(to_c.color, colors::EDGE);
    }

    #[test]
    fn test_edge_to_unreleased_module_is_not_stale() {
        let graph = DependencyGraph::build(&[
            ModuleRecord::new("a").with_requirement(Requirement::new("b", "v0.0.0-20240101-abc")),
            ModuleRecord::new("b"),
        ]);
        let scene = GraphRenderer::new("").scene(&graph);
        assert!(!scene.edges[0].stale);
    }

    #[test]
    fn test_render_dot_output() {
        let mut output = Vec::new();
        GraphRenderer::new(PREFIX)
            .render_dot(&graph(), &mut output)
            .unwrap();
        let dot = String::from_utf8(output).unwrap();

        assert!(dot.starts_with("digraph modules {"));
        assert!(dot.contains("concentrate=true;"));
        assert!(dot.contains(
            r#""gitlab.example.com/team/b" [label="team/b\nv1.2.0 (go1.20)", shape=box, fillcolor="floralwhite", URL="/?mod=gitlab.example.com%2Fteam%2Fb"];"#
        ));
        assert!(dot.contains(
            r#""gitlab.example.com/team/a" -> "gitlab.example.com/team/b" [label="v1.0.0", color="darkorange", fontcolor="darkorange"];"#
        ));
        assert!(dot.trim_end().ends_with('}'));
    }

    #[test]
    fn test_escaping() {
        assert_eq!(escape(r#"a"b\c"#), r#"a\"b\\c"#);
        assert_eq!(escape_label("x\n\"y\""), r#"x\n\"y\""#);
    }
}
