//! Core graph types
//!
//! This module contains the fundamental data structures used in the dependency
//! graph. Nodes hold only module identity and version data; edges live in the
//! graph's arena and are addressed through [`ModuleId`] handles.

use petgraph::graph::NodeIndex;

/// Handle to a module inside one [`DependencyGraph`](super::DependencyGraph).
///
/// Handles are arena-local: an id obtained from one graph must not be used to
/// index another graph, including subgraphs derived from it.
pub type ModuleId = NodeIndex;

/// Represents a Go module in the dependency graph
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleNode {
    name: String,
    version: Option<String>,
    toolchain_version: Option<String>,
    highlighted: bool,
}

impl ModuleNode {
    pub fn new(
        name: impl Into<String>,
        version: Option<String>,
        toolchain_version: Option<String>,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            toolchain_version,
            highlighted: false,
        }
    }

    /// The module path, unique within a graph
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Latest known release tag, `None` if the module has no releases yet
    pub fn version(&self) -> Option<&str> {
        self.version.as_deref()
    }

    /// Version declared by the `go` directive of the manifest
    pub fn toolchain_version(&self) -> Option<&str> {
        self.toolchain_version.as_deref()
    }

    pub fn is_highlighted(&self) -> bool {
        self.highlighted
    }

    pub(crate) fn highlight(mut self) -> Self {
        self.highlighted = true;
        self
    }

    /// Whether requiring `required_version` of this module lags behind its
    /// latest release. Modules without releases are never considered stale.
    pub fn is_stale(&self, required_version: &str) -> bool {
        self.version
            .as_deref()
            .is_some_and(|latest| latest != required_version)
    }
}

/// Stored edge payload: the version the dependent module declares it needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DependencyEdge {
    required_version: String,
}

impl DependencyEdge {
    pub fn new(required_version: impl Into<String>) -> Self {
        Self {
            required_version: required_version.into(),
        }
    }

    pub fn required_version(&self) -> &str {
        &self.required_version
    }
}

/// One dependency relationship as seen from a module
///
/// For [`requires`](super::DependencyGraph::requires) the target is the
/// required module, for [`required_by`](super::DependencyGraph::required_by)
/// it is the dependent module. Both views read the same stored edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Dependency<'g> {
    pub target: ModuleId,
    pub required_version: &'g str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_module_node_accessors() {
        let node = ModuleNode::new(
            "gitlab.example.com/team/api",
            Some("v1.2.0".to_string()),
            Some("1.21".to_string()),
        );

        assert_eq!(node.name(), "gitlab.example.com/team/api");
        assert_eq!(node.version(), Some("v1.2.0"));
        assert_eq!(node.toolchain_version(), Some("1.21"));
        assert!(!node.is_highlighted());
        assert!(node.highlight().is_highlighted());
    }

    #[test]
    fn test_staleness() {
        let released = ModuleNode::new("b", Some("v1.2.0".to_string()), None);
        assert!(released.is_stale("v1.0.0"));
        assert!(!released.is_stale("v1.2.0"));

        let unreleased = ModuleNode::new("c", None, None);
        assert!(!unreleased.is_stale("v0.0.0-20240101000000-abcdef123456"));
    }
}
