use std::collections::HashMap;

use petgraph::Direction;
use petgraph::graph::DiGraph;
use petgraph::visit::EdgeRef;

use super::types::{Dependency, DependencyEdge, ModuleId, ModuleNode};

/// Mutable arena used while a graph is being assembled
///
/// Both the builder and subgraph extraction fill an arena and then freeze it
/// into a [`DependencyGraph`]; nothing can modify a graph afterwards.
#[derive(Debug, Default)]
pub(crate) struct ModuleArena {
    graph: DiGraph<ModuleNode, DependencyEdge>,
    index: HashMap<String, ModuleId>,
}

impl ModuleArena {
    /// Insert a module, overwriting the data of an existing module with the
    /// same name while keeping its id and edges
    pub(crate) fn upsert(&mut self, node: ModuleNode) -> ModuleId {
        if let Some(&id) = self.index.get(node.name()) {
            self.graph[id] = node;
            return id;
        }

        let name = node.name().to_string();
        let id = self.graph.add_node(node);
        self.index.insert(name, id);
        id
    }

    /// Insert a module unless one with the same name is already present
    pub(crate) fn get_or_insert(&mut self, node: ModuleNode) -> ModuleId {
        match self.index.get(node.name()) {
            Some(&id) => id,
            None => self.upsert(node),
        }
    }

    pub(crate) fn get(&self, name: &str) -> Option<ModuleId> {
        self.index.get(name).copied()
    }

    /// Record that `from` requires `to` at `required_version`
    ///
    /// This is the only way edges enter a graph. The single stored edge backs
    /// both `requires(from)` and `required_by(to)`.
    pub(crate) fn add_dependency(
        &mut self,
        from: ModuleId,
        to: ModuleId,
        required_version: impl Into<String>,
    ) {
        self.graph
            .add_edge(from, to, DependencyEdge::new(required_version));
    }

    pub(crate) fn into_graph(self, is_subgraph: bool) -> DependencyGraph {
        let mut order: Vec<ModuleId> = self.graph.node_indices().collect();
        order.sort_by(|&a, &b| self.graph[a].name().cmp(self.graph[b].name()));

        DependencyGraph {
            graph: self.graph,
            index: self.index,
            order,
            is_subgraph,
        }
    }
}

/// Dependency graph of the scanned Go modules
///
/// The name index answers lookups, the name-sorted `order` drives every
/// observable iteration so output never depends on hash map ordering.
#[derive(Debug, Clone)]
pub struct DependencyGraph {
    graph: DiGraph<ModuleNode, DependencyEdge>,
    index: HashMap<String, ModuleId>,
    order: Vec<ModuleId>,
    // Subgraphs have pruned edges, deriving another subgraph from one would
    // silently produce a wrong neighborhood.
    is_subgraph: bool,
}

impl DependencyGraph {
    /// Find a module by its full module path
    pub fn lookup(&self, name: &str) -> Option<ModuleId> {
        self.index.get(name).copied()
    }

    /// Find a module by its full path, or by its path below `registry_prefix`
    ///
    /// `resolve("team/api", "gitlab.example.com/")` finds
    /// `gitlab.example.com/team/api`. Collisions are unlikely since all
    /// scanned modules come from the same registry.
    pub fn resolve(&self, name: &str, registry_prefix: &str) -> Option<ModuleId> {
        self.lookup(name).or_else(|| {
            let prefix = registry_prefix.trim_end_matches('/');
            if prefix.is_empty() {
                return None;
            }
            self.lookup(&format!("{}/{}", prefix, name.trim_start_matches('/')))
        })
    }

    /// Access a module by id
    ///
    /// # Panics
    ///
    /// Panics if `id` does not belong to this graph.
    pub fn module(&self, id: ModuleId) -> &ModuleNode {
        &self.graph[id]
    }

    pub fn get(&self, id: ModuleId) -> Option<&ModuleNode> {
        self.graph.node_weight(id)
    }

    /// All modules, sorted by name
    pub fn modules(&self) -> impl Iterator<Item = (ModuleId, &ModuleNode)> + '_ {
        self.order.iter().map(|&id| (id, &self.graph[id]))
    }

    /// Direct dependencies of `id` in declaration order
    pub fn requires(&self, id: ModuleId) -> Vec<Dependency<'_>> {
        self.neighbors(id, Direction::Outgoing)
    }

    /// Modules directly requiring `id` in insertion order
    pub fn required_by(&self, id: ModuleId) -> Vec<Dependency<'_>> {
        self.neighbors(id, Direction::Incoming)
    }

    fn neighbors(&self, id: ModuleId, direction: Direction) -> Vec<Dependency<'_>> {
        let mut edges: Vec<_> = self.graph.edges_directed(id, direction).collect();
        edges.sort_by_key(|edge| edge.id());

        edges
            .into_iter()
            .map(|edge| Dependency {
                target: if edge.source() == id {
                    edge.target()
                } else {
                    edge.source()
                },
                required_version: edge.weight().required_version(),
            })
            .collect()
    }

    pub fn module_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn dependency_count(&self) -> usize {
        self.graph.edge_count()
    }

    pub fn is_empty(&self) -> bool {
        self.graph.node_count() == 0
    }

    pub fn is_subgraph(&self) -> bool {
        self.is_subgraph
    }

    /// Outgoing edges of `id` as (target name, required version) pairs
    fn edge_signature(&self, id: ModuleId) -> Vec<(&str, &str)> {
        self.requires(id)
            .into_iter()
            .map(|dep| (self.graph[dep.target].name(), dep.required_version))
            .collect()
    }
}

impl PartialEq for DependencyGraph {
    fn eq(&self, other: &Self) -> bool {
        self.is_subgraph == other.is_subgraph
            && self.order.len() == other.order.len()
            && self
                .modules()
                .zip(other.modules())
                .all(|((a_id, a), (b_id, b))| {
                    a == b && self.edge_signature(a_id) == other.edge_signature(b_id)
                })
    }
}

impl Eq for DependencyGraph {}

#[cfg(test)]
mod tests {
    use super::*;

    fn node(name: &str, version: Option<&str>) -> ModuleNode {
        ModuleNode::new(name, version.map(str::to_string), Some("1.21".to_string()))
    }

    #[test]
    fn test_add_dependency_is_mirrored() {
        let mut arena = ModuleArena::default();
        let a = arena.upsert(node("a", Some("v1.0.0")));
        let b = arena.upsert(node("b", Some("v1.2.0")));
        arena.add_dependency(a, b, "v1.0.0");
        let graph = arena.into_graph(false);

        assert_eq!(
            graph.requires(a),
            vec![Dependency {
                target: b,
                required_version: "v1.0.0"
            }]
        );
        assert_eq!(
            graph.required_by(b),
            vec![Dependency {
                target: a,
                required_version: "v1.0.0"
            }]
        );
        assert!(graph.requires(b).is_empty());
        assert!(graph.required_by(a).is_empty());
    }

    #[test]
    fn test_upsert_overwrites_without_duplicating() {
        let mut arena = ModuleArena::default();
        let first = arena.upsert(node("a", Some("v1.0.0")));
        let second = arena.upsert(node("a", Some("v2.0.0")));
        let graph = arena.into_graph(false);

        assert_eq!(first, second);
        assert_eq!(graph.module_count(), 1);
        assert_eq!(graph.module(first).version(), Some("v2.0.0"));
    }

    #[test]
    fn test_modules_are_sorted_by_name() {
        let mut arena = ModuleArena::default();
        for name in ["zeta", "alpha", "mid"] {
            arena.upsert(node(name, None));
        }
        let graph = arena.into_graph(false);

        let names: Vec<&str> = graph.modules().map(|(_, m)| m.name()).collect();
        assert_eq!(names, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn test_requires_keeps_insertion_order() {
        let mut arena = ModuleArena::default();
        let a = arena.upsert(node("a", None));
        let c = arena.upsert(node("c", None));
        let b = arena.upsert(node("b", None));
        arena.add_dependency(a, c, "v0.3.0");
        arena.add_dependency(a, b, "v0.2.0");
        let graph = arena.into_graph(false);

        let targets: Vec<ModuleId> = graph.requires(a).iter().map(|d| d.target).collect();
        assert_eq!(targets, vec![c, b]);
    }

    #[test]
    fn test_resolve_with_registry_prefix() {
        let mut arena = ModuleArena::default();
        let api = arena.upsert(node("gitlab.example.com/team/api", None));
        let graph = arena.into_graph(false);

        assert_eq!(graph.resolve("gitlab.example.com/team/api", ""), Some(api));
        assert_eq!(graph.resolve("team/api", "gitlab.example.com/"), Some(api));
        assert_eq!(graph.resolve("team/api", ""), None);
        assert_eq!(graph.resolve("team/other", "gitlab.example.com/"), None);
    }

    #[test]
    fn test_value_equality_ignores_insertion_order() {
        let mut first = ModuleArena::default();
        let a = first.upsert(node("a", None));
        let b = first.upsert(node("b", Some("v1.0.0")));
        first.add_dependency(a, b, "v1.0.0");

        let mut second = ModuleArena::default();
        let b2 = second.upsert(node("b", Some("v1.0.0")));
        let a2 = second.upsert(node("a", None));
        second.add_dependency(a2, b2, "v1.0.0");

        assert_eq!(first.into_graph(false), second.into_graph(false));
    }
}
