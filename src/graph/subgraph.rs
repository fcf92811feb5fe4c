use super::dependency_graph::{DependencyGraph, ModuleArena};
use super::types::ModuleId;

impl DependencyGraph {
    /// Derive the neighborhood of `center`: the module itself, its direct
    /// dependencies and its direct dependents
    ///
    /// The result is a fresh graph built from copies, `self` is left
    /// untouched. The center copy is highlighted. Dependencies keep no edges
    /// of their own and dependents keep only their edge to the center, so
    /// nothing beyond the first ring appears.
    ///
    /// # Panics
    ///
    /// Panics if `self` is already a subgraph. Its pruned edges would yield a
    /// wrong neighborhood, so this is treated as a caller bug.
    pub fn subgraph_from(&self, center: ModuleId) -> DependencyGraph {
        assert!(
            !self.is_subgraph(),
            "deriving a subgraph from a subgraph is not supported, derive it from the full graph"
        );

        let mut arena = ModuleArena::default();
        let center_copy = arena.upsert(self.module(center).clone().highlight());

        for dependency in self.requires(center) {
            let target = if dependency.target == center {
                center_copy
            } else {
                arena.get_or_insert(self.module(dependency.target).clone())
            };
            arena.add_dependency(center_copy, target, dependency.required_version);
        }

        for dependent in self.required_by(center) {
            // A self-requirement was already copied with the dependencies
            if dependent.target == center {
                continue;
            }
            let source = arena.get_or_insert(self.module(dependent.target).clone());
            arena.add_dependency(source, center_copy, dependent.required_version);
        }

        arena.into_graph(true)
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use crate::graph::DependencyGraph;
    use crate::manifest::{ModuleRecord, Requirement};

    /// a -> b -> c -> d, plus e -> c and c -> f
    fn chain() -> DependencyGraph {
        DependencyGraph::build(&[
            ModuleRecord::new("a").with_requirement(Requirement::new("b", "v1.0.0")),
            ModuleRecord::new("b")
                .with_latest_version("v1.1.0")
                .with_requirement(Requirement::new("c", "v0.5.0")),
            ModuleRecord::new("c")
                .with_latest_version("v0.5.0")
                .with_requirement(Requirement::new("d", "v2.0.0"))
                .with_requirement(Requirement::new("f", "v0.1.0")),
            ModuleRecord::new("d").with_latest_version("v2.0.0"),
            ModuleRecord::new("e").with_requirement(Requirement::new("c", "v0.4.0")),
            ModuleRecord::new("f"),
        ])
    }

    fn names(graph: &DependencyGraph) -> BTreeSet<&str> {
        graph.modules().map(|(_, m)| m.name()).collect()
    }

    #[test]
    fn test_subgraph_contains_direct_neighborhood_only() {
        let graph = chain();
        let sub = graph.subgraph_from(graph.lookup("c").unwrap());

        assert!(sub.is_subgraph());
        assert_eq!(names(&sub), BTreeSet::from(["b", "c", "d", "e", "f"]));
        assert_eq!(sub.lookup("a"), None);
    }

    #[test]
    fn test_center_is_highlighted_and_keeps_its_edges() {
        let graph = chain();
        let sub = graph.subgraph_from(graph.lookup("c").unwrap());

        let c = sub.lookup("c").unwrap();
        assert!(sub.module(c).is_highlighted());

        let required: Vec<(&str, &str)> = sub
            .requires(c)
            .iter()
            .map(|d| (sub.module(d.target).name(), d.required_version))
            .collect();
        assert_eq!(required, vec![("d", "v2.0.0"), ("f", "v0.1.0")]);

        for (id, module) in sub.modules() {
            if id != c {
                assert!(!module.is_highlighted());
            }
        }
    }

    #[test]
    fn test_dependencies_are_pruned() {
        let graph = chain();
        let sub = graph.subgraph_from(graph.lookup("b").unwrap());

        // c is a dependency of b; its own dependencies d and f must not appear
        let c = sub.lookup("c").unwrap();
        assert!(sub.requires(c).is_empty());
        assert_eq!(names(&sub), BTreeSet::from(["a", "b", "c"]));
    }

    #[test]
    fn test_dependents_keep_only_edge_to_center() {
        let graph = DependencyGraph::build(&[
            ModuleRecord::new("a")
                .with_requirement(Requirement::new("b", "v1.0.0"))
                .with_requirement(Requirement::new("x", "v0.1.0")),
            ModuleRecord::new("b"),
            ModuleRecord::new("x"),
        ]);
        let sub = graph.subgraph_from(graph.lookup("b").unwrap());

        let a = sub.lookup("a").unwrap();
        let b = sub.lookup("b").unwrap();
        let edges = sub.requires(a);
        assert_eq!(edges.len(), 1);
        assert_eq!(edges[0].target, b);
        assert_eq!(edges[0].required_version, "v1.0.0");
        assert_eq!(sub.lookup("x"), None);
    }

    #[test]
    fn test_edge_targets_resolve_within_subgraph() {
        let graph = chain();
        let sub = graph.subgraph_from(graph.lookup("c").unwrap());

        for (id, _) in sub.modules() {
            for dep in sub.requires(id).into_iter().chain(sub.required_by(id)) {
                let target = sub.get(dep.target).expect("edge target inside subgraph");
                assert_eq!(sub.lookup(target.name()), Some(dep.target));
            }
        }
    }

    #[test]
    fn test_source_graph_is_not_mutated() {
        let graph = chain();
        let before = graph.clone();
        let c = graph.lookup("c").unwrap();

        let first = graph.subgraph_from(c);
        let second = graph.subgraph_from(c);

        assert_eq!(first, second);
        assert_eq!(graph, before);
        assert!(!graph.module(c).is_highlighted());
        assert_eq!(graph.requires(graph.lookup("d").unwrap()).len(), 0);
        assert_eq!(graph.required_by(c).len(), 2);
    }

    #[test]
    #[should_panic(expected = "deriving a subgraph from a subgraph")]
    fn test_subgraph_of_subgraph_panics() {
        let graph = chain();
        let sub = graph.subgraph_from(graph.lookup("c").unwrap());
        let center = sub.lookup("c").unwrap();

        let _ = sub.subgraph_from(center);
    }

    #[test]
    fn test_module_both_dependency_and_dependent() {
        let graph = DependencyGraph::build(&[
            ModuleRecord::new("a").with_requirement(Requirement::new("b", "v1.0.0")),
            ModuleRecord::new("b").with_requirement(Requirement::new("a", "v0.9.0")),
        ]);
        let sub = graph.subgraph_from(graph.lookup("a").unwrap());

        let a = sub.lookup("a").unwrap();
        let b = sub.lookup("b").unwrap();
        assert_eq!(sub.module_count(), 2);
        assert_eq!(sub.requires(a)[0].target, b);
        assert_eq!(sub.requires(b)[0].target, a);
        assert_eq!(sub.requires(b)[0].required_version, "v0.9.0");
    }

    #[test]
    fn test_self_requirement_stays_on_center() {
        let graph = DependencyGraph::build(&[
            ModuleRecord::new("a").with_requirement(Requirement::new("a", "v0.1.0")),
        ]);
        let sub = graph.subgraph_from(graph.lookup("a").unwrap());

        let a = sub.lookup("a").unwrap();
        assert_eq!(sub.module_count(), 1);
        assert_eq!(sub.dependency_count(), 1);
        assert_eq!(sub.requires(a)[0].target, a);
    }
}
