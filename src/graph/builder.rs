use tracing::{debug, warn};

use super::dependency_graph::{DependencyGraph, ModuleArena};
use super::types::ModuleNode;
use crate::manifest::ModuleRecord;
use crate::progress::ProgressReporter;

/// Builder for constructing the module dependency graph
///
/// Construction takes two passes over the records: the first creates a node
/// for every record declaring a module, the second connects them. Only
/// direct requirements between scanned modules become edges.
#[derive(Debug, Default)]
pub struct DependencyGraphBuilder {
    arena: ModuleArena,
    skipped_records: usize,
}

impl DependencyGraphBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add the modules and requirements described by `records`
    ///
    /// Bad records never fail the build: a record without a module directive
    /// is logged and left out, requirements pointing outside the scanned set
    /// are dropped.
    pub fn build_module_graph(
        &mut self,
        records: &[ModuleRecord],
        progress: Option<&ProgressReporter>,
    ) {
        // First, create nodes for all declared modules
        for record in records {
            let Some(name) = record.name.as_deref() else {
                warn!(origin = %record.origin, "manifest has no module directive, skipping it");
                self.skipped_records += 1;
                continue;
            };

            if self.arena.get(name).is_some() {
                warn!(
                    module = name,
                    origin = %record.origin,
                    "module declared by more than one manifest, the later one wins"
                );
            }

            self.arena.upsert(ModuleNode::new(
                name,
                record.latest_version.clone(),
                record.toolchain_version.clone(),
            ));
        }

        // Then, connect them
        for record in records {
            let Some(name) = record.name.as_deref() else {
                continue;
            };

            if let Some(p) = progress {
                p.analyzing_module(name);
            }

            let Some(from) = self.arena.get(name) else {
                continue;
            };

            for requirement in record.requirements.iter().filter(|r| !r.indirect) {
                match self.arena.get(&requirement.path) {
                    Some(to) => self.arena.add_dependency(from, to, requirement.version.as_str()),
                    None => debug!(
                        module = name,
                        requirement = %requirement.path,
                        "requirement outside the scanned modules, ignoring it"
                    ),
                }
            }
        }
    }

    /// Number of records left out because they declare no module
    pub fn skipped_records(&self) -> usize {
        self.skipped_records
    }

    pub fn finish(self) -> DependencyGraph {
        self.arena.into_graph(false)
    }
}

impl DependencyGraph {
    /// Build the full dependency graph from parsed manifests
    pub fn build(records: &[ModuleRecord]) -> Self {
        let mut builder = DependencyGraphBuilder::new();
        builder.build_module_graph(records, None);
        builder.finish()
    }
}
