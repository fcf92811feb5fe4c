//! Command executors that handle the actual logic for each command

pub mod fetch;
pub mod render;
pub mod serve;

use console::style;
use miette::{Result, WrapErr};
use tracing::{info, warn};

use crate::cache::{CacheState, ManifestCache};
use crate::config::SourceConfig;
use crate::gitlab::{self, GitLabClient};
use crate::graph::{DependencyGraph, DependencyGraphBuilder};
use crate::progress::ProgressReporter;
use crate::utils::string::pluralize;

/// Trait for command executors
pub trait CommandExecutor {
    type Config;

    /// Execute the command with the given configuration
    fn execute(config: Self::Config) -> Result<()>;
}

/// Download every manifest from GitLab into `cache`
fn download_manifests(
    source: &SourceConfig,
    cache: &ManifestCache,
    progress: &mut ProgressReporter,
) -> Result<()> {
    let client = GitLabClient::new(&source.gitlab_base_url, source.require_token()?)
        .wrap_err("Failed to initialize GitLab client")?;

    gitlab::download(&client, cache, Some(progress)).wrap_err("Could not download mod files")?;
    Ok(())
}

/// Fill a freshly created `cache`, removing it again if the download fails
///
/// A half-filled cache would be reused as complete by the next run.
fn populate_cache(
    source: &SourceConfig,
    cache: &ManifestCache,
    progress: &mut ProgressReporter,
) -> Result<()> {
    download_manifests(source, cache, progress).inspect_err(|_| {
        if let Err(e) = cache.clear() {
            warn!(error = %e, "Failed to remove incomplete manifest cache");
        }
    })
}

/// Open the manifest cache, filling it first if it is new or a refresh was
/// requested
fn ensure_cache(source: &SourceConfig, progress: &mut ProgressReporter) -> Result<ManifestCache> {
    let cache = ManifestCache::new(&source.cache_dir);

    if source.refresh {
        cache.clear().wrap_err("Failed to clear manifest cache")?;
    }

    let state = cache.prepare().wrap_err_with(|| {
        format!(
            "Directory for downloaded mod files ('{}') does not exist and cannot be created",
            cache.dir().display()
        )
    })?;

    if state == CacheState::Created {
        info!(
            "Cache at '{}' is empty, will scan for projects and download mod files",
            cache.dir().display()
        );
        populate_cache(source, &cache, progress)?;
    }

    Ok(cache)
}

/// Build the full dependency graph from the manifest cache
fn load_graph(source: &SourceConfig, progress: &mut ProgressReporter) -> Result<DependencyGraph> {
    let cache = ensure_cache(source, progress)?;
    let records = cache.read_records().wrap_err("Could not read mod files")?;

    progress.start_graph_building(records.len());
    let mut builder = DependencyGraphBuilder::new();
    builder.build_module_graph(&records, Some(&*progress));
    let skipped = builder.skipped_records();
    let graph = builder.finish();
    progress.finish_graph_building(graph.module_count(), graph.dependency_count());

    if skipped > 0 {
        warn!(
            "{} cached {} without a module directive",
            skipped,
            pluralize("manifest", skipped)
        );
    }

    if graph.is_empty() {
        eprintln!(
            "{} No modules found in '{}'",
            style("ℹ").blue(),
            cache.dir().display()
        );
    }

    Ok(graph)
}
