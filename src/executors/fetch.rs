//! Fetch command executor

use console::style;
use miette::{Result, WrapErr};

use super::populate_cache;
use crate::cache::ManifestCache;
use crate::config::FetchConfig;
use crate::executors::CommandExecutor;
use crate::progress::ProgressReporter;

pub struct FetchExecutor;

impl CommandExecutor for FetchExecutor {
    type Config = FetchConfig;

    fn execute(config: Self::Config) -> Result<()> {
        let source = &config.source;
        let cache = ManifestCache::new(&source.cache_dir);

        // Cache file names carry the version, so stale entries of re-tagged
        // projects would survive an incremental download
        cache.clear().wrap_err("Failed to clear manifest cache")?;
        cache
            .prepare()
            .wrap_err("Failed to create manifest cache")?;

        let mut progress = ProgressReporter::new();
        populate_cache(source, &cache, &mut progress)?;

        eprintln!(
            "{} Manifests cached in {}",
            style("✓").green(),
            style(cache.dir().display()).bold()
        );

        Ok(())
    }
}
