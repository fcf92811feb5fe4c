//! On-disk cache of downloaded `go.mod` manifests
//!
//! Every scanned project is stored as one file named
//! `<sha256 of project path>_<hex of latest version>`. The project hash only
//! keeps names unique, the version is decoded back when the cache is read.

use std::fs;
use std::path::{Path, PathBuf};

use rayon::prelude::*;
use sha2::{Digest, Sha256};
use tracing::{debug, warn};
use walkdir::WalkDir;

use crate::constants::cache::{DEFAULT_DIR, NAME_SEPARATOR};
use crate::error::GomodGraphError;
use crate::manifest::{GoModManifest, ModuleRecord};

/// Whether [`ManifestCache::prepare`] found a cache to reuse
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheState {
    /// The directory was just created and must be populated
    Created,
    Existing,
}

#[derive(Debug, Clone)]
pub struct ManifestCache {
    dir: PathBuf,
}

impl Default for ManifestCache {
    fn default() -> Self {
        Self::new(DEFAULT_DIR)
    }
}

impl ManifestCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Make sure the cache directory exists
    pub fn prepare(&self) -> Result<CacheState, GomodGraphError> {
        if self.dir.is_dir() {
            return Ok(CacheState::Existing);
        }

        let mut builder = fs::DirBuilder::new();
        builder.recursive(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::DirBuilderExt;
            builder.mode(crate::constants::cache::DIR_MODE);
        }
        builder
            .create(&self.dir)
            .map_err(|source| GomodGraphError::CacheUnreadable {
                path: self.dir.clone(),
                source,
            })?;

        debug!(dir = %self.dir.display(), "created manifest cache");
        Ok(CacheState::Created)
    }

    /// Remove the cache directory and everything in it
    pub fn clear(&self) -> Result<(), GomodGraphError> {
        match fs::remove_dir_all(&self.dir) {
            Ok(()) => {
                debug!(dir = %self.dir.display(), "cleared manifest cache");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(GomodGraphError::CacheUnreadable {
                path: self.dir.clone(),
                source,
            }),
        }
    }

    /// Store the manifest of `project`, replacing an earlier one
    pub fn store(
        &self,
        project: &str,
        version: Option<&str>,
        manifest: &[u8],
    ) -> Result<PathBuf, GomodGraphError> {
        let path = self.dir.join(entry_name(project, version));

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(crate::constants::cache::FILE_MODE);
        }

        let mut file = options.open(&path)?;
        std::io::Write::write_all(&mut file, manifest)?;
        Ok(path)
    }

    /// Parse every cached manifest, in file name order
    ///
    /// An unreadable directory or a file that was not written by this cache
    /// fails the whole read. A single manifest that cannot be read or parsed
    /// is logged and left out.
    pub fn read_records(&self) -> Result<Vec<ModuleRecord>, GomodGraphError> {
        let mut entries = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().map(Path::to_path_buf).unwrap_or_else(|| self.dir.clone());
                GomodGraphError::CacheUnreadable {
                    path,
                    source: e.into(),
                }
            })?;

            if !entry.file_type().is_file() {
                continue;
            }

            let file_name = entry.file_name().to_string_lossy().into_owned();
            let version = decode_entry_name(&file_name)?;
            entries.push((entry.into_path(), file_name, version));
        }

        let records = entries
            .into_par_iter()
            .filter_map(|(path, file_name, version)| {
                let content = match fs::read(&path) {
                    Ok(content) => content,
                    Err(e) => {
                        warn!(file = %path.display(), error = %e, "cannot read cached manifest, skipping it");
                        return None;
                    }
                };

                let content = String::from_utf8_lossy(&content);
                match GoModManifest::parse(&file_name, &content) {
                    Ok(manifest) => Some(manifest.into_record(version, file_name)),
                    Err(e) => {
                        warn!(file = %path.display(), error = %e, "cannot parse cached manifest, skipping it");
                        None
                    }
                }
            })
            .collect();

        Ok(records)
    }
}

/// File name for the manifest of `project` at `version`
pub fn entry_name(project: &str, version: Option<&str>) -> String {
    let mut hasher = Sha256::new();
    hasher.update(project.as_bytes());
    format!(
        "{:x}{}{}",
        hasher.finalize(),
        NAME_SEPARATOR,
        encode_version(version.unwrap_or_default())
    )
}

/// Recover the version from a cache file name
///
/// A project without any tag was stored with an empty version, which comes
/// back as `None`.
pub fn decode_entry_name(file_name: &str) -> Result<Option<String>, GomodGraphError> {
    let invalid = |reason: &str| GomodGraphError::InvalidCacheEntry {
        file_name: file_name.to_string(),
        reason: reason.to_string(),
    };

    let (_, encoded) = file_name
        .split_once(NAME_SEPARATOR)
        .ok_or_else(|| invalid("missing version separator"))?;

    let bytes = decode_version(encoded).ok_or_else(|| invalid("version is not hex encoded"))?;
    let version = String::from_utf8(bytes).map_err(|_| invalid("version is not UTF-8"))?;

    Ok(Some(version).filter(|v| !v.is_empty()))
}

fn encode_version(version: &str) -> String {
    version.bytes().map(|b| format!("{b:02x}")).collect()
}

fn decode_version(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 || !s.is_ascii() {
        return None;
    }

    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(&s[i..i + 2], 16).ok())
        .collect()
}
