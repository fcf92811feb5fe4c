//! # Manifest Module
//!
//! Parsed `go.mod` data in the shape the graph builder consumes.
//!
//! - **GoModManifest**: the directives of one `go.mod` file that matter for
//!   the dependency graph
//! - **ModuleRecord**: a manifest combined with the project's latest release
//!   tag and the cache file it came from
//! - **Requirement**: one `require` entry

mod parser;

pub use parser::GoModManifest;

/// One `require` entry of a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Requirement {
    pub path: String,
    pub version: String,
    /// Marked `// indirect`, i.e. pulled in transitively
    pub indirect: bool,
}

impl Requirement {
    pub fn new(path: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            version: version.into(),
            indirect: false,
        }
    }

    pub fn indirect(mut self) -> Self {
        self.indirect = true;
        self
    }
}

/// Everything known about one scanned project
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModuleRecord {
    /// Declared module path, `None` if the manifest lacks a `module` directive
    pub name: Option<String>,
    pub toolchain_version: Option<String>,
    pub latest_version: Option<String>,
    pub requirements: Vec<Requirement>,
    /// Where the manifest came from, used when reporting skipped records
    pub origin: String,
}

impl ModuleRecord {
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            origin: name.clone(),
            name: Some(name),
            toolchain_version: None,
            latest_version: None,
            requirements: Vec::new(),
        }
    }

    pub fn with_toolchain_version(mut self, version: impl Into<String>) -> Self {
        self.toolchain_version = Some(version.into());
        self
    }

    pub fn with_latest_version(mut self, version: impl Into<String>) -> Self {
        self.latest_version = Some(version.into());
        self
    }

    pub fn with_requirement(mut self, requirement: Requirement) -> Self {
        self.requirements.push(requirement);
        self
    }

    pub fn with_origin(mut self, origin: impl Into<String>) -> Self {
        self.origin = origin.into();
        self
    }
}
