//! Configuration constants for gomodgraph
//!
//! Defaults for everything the CLI lets users override, plus the fixed parts
//! of the GitLab API and the rendered graph.

use std::time::Duration;

/// GitLab API access
pub mod gitlab {
    use super::*;

    /// Path segment appended to the base URL when it is missing
    pub const API_PATH: &str = "api/v4";

    /// Page size for the project listing, the maximum GitLab allows
    pub const PROJECTS_PER_PAGE: usize = 100;

    /// Number of projects whose manifests are downloaded concurrently
    pub const DOWNLOAD_WORKERS: usize = 10;

    /// Per-request timeout
    pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

    /// Ref used for projects without a default branch
    pub const FALLBACK_REF: &str = "HEAD";

    pub const MANIFEST_FILE: &str = "go.mod";

    /// Header names are lowercase, as `http` requires for static names
    pub const TOKEN_HEADER: &str = "private-token";

    pub const NEXT_PAGE_HEADER: &str = "x-next-page";
}

/// Manifest cache
pub mod cache {
    pub const DEFAULT_DIR: &str = "/tmp/gomodgraph/";

    /// Separates the project hash from the encoded version in file names
    pub const NAME_SEPARATOR: char = '_';

    #[cfg(unix)]
    pub const DIR_MODE: u32 = 0o700;

    #[cfg(unix)]
    pub const FILE_MODE: u32 = 0o600;
}

/// Graph rendering
pub mod render {
    /// Version shown for modules without any release tag
    pub const NO_VERSION_PLACEHOLDER: &str = "<no version yet>";

    /// Toolchain shown for manifests without a `go` directive
    pub const NO_TOOLCHAIN_VERSION: &str = "n.a.";

    pub const DEFAULT_GRAPHVIZ_BIN: &str = "dot";

    /// Graphviz color names
    pub mod colors {
        pub const HIGHLIGHT_STROKE: &str = "crimson";
        pub const HIGHLIGHT_FILL: &str = "goldenrod1";
        pub const NODE_FILL: &str = "floralwhite";
        pub const STALE_EDGE: &str = "darkorange";
        pub const EDGE: &str = "dimgrey";
    }
}

/// HTTP front end
pub mod server {
    /// Port 0 lets the OS pick a free port
    pub const DEFAULT_PORT: u16 = 0;

    pub const SVG_CONTENT_TYPE: &str = "image/svg+xml";
    pub const PNG_CONTENT_TYPE: &str = "image/png";
}

/// Progress bar configuration
pub mod progress {
    use super::*;

    /// Duration between progress bar updates
    pub const TICK_INTERVAL: Duration = Duration::from_millis(100);

    pub const SPINNER_FRAMES: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
}

/// Output formatting configuration
pub mod output {
    /// Default image format when not specified
    pub const DEFAULT_FORMAT: &str = "svg";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_constants() {
        assert_eq!(progress::TICK_INTERVAL, Duration::from_millis(100));
        assert_eq!(progress::SPINNER_FRAMES.len(), 10);
    }

    #[test]
    fn test_gitlab_constants() {
        assert_eq!(gitlab::DOWNLOAD_WORKERS, 10);
        assert!(gitlab::PROJECTS_PER_PAGE <= 100);
    }

    #[test]
    fn test_output_constants() {
        assert_eq!(output::DEFAULT_FORMAT, "svg");
    }
}
