use std::path::PathBuf;

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
#[error("Invalid go.mod syntax in '{file}': {message}")]
#[diagnostic(
    code(gomodgraph::manifest_parse_error),
    help("Check the go.mod syntax near the highlighted line")
)]
pub struct ManifestParseError {
    pub file: String,
    pub message: String,
    #[source_code]
    pub source_code: NamedSource<String>,
    #[label("here")]
    pub span: Option<SourceSpan>,
}

#[derive(Error, Debug, Diagnostic)]
pub enum GomodGraphError {
    #[error("Failed to read manifest cache at '{path}'")]
    #[diagnostic(
        code(gomodgraph::cache_unreadable),
        help("Check the cache directory permissions or run again with --refresh")
    )]
    CacheUnreadable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Unexpected file '{file_name}' in manifest cache: {reason}")]
    #[diagnostic(
        code(gomodgraph::invalid_cache_entry),
        help("The cache directory contains foreign files; point --cache-dir elsewhere or use --refresh")
    )]
    InvalidCacheEntry { file_name: String, reason: String },

    #[error("HTTP request failed")]
    #[diagnostic(
        code(gomodgraph::http_error),
        help("Check the GitLab base URL and your network connection")
    )]
    Http(#[from] reqwest::Error),

    #[error("GitLab API responded with status {status} for '{url}'")]
    #[diagnostic(
        code(gomodgraph::gitlab_api_error),
        help("Check that the API token is valid and has the read_api scope")
    )]
    GitLabApi { url: String, status: u16 },

    #[error("JSON deserialization error")]
    #[diagnostic(
        code(gomodgraph::json_error),
        help("The GitLab API returned an unexpected payload")
    )]
    Json(#[from] serde_json::Error),

    #[error("IO error")]
    #[diagnostic(
        code(gomodgraph::io_error),
        help("Check file permissions and disk space")
    )]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    #[diagnostic(
        code(gomodgraph::config_error),
        help("Check your command arguments and environment variables")
    )]
    ConfigurationError { message: String },

    #[error("'{name}' is not a known module")]
    #[diagnostic(
        code(gomodgraph::unknown_module),
        help("Use the full module path or the path below the GitLab host")
    )]
    UnknownModule { name: String },

    #[error("Graphviz program '{program}' could not be started")]
    #[diagnostic(
        code(gomodgraph::layout_engine_unavailable),
        help("Install Graphviz or point --graphviz-bin at the `dot` executable")
    )]
    LayoutEngineUnavailable {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Render error: {message}")]
    #[diagnostic(
        code(gomodgraph::render_error),
        help("Render the graph with --format dot to inspect the generated input")
    )]
    RenderError { message: String },
}
