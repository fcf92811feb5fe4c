//! # Configuration Module
//!
//! Configuration structures for all gomodgraph commands. Each command has its
//! own config module with a builder; the GitLab and cache settings every
//! command needs live in [`SourceConfig`].
//!
//! ## Command Configurations
//!
//! - **FetchConfig**: Configuration for the `fetch` command filling the cache
//! - **RenderConfig**: Configuration for the `render` command writing one
//!   image
//! - **ServeConfig**: Configuration for the `serve` command starting the HTTP
//!   front end
//!
//! ## Example
//!
//! ```
//! use gomodgraph::cli::ImageFormat;
//! use gomodgraph::common::ConfigBuilder;
//! use gomodgraph::config::{RenderConfig, SourceConfig};
//!
//! let source = SourceConfig::builder()
//!     .with_gitlab_base_url("https://gitlab.example.com")
//!     .with_cache_dir("/tmp/gomodgraph/")
//!     .build()
//!     .unwrap();
//! assert_eq!(source.registry_prefix, "gitlab.example.com/");
//!
//! let config = RenderConfig::builder()
//!     .with_source(source)
//!     .with_graphviz_bin("dot")
//!     .with_module(Some("team/api".to_string()))
//!     .with_format(ImageFormat::Svg)
//!     .build()
//!     .unwrap();
//! assert_eq!(config.module.as_deref(), Some("team/api"));
//! ```

pub mod fetch;
pub mod render;
pub mod serve;
pub mod source;

pub use fetch::FetchConfig;
pub use render::RenderConfig;
pub use serve::ServeConfig;
pub use source::SourceConfig;
