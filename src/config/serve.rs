//! Serve command configuration

use std::path::PathBuf;

use crate::common::{ConfigBuilder, required};
use crate::config::SourceConfig;
use crate::error::GomodGraphError;

#[derive(Debug, Clone)]
pub struct ServeConfig {
    pub source: SourceConfig,
    pub graphviz_bin: PathBuf,
    pub home_module: Option<String>,
    pub port: u16,
}

impl ServeConfig {
    pub fn builder() -> ServeConfigBuilder {
        ServeConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct ServeConfigBuilder {
    source: Option<SourceConfig>,
    graphviz_bin: Option<PathBuf>,
    home_module: Option<Option<String>>,
    port: Option<u16>,
}

impl ServeConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_source(mut self, source: SourceConfig) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_graphviz_bin(mut self, graphviz_bin: impl Into<PathBuf>) -> Self {
        self.graphviz_bin = Some(graphviz_bin.into());
        self
    }

    pub fn with_home_module(mut self, home_module: Option<String>) -> Self {
        self.home_module = Some(home_module);
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }
}

impl ConfigBuilder for ServeConfigBuilder {
    type Config = ServeConfig;

    fn build(self) -> Result<Self::Config, GomodGraphError> {
        Ok(ServeConfig {
            source: required(self.source, "source")?,
            graphviz_bin: required(self.graphviz_bin, "graphviz_bin")?,
            home_module: self.home_module.flatten(),
            port: self.port.unwrap_or(crate::constants::server::DEFAULT_PORT),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serve_config() {
        let source = SourceConfig::builder()
            .with_gitlab_base_url("https://gitlab.example.com")
            .with_cache_dir("/tmp/gomodgraph-test")
            .build()
            .unwrap();

        let config = ServeConfig::builder()
            .with_source(source)
            .with_graphviz_bin("/usr/bin/dot")
            .with_home_module(Some("team/api".to_string()))
            .build()
            .unwrap();

        assert_eq!(config.port, 0);
        assert_eq!(config.home_module.as_deref(), Some("team/api"));
    }
}
