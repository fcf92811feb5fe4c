//! Render command configuration

use std::path::PathBuf;

use crate::cli::ImageFormat;
use crate::common::{ConfigBuilder, required};
use crate::config::SourceConfig;
use crate::error::GomodGraphError;

#[derive(Debug, Clone)]
pub struct RenderConfig {
    pub source: SourceConfig,
    pub graphviz_bin: PathBuf,
    /// Center module, the overview graph is rendered without one
    pub module: Option<String>,
    pub format: ImageFormat,
    pub output: Option<PathBuf>,
}

impl RenderConfig {
    pub fn builder() -> RenderConfigBuilder {
        RenderConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct RenderConfigBuilder {
    source: Option<SourceConfig>,
    graphviz_bin: Option<PathBuf>,
    module: Option<Option<String>>,
    format: Option<ImageFormat>,
    output: Option<Option<PathBuf>>,
}

impl RenderConfigBuilder {
    pub fn new() -> Self {
        Self {
            source: None,
            graphviz_bin: None,
            module: None,
            format: None,
            output: None,
        }
    }

    pub fn with_source(mut self, source: SourceConfig) -> Self {
        self.source = Some(source);
        self
    }

    pub fn with_graphviz_bin(mut self, graphviz_bin: impl Into<PathBuf>) -> Self {
        self.graphviz_bin = Some(graphviz_bin.into());
        self
    }

    pub fn with_module(mut self, module: Option<String>) -> Self {
        self.module = Some(module);
        self
    }

    pub fn with_format(mut self, format: ImageFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn with_output(mut self, output: Option<PathBuf>) -> Self {
        self.output = Some(output);
        self
    }
}

impl ConfigBuilder for RenderConfigBuilder {
    type Config = RenderConfig;

    fn build(self) -> Result<Self::Config, GomodGraphError> {
        Ok(RenderConfig {
            source: required(self.source, "source")?,
            graphviz_bin: required(self.graphviz_bin, "graphviz_bin")?,
            module: self.module.flatten().filter(|m| !m.is_empty()),
            format: required(self.format, "format")?,
            output: self.output.flatten(),
        })
    }
}
