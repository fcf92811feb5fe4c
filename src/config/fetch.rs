//! Fetch command configuration

use crate::common::{ConfigBuilder, required};
use crate::config::SourceConfig;
use crate::error::GomodGraphError;

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub source: SourceConfig,
}

impl FetchConfig {
    pub fn builder() -> FetchConfigBuilder {
        FetchConfigBuilder::new()
    }
}

#[derive(Default)]
pub struct FetchConfigBuilder {
    source: Option<SourceConfig>,
}

impl FetchConfigBuilder {
    pub fn new() -> Self {
        Self { source: None }
    }

    pub fn with_source(mut self, source: SourceConfig) -> Self {
        self.source = Some(source);
        self
    }
}

impl ConfigBuilder for FetchConfigBuilder {
    type Config = FetchConfig;

    fn build(self) -> Result<Self::Config, GomodGraphError> {
        let source = required(self.source, "source")?;
        // Fetching always downloads, so the token is checked up front
        source.require_token()?;

        Ok(FetchConfig { source })
    }
}
