//! YAML output generation

use crate::harald::HaraldConfig;
use crate::Result;

/// YAML emitter for generating harald configuration
#[derive(Debug, Clone, Default)]
pub struct YamlEmitter;

impl YamlEmitter {
    pub fn new() -> Self {
        Self
    }

    /// Render the whole document. Nothing is written anywhere until the
    /// caller receives the complete string.
    pub fn emit(&self, config: &HaraldConfig) -> Result<String> {
        Ok(serde_yaml::to_string(config)?)
    }
}
