//! Envoy to harald config converter
//!
//! Translate an Envoy static bootstrap configuration (listeners, clusters and
//! SDS secret references) into a harald forwarding-rule configuration.

pub mod cli;
pub mod emitter;
pub mod envoy;
pub mod harald;
pub mod mapping;

pub use harald::{ForwardRule, HaraldConfig, NetConf, Tls};
pub use mapping::map_envoy_to_harald;

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("open {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("decode {}: {message}", location(path, *line))]
    Decode {
        path: PathBuf,
        line: Option<usize>,
        column: Option<usize>,
        message: String,
    },

    #[error("cluster '{0}': not found")]
    ClusterNotFound(String),

    #[error("missing filter: {0}")]
    MissingFilter(String),

    #[error("missing resource: {0}")]
    MissingResource(String),

    #[error("listener '{name}': {source}")]
    Listener {
        name: String,
        #[source]
        source: Box<ConvertError>,
    },

    #[error("encode output: {0}")]
    Encode(#[from] serde_yaml::Error),
}

impl ConvertError {
    /// Wrap an error with the name of the listener being translated
    pub fn in_listener(self, name: &str) -> Self {
        ConvertError::Listener {
            name: name.to_string(),
            source: Box::new(self),
        }
    }

    /// The innermost error, skipping any listener context
    pub fn root(&self) -> &ConvertError {
        match self {
            ConvertError::Listener { source, .. } => source.root(),
            other => other,
        }
    }
}

pub type Result<T> = std::result::Result<T, ConvertError>;

/// Convert an Envoy configuration file and render the harald YAML document
pub fn convert(path: &Path, options: ConvertOptions) -> Result<String> {
    let content = read_file(path)?;
    convert_string(&content, path, options)
}

/// Convert Envoy configuration content and render the harald YAML document
///
/// `path` is only used in diagnostics; SDS paths embedded in the content are
/// opened as written.
pub fn convert_string(content: &str, path: &Path, options: ConvertOptions) -> Result<String> {
    let envoy_config = envoy::parse_config(content, path)?;
    let harald_config = map_envoy_to_harald(&envoy_config, &options)?;

    let emitter = emitter::YamlEmitter::new();
    emitter.emit(&harald_config)
}

/// Options for conversion
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Fail listeners that carry no server certificate SDS config.
    /// When disabled such listeners become plain TCP rules.
    pub require_tls: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self { require_tls: true }
    }
}

/// `path:line`, or just `path` when the decoder reported no position
fn location(path: &Path, line: Option<usize>) -> String {
    match line {
        Some(line) => format!("{}:{}", path.display(), line),
        None => path.display().to_string(),
    }
}

pub(crate) fn read_file(path: &Path) -> Result<String> {
    std::fs::read_to_string(path).map_err(|source| ConvertError::Io {
        path: path.to_path_buf(),
        source,
    })
}
