//! Envoy document decoding

use super::EnvoyConfig;
use crate::{ConvertError, Result};
use serde::de::DeserializeOwned;
use std::path::Path;

/// Check if content is a JSON document rather than YAML
fn is_json(content: &str) -> bool {
    content.trim_start().starts_with('{')
}

/// Decode a YAML or JSON document into `T`
pub fn decode_document<T: DeserializeOwned>(content: &str, path: &Path) -> Result<T> {
    if is_json(content) {
        serde_json::from_str(content).map_err(|e| ConvertError::Decode {
            path: path.to_path_buf(),
            line: Some(e.line()),
            column: Some(e.column()),
            message: format!("JSON parse error: {}", e),
        })
    } else {
        serde_yaml::from_str(content).map_err(|e| ConvertError::Decode {
            path: path.to_path_buf(),
            line: e.location().map(|l| l.line()),
            column: e.location().map(|l| l.column()),
            message: format!("YAML parse error: {}", e),
        })
    }
}

/// Parse an Envoy bootstrap configuration
pub fn parse_config(content: &str, path: &Path) -> Result<EnvoyConfig> {
    decode_document(content, path)
}
