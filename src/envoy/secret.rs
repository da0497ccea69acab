//! SDS secret documents
//!
//! Listeners reference their TLS material through `sds_config.path`. Each
//! referenced file holds a list of secret resources, of which only the first
//! is read. Two shapes are supported: a server certificate
//! (`tls_certificate`) and a trust anchor (`validation_context`).

use super::decode_document;
use crate::{read_file, ConvertError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// SDS secret document
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SecretDocument {
    /// Secret resources
    #[serde(default)]
    pub resources: Vec<Secret>,
}

/// Secret configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Secret {
    /// Name
    pub name: Option<String>,

    /// TLS certificate
    pub tls_certificate: Option<TlsCertificate>,

    /// Validation context
    pub validation_context: Option<ValidationContext>,
}

/// TLS certificate
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TlsCertificate {
    /// Certificate chain
    pub certificate_chain: Option<DataSource>,

    /// Private key
    pub private_key: Option<DataSource>,
}

/// Validation context
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ValidationContext {
    /// Trusted CA
    pub trusted_ca: Option<DataSource>,
}

/// Data source
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DataSource {
    /// Inline string
    pub inline_string: Option<String>,
}

/// Certificate chain and private key of a server certificate secret
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerCertificate {
    pub certificate: String,
    pub key: String,
}

impl SecretDocument {
    /// Read and decode a secret document
    pub fn load(path: &Path) -> Result<Self> {
        let content = read_file(path)?;
        let document: SecretDocument = decode_document(&content, path)?;
        debug!(
            path = %path.display(),
            resources = document.resources.len(),
            "Loaded secret document"
        );
        Ok(document)
    }

    fn first_resource(&self, path: &Path) -> Result<&Secret> {
        self.resources
            .first()
            .ok_or_else(|| missing(path, "secret resources"))
    }
}

fn missing(path: &Path, what: &str) -> ConvertError {
    ConvertError::MissingResource(format!("{} in {}", what, path.display()))
}

fn inline_string(source: Option<&DataSource>, path: &Path, what: &str) -> Result<String> {
    source
        .and_then(|s| s.inline_string.clone())
        .ok_or_else(|| missing(path, what))
}

/// Load the certificate chain and private key from a server certificate secret
pub fn load_server_certificate(path: &Path) -> Result<ServerCertificate> {
    let document = SecretDocument::load(path)?;
    let tls_certificate = document
        .first_resource(path)?
        .tls_certificate
        .as_ref()
        .ok_or_else(|| missing(path, "tls_certificate"))?;

    Ok(ServerCertificate {
        certificate: inline_string(
            tls_certificate.certificate_chain.as_ref(),
            path,
            "certificate_chain.inline_string",
        )?,
        key: inline_string(
            tls_certificate.private_key.as_ref(),
            path,
            "private_key.inline_string",
        )?,
    })
}

/// Load the trusted CA bundle from a validation context secret
pub fn load_trusted_ca(path: &Path) -> Result<String> {
    let document = SecretDocument::load(path)?;
    let validation_context = document
        .first_resource(path)?
        .validation_context
        .as_ref()
        .ok_or_else(|| missing(path, "validation_context"))?;

    inline_string(
        validation_context.trusted_ca.as_ref(),
        path,
        "trusted_ca.inline_string",
    )
}
