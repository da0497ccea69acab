//! Envoy listener to harald forwarding rule

use super::clusters::ClusterIndex;
use crate::envoy::{self, CommonTlsContext, FilterChain, Listener};
use crate::harald::{ForwardRule, HaraldConfig, NetConf, Tls};
use crate::{ConvertError, ConvertOptions, Result};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, warn};

/// Accumulates rules and wraps them into the output document
#[derive(Debug, Default)]
pub struct RuleSetBuilder {
    rules: BTreeMap<String, ForwardRule>,
}

impl RuleSetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a rule, replacing any earlier rule with the same name
    pub fn insert(&mut self, name: &str, rule: ForwardRule) {
        if self.rules.insert(name.to_string(), rule).is_some() {
            warn!(rule = name, "Duplicate listener name, earlier rule overwritten");
        }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn finish(self) -> HaraldConfig {
        HaraldConfig::new(self.rules)
    }
}

/// Map one Envoy listener to a forwarding rule
pub fn map_listener(
    listener: &Listener,
    clusters: &ClusterIndex<'_>,
    options: &ConvertOptions,
) -> Result<ForwardRule> {
    let chain = listener
        .filter_chains
        .first()
        .ok_or_else(|| ConvertError::MissingFilter("filter_chains is empty".to_string()))?;
    let filter = chain
        .filters
        .first()
        .ok_or_else(|| ConvertError::MissingFilter("filter chain has no filters".to_string()))?;
    let cluster_name = filter
        .typed_config
        .as_ref()
        .and_then(|tc| tc.cluster.as_deref())
        .ok_or_else(|| {
            ConvertError::MissingFilter("first filter names no upstream cluster".to_string())
        })?;

    let connect = clusters.resolve(cluster_name)?;

    let listen = listener
        .address
        .as_ref()
        .and_then(|a| a.socket_address.as_ref())
        .and_then(|sa| sa.host_port())
        .map(NetConf::tcp)
        .ok_or_else(|| ConvertError::MissingResource("listener socket address".to_string()))?;

    let tls = map_tls(chain, options)?;

    Ok(ForwardRule {
        listen,
        connect,
        tls,
    })
}

fn common_tls_context(chain: &FilterChain) -> Option<&CommonTlsContext> {
    chain
        .transport_socket
        .as_ref()?
        .typed_config
        .as_ref()?
        .common_tls_context
        .as_ref()
}

/// Load the TLS material a filter chain references
fn map_tls(chain: &FilterChain, options: &ConvertOptions) -> Result<Option<Tls>> {
    let context = common_tls_context(chain);

    let Some((context, cert_path)) = context.and_then(|c| c.server_cert_path().map(|p| (c, p)))
    else {
        if options.require_tls {
            return Err(ConvertError::MissingResource(
                "server certificate sds_config path".to_string(),
            ));
        }
        return Ok(None);
    };

    let server_cert = envoy::load_server_certificate(Path::new(cert_path))?;
    debug!(path = cert_path, "Loaded server certificate");

    let client_cas = match context.validation_context_path() {
        Some(ca_path) => {
            let ca = envoy::load_trusted_ca(Path::new(ca_path))?;
            debug!(path = ca_path, "Loaded trusted CA");
            Some(ca)
        }
        None => None,
    };

    Ok(Some(Tls {
        certificate: server_cert.certificate,
        key: server_cert.key,
        client_cas,
        application_protocols: split_alpn(&context.alpn_protocols),
    }))
}

/// Only the first ALPN entry is used, and it holds a comma separated list
fn split_alpn(alpn: &[String]) -> Option<Vec<String>> {
    alpn.first()
        .map(|first| first.split(',').map(str::to_string).collect())
}
