//! Envoy bootstrap configuration model
//!
//! Only the parts of Envoy's static bootstrap schema that feed a harald
//! forwarding rule are modelled:
//! - Static listeners with their first filter chain (TCP proxy + TLS context)
//! - Static clusters with their load assignment endpoints
//! - SDS secret documents referenced by path from a TLS context
//!
//! Unknown fields are ignored on decode.

mod parser;
pub mod secret;

pub use parser::{decode_document, parse_config};
pub use secret::{load_server_certificate, load_trusted_ca, ServerCertificate};

use serde::{Deserialize, Serialize};

/// Root Envoy configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct EnvoyConfig {
    /// Static resources (listeners, clusters)
    #[serde(default)]
    pub static_resources: StaticResources,
}

/// Static resources configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct StaticResources {
    /// Listeners
    #[serde(default)]
    pub listeners: Vec<Listener>,

    /// Clusters (upstreams)
    #[serde(default)]
    pub clusters: Vec<Cluster>,
}

/// Listener configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Listener {
    /// Listener name
    pub name: Option<String>,

    /// Address to bind
    pub address: Option<Address>,

    /// Filter chains
    #[serde(default)]
    pub filter_chains: Vec<FilterChain>,
}

/// Address configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Address {
    /// Socket address
    pub socket_address: Option<SocketAddress>,
}

/// Socket address
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SocketAddress {
    /// IP address or hostname
    pub address: Option<String>,

    /// Port value
    pub port_value: Option<u16>,

    /// Protocol (TCP/UDP)
    pub protocol: Option<String>,
}

impl SocketAddress {
    /// `host:port`, with IPv6 literals bracketed
    pub fn host_port(&self) -> Option<String> {
        let host = self.address.as_deref()?;
        let port = self.port_value?;
        if host.contains(':') && !host.starts_with('[') {
            Some(format!("[{}]:{}", host, port))
        } else {
            Some(format!("{}:{}", host, port))
        }
    }
}

/// Filter chain configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FilterChain {
    /// Name
    pub name: Option<String>,

    /// Network filters
    #[serde(default)]
    pub filters: Vec<Filter>,

    /// Transport socket (TLS)
    pub transport_socket: Option<TransportSocket>,
}

/// Network filter
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Filter {
    /// Filter name
    pub name: Option<String>,

    /// Typed config
    pub typed_config: Option<FilterConfig>,
}

/// Typed config of a network filter (`envoy.filters.network.tcp_proxy`)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct FilterConfig {
    /// Type URL
    #[serde(rename = "@type")]
    pub type_url: Option<String>,

    /// Stat prefix
    pub stat_prefix: Option<String>,

    /// Upstream cluster name
    pub cluster: Option<String>,
}

/// Transport socket (TLS)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct TransportSocket {
    /// Name
    pub name: Option<String>,

    /// Typed config
    pub typed_config: Option<DownstreamTlsContext>,
}

/// Downstream TLS context
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct DownstreamTlsContext {
    /// Type URL
    #[serde(rename = "@type")]
    pub type_url: Option<String>,

    /// Common TLS context
    pub common_tls_context: Option<CommonTlsContext>,

    /// Require client certificate
    pub require_client_certificate: Option<bool>,
}

/// Common TLS context
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct CommonTlsContext {
    /// ALPN protocols
    #[serde(default)]
    pub alpn_protocols: Vec<String>,

    /// Server certificates delivered over SDS
    #[serde(default)]
    pub tls_certificate_sds_secret_configs: Vec<SdsSecretConfig>,

    /// Validation context delivered over SDS
    pub validation_context_sds_secret_config: Option<SdsSecretConfig>,
}

impl CommonTlsContext {
    /// Path of the first server certificate SDS document
    pub fn server_cert_path(&self) -> Option<&str> {
        self.tls_certificate_sds_secret_configs
            .first()
            .and_then(SdsSecretConfig::path)
    }

    /// Path of the validation context SDS document, if any
    pub fn validation_context_path(&self) -> Option<&str> {
        self.validation_context_sds_secret_config
            .as_ref()
            .and_then(SdsSecretConfig::path)
    }
}

/// SDS secret config
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct SdsSecretConfig {
    /// Secret name
    pub name: Option<String>,

    /// Where the secret is delivered from
    pub sds_config: Option<ConfigSource>,
}

impl SdsSecretConfig {
    /// Filesystem path of the secret document. Empty paths count as absent.
    pub fn path(&self) -> Option<&str> {
        let source = self.sds_config.as_ref()?;
        let non_empty = |p: &&str| !p.is_empty();
        source.path.as_deref().filter(non_empty).or_else(|| {
            source
                .path_config_source
                .as_ref()
                .and_then(|p| p.path.as_deref())
                .filter(non_empty)
        })
    }
}

/// Config source
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ConfigSource {
    /// Legacy filesystem path
    pub path: Option<String>,

    /// Filesystem path source
    pub path_config_source: Option<PathConfigSource>,
}

/// Filesystem path config source
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct PathConfigSource {
    /// Path to the document
    pub path: Option<String>,
}

/// Cluster configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Cluster {
    /// Cluster name
    pub name: Option<String>,

    /// Connect timeout
    pub connect_timeout: Option<String>,

    /// Cluster type
    #[serde(rename = "type")]
    pub cluster_type: Option<String>,

    /// Load assignment
    pub load_assignment: Option<ClusterLoadAssignment>,
}

impl Cluster {
    /// Name listeners refer to this cluster by
    pub fn lookup_name(&self) -> Option<&str> {
        self.load_assignment
            .as_ref()
            .and_then(|la| la.cluster_name.as_deref())
            .or(self.name.as_deref())
    }

    /// Socket address of the first endpoint
    pub fn first_socket_address(&self) -> Option<&SocketAddress> {
        self.load_assignment
            .as_ref()?
            .endpoints
            .first()?
            .lb_endpoints
            .first()?
            .endpoint
            .as_ref()?
            .address
            .as_ref()?
            .socket_address
            .as_ref()
    }
}

/// Cluster load assignment
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ClusterLoadAssignment {
    /// Cluster name
    pub cluster_name: Option<String>,

    /// Endpoints
    #[serde(default)]
    pub endpoints: Vec<LocalityLbEndpoints>,
}

/// Locality LB endpoints
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LocalityLbEndpoints {
    /// LB endpoints
    #[serde(default)]
    pub lb_endpoints: Vec<LbEndpoint>,
}

/// LB endpoint
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct LbEndpoint {
    /// Endpoint
    pub endpoint: Option<Endpoint>,
}

/// Endpoint
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct Endpoint {
    /// Address
    pub address: Option<Address>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sds(path: Option<&str>, path_config_source: Option<&str>) -> SdsSecretConfig {
        SdsSecretConfig {
            name: Some("server_cert".to_string()),
            sds_config: Some(ConfigSource {
                path: path.map(str::to_string),
                path_config_source: path_config_source.map(|p| PathConfigSource {
                    path: Some(p.to_string()),
                }),
            }),
        }
    }

    #[test]
    fn test_sds_path_sources() {
        assert_eq!(sds(Some("/a.yaml"), None).path(), Some("/a.yaml"));
        assert_eq!(sds(None, Some("/b.yaml")).path(), Some("/b.yaml"));
        assert_eq!(sds(Some("/a.yaml"), Some("/b.yaml")).path(), Some("/a.yaml"));
        assert_eq!(sds(Some(""), None).path(), None);
        assert_eq!(sds(Some(""), Some("/b.yaml")).path(), Some("/b.yaml"));
        assert_eq!(sds(None, None).path(), None);
    }

    #[test]
    fn test_host_port() {
        let v4 = SocketAddress {
            address: Some("10.0.0.1".to_string()),
            port_value: Some(8443),
            ..Default::default()
        };
        assert_eq!(v4.host_port(), Some("10.0.0.1:8443".to_string()));

        let v6 = SocketAddress {
            address: Some("::1".to_string()),
            port_value: Some(443),
            ..Default::default()
        };
        assert_eq!(v6.host_port(), Some("[::1]:443".to_string()));

        let no_port = SocketAddress {
            address: Some("10.0.0.1".to_string()),
            ..Default::default()
        };
        assert_eq!(no_port.host_port(), None);
    }

    #[test]
    fn test_cluster_lookup_name() {
        let cluster = Cluster {
            name: Some("backend".to_string()),
            load_assignment: Some(ClusterLoadAssignment {
                cluster_name: Some("backend_la".to_string()),
                endpoints: vec![],
            }),
            ..Default::default()
        };
        assert_eq!(cluster.lookup_name(), Some("backend_la"));
        assert!(cluster.first_socket_address().is_none());

        let bare = Cluster {
            name: Some("backend".to_string()),
            ..Default::default()
        };
        assert_eq!(bare.lookup_name(), Some("backend"));
    }
}
