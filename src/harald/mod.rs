//! harald configuration types
//!
//! The output side of the conversion: a versioned document holding named
//! forwarding rules, each pairing a listen address with a connect address
//! and optional TLS material.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

/// Schema version written into every generated document
pub const CONFIG_VERSION: u32 = 2;

/// Complete harald configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HaraldConfig {
    /// Schema version
    pub version: u32,
    /// Log level of the forwarder
    pub log_level: LogLevel,
    /// Start listeners on load
    pub enable_listeners: bool,
    /// Forwarding rules by name, in sorted order
    pub rules: BTreeMap<String, ForwardRule>,
}

impl HaraldConfig {
    /// Wrap a rule set with the fixed document metadata
    pub fn new(rules: BTreeMap<String, ForwardRule>) -> Self {
        Self {
            version: CONFIG_VERSION,
            log_level: LogLevel::Debug,
            enable_listeners: true,
            rules,
        }
    }
}

/// Log level of the generated forwarder config
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum LogLevel {
    #[default]
    Debug,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Debug => write!(f, "DEBUG"),
        }
    }
}

/// A single forwarding rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardRule {
    /// Address to accept connections on
    pub listen: NetConf,
    /// Address to forward connections to
    pub connect: NetConf,
    /// TLS termination settings
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tls: Option<Tls>,
}

/// TLS termination settings of a rule
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tls {
    /// PEM certificate chain
    pub certificate: String,
    /// PEM private key
    pub key: String,
    /// PEM bundle of CAs trusted for client certificates
    #[serde(rename = "clientCAs", default, skip_serializing_if = "Option::is_none")]
    pub client_cas: Option<String>,
    /// ALPN protocols offered to clients
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub application_protocols: Option<Vec<String>>,
}

/// Network address, written as `<network>:<address>`
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NetConf {
    pub network: String,
    pub address: String,
}

impl NetConf {
    /// Stream address over TCP
    pub fn tcp(address: impl Into<String>) -> Self {
        Self {
            network: "tcp".to_string(),
            address: address.into(),
        }
    }
}

impl fmt::Display for NetConf {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.network, self.address)
    }
}

impl FromStr for NetConf {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some((network, address)) if !network.is_empty() && !address.is_empty() => Ok(Self {
                network: network.to_string(),
                address: address.to_string(),
            }),
            _ => Err(format!("invalid network address '{}': expected <network>:<address>", s)),
        }
    }
}

impl Serialize for NetConf {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for NetConf {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
