//! Cluster lookup by name

use crate::envoy::Cluster;
use crate::harald::NetConf;
use crate::{ConvertError, Result};
use std::collections::HashMap;
use tracing::debug;

/// Name → cluster table, built once per conversion
pub struct ClusterIndex<'a> {
    clusters: HashMap<&'a str, &'a Cluster>,
}

impl<'a> ClusterIndex<'a> {
    /// Index clusters by the name listeners refer to them with.
    /// The first cluster defining a name wins.
    pub fn new(clusters: &'a [Cluster]) -> Self {
        let mut index = HashMap::with_capacity(clusters.len());
        for cluster in clusters {
            let Some(name) = cluster.lookup_name() else {
                continue;
            };
            if index.contains_key(name) {
                debug!(cluster = name, "Ignoring shadowed duplicate cluster definition");
                continue;
            }
            index.insert(name, cluster);
        }
        debug!(clusters = index.len(), "Indexed clusters");
        Self { clusters: index }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Upstream address of the named cluster's first endpoint
    pub fn resolve(&self, name: &str) -> Result<NetConf> {
        let cluster = self
            .clusters
            .get(name)
            .ok_or_else(|| ConvertError::ClusterNotFound(name.to_string()))?;

        let address = cluster
            .first_socket_address()
            .and_then(|addr| addr.host_port())
            .ok_or_else(|| {
                ConvertError::MissingResource(format!(
                    "cluster '{}': endpoint socket address",
                    name
                ))
            })?;

        Ok(NetConf::tcp(address))
    }
}
