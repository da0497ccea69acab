//! Envoy to harald mapping

mod clusters;
mod rules;

pub use clusters::ClusterIndex;
pub use rules::{map_listener, RuleSetBuilder};

use crate::envoy::EnvoyConfig;
use crate::harald::HaraldConfig;
use crate::{ConvertError, ConvertOptions, Result};
use tracing::debug;

/// Map an Envoy configuration to a harald configuration
///
/// Listeners are processed in document order; the first failing listener
/// aborts the whole conversion.
pub fn map_envoy_to_harald(config: &EnvoyConfig, options: &ConvertOptions) -> Result<HaraldConfig> {
    let clusters = ClusterIndex::new(&config.static_resources.clusters);
    let mut builder = RuleSetBuilder::new();

    for (idx, listener) in config.static_resources.listeners.iter().enumerate() {
        let name = listener.name.as_deref().ok_or_else(|| {
            ConvertError::MissingResource(format!("name of listener #{}", idx))
        })?;

        let rule = map_listener(listener, &clusters, options).map_err(|e| e.in_listener(name))?;
        debug!(
            listener = name,
            listen = %rule.listen,
            connect = %rule.connect,
            tls = rule.tls.is_some(),
            "Mapped listener"
        );
        builder.insert(name, rule);
    }

    Ok(builder.finish())
}
