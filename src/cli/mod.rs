//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

/// Convert an Envoy bootstrap configuration to harald forwarding rules
///
/// The harald configuration is written to stdout. Set RUST_LOG to see
/// what the conversion does.
#[derive(Parser, Debug)]
#[command(name = "envoy-to-harald")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Envoy configuration file (YAML or JSON)
    pub input: PathBuf,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_positional() {
        let cli = Cli::try_parse_from(["envoy-to-harald", "envoy.yaml"]).unwrap();
        assert_eq!(cli.input, PathBuf::from("envoy.yaml"));
    }

    #[test]
    fn test_input_required() {
        assert!(Cli::try_parse_from(["envoy-to-harald"]).is_err());
        assert!(Cli::try_parse_from(["envoy-to-harald", "a.yaml", "b.yaml"]).is_err());
    }
}
