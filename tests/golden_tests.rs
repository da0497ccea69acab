//! Golden file tests for envoy-to-harald
//!
//! These tests convert fixture files and compare the YAML output against snapshots.
//! Run `cargo insta review` to update snapshots after intentional changes.

use envoy_to_harald::{convert, ConvertError, ConvertOptions, HaraldConfig};
use std::path::PathBuf;

fn fixture(fixture_path: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(fixture_path)
}

fn convert_fixture(fixture_path: &str) -> Result<String, ConvertError> {
    convert(&fixture(fixture_path), ConvertOptions::default())
}

#[test]
fn test_envoy_minimal() {
    let yaml = convert_fixture("envoy/minimal.yaml").expect("Failed to convert fixture");
    insta::assert_snapshot!("envoy_minimal", yaml);
}

#[test]
fn test_envoy_mtls() {
    let yaml = convert_fixture("envoy/mtls.yaml").expect("Failed to convert fixture");
    insta::assert_snapshot!("envoy_mtls", yaml);
}

#[test]
fn test_minimal_rule_fields() {
    let yaml = convert_fixture("envoy/minimal.yaml").expect("Failed to convert fixture");
    let config: HaraldConfig = serde_yaml::from_str(&yaml).expect("Output is not valid YAML");

    assert_eq!(config.rules.len(), 1);
    let rule = &config.rules["l1"];
    assert_eq!(rule.listen.to_string(), "tcp:0.0.0.0:443");
    assert_eq!(rule.connect.to_string(), "tcp:10.0.0.1:8443");

    let tls = rule.tls.as_ref().expect("Rule has no TLS block");
    assert_eq!(tls.certificate, "CERT");
    assert_eq!(tls.key, "KEY");
    assert!(tls.client_cas.is_none());
    assert!(tls.application_protocols.is_none());
}

#[test]
fn test_json_matches_yaml() {
    let from_yaml = convert_fixture("envoy/minimal.yaml").expect("Failed to convert YAML fixture");
    let from_json = convert_fixture("envoy/minimal.json").expect("Failed to convert JSON fixture");
    assert_eq!(from_yaml, from_json);
}

#[test]
fn test_output_is_deterministic() {
    let first = convert_fixture("envoy/mtls.yaml").expect("Failed to convert fixture");
    let second = convert_fixture("envoy/mtls.yaml").expect("Failed to convert fixture");
    assert_eq!(first, second);
}

#[test]
fn test_missing_cluster() {
    let err = convert_fixture("envoy/missing_cluster.yaml").unwrap_err();
    assert!(matches!(err.root(), ConvertError::ClusterNotFound(name) if name == "c2"));
    assert_eq!(err.to_string(), "listener 'l1': cluster 'c2': not found");
}

#[test]
fn test_empty_secret_resources() {
    let err = convert_fixture("envoy/empty_secret.yaml").unwrap_err();
    assert!(matches!(err.root(), ConvertError::MissingResource(_)));
    assert!(err.to_string().starts_with("listener 'l1': missing resource: secret resources"));
}

#[test]
fn test_missing_input_file() {
    let err = convert_fixture("envoy/does_not_exist.yaml").unwrap_err();
    assert!(matches!(err, ConvertError::Io { .. }));
}
