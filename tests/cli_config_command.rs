//! Integration tests for CLI config command
//!
//! Tests file I/O operations for the `quant config` subcommand.
//! Verifies template generation, file writing, and loading the result back.

use quant::cli::generate_config_template;
use quant::config::{Config, HostKeyChecking};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create temporary directory for file operations
fn create_temp_dir() -> TempDir {
    TempDir::new().expect("Failed to create temp directory")
}

// ─────────────────────────────────────────────────────────────────────────────
// Template Content Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_generated_template_creates_valid_config_file() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.path().join("config.toml");

    fs::write(&config_path, generate_config_template()).expect("Failed to write template");

    let config =
        Config::from_file(&config_path).expect("Generated template should load as valid Config");

    assert_eq!(config.scrape.metric_family, "apiserver_request_count");
    assert_eq!(config.uptime.host_key_checking, HostKeyChecking::Disabled);
}

#[test]
fn test_template_matches_built_in_defaults() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, generate_config_template()).expect("Failed to write template");

    let from_template = Config::from_file(&config_path).expect("Failed to load config");
    let defaults = Config::default();

    assert_eq!(from_template.server.host, defaults.server.host);
    assert_eq!(from_template.server.port, defaults.server.port);
    assert_eq!(from_template.scrape.url, defaults.scrape.url);
    assert_eq!(
        from_template.scrape.timeout_seconds,
        defaults.scrape.timeout_seconds
    );
    assert_eq!(from_template.uptime.wait_ms, defaults.uptime.wait_ms);
    assert_eq!(from_template.uptime.username, defaults.uptime.username);
    assert_eq!(from_template.uptime.command, defaults.uptime.command);
    assert_eq!(from_template.uptime.ssh_program, defaults.uptime.ssh_program);
    assert_eq!(
        from_template.observability.log_level,
        defaults.observability.log_level
    );
}

#[test]
fn test_template_leaves_kubeconfig_to_command_line() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.path().join("config.toml");
    fs::write(&config_path, generate_config_template()).expect("Failed to write template");

    let config = Config::load(
        Some(config_path.as_path()),
        Some(PathBuf::from("/cluster/auth/kubeconfig")),
    )
    .expect("Failed to load config");

    assert_eq!(
        config.uptime.kubeconfig(),
        Some(Path::new("/cluster/auth/kubeconfig"))
    );
}

#[test]
fn test_template_includes_documentation() {
    let template = generate_config_template();

    assert!(template.contains("# "), "Template should have comments");
    assert!(template.contains("Quant"), "Template should have header");
    assert!(
        template.contains("host_key_checking"),
        "Template should document the host key policy"
    );
}

// ─────────────────────────────────────────────────────────────────────────────
// File Operation Tests
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn test_template_file_content_matches_generation() {
    let temp_dir = create_temp_dir();
    let config_path = temp_dir.path().join("config.toml");

    let template = generate_config_template();
    fs::write(&config_path, template).expect("Failed to write template");

    let content = fs::read_to_string(&config_path).expect("Failed to read back");
    assert_eq!(content, template);
}

#[test]
fn test_write_to_nonexistent_parent_fails() {
    let temp_dir = create_temp_dir();
    let bad_path = temp_dir.path().join("nonexistent").join("config.toml");

    let result = fs::write(&bad_path, generate_config_template());
    assert!(result.is_err());
    assert_eq!(result.unwrap_err().kind(), std::io::ErrorKind::NotFound);
}
