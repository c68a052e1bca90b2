//! Configuration loading tests

use std::io::Write;
use tempfile::NamedTempFile;
use textroute::config::{ConfigError, ServiceConfig};

fn write_config(content: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

#[test]
fn test_load_full_config_from_file() {
    let file = write_config(
        r#"
[server]
bind_addr = "0.0.0.0:9000"

[llm]
model = "x-ai/grok-code-fast-1"
api_key_env = "MY_API_KEY"
base_url = "https://example.test/v1"
timeout_secs = 15

[exchange]
max_rounds = 4
"#,
    );

    let config = ServiceConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.server.bind_addr, "0.0.0.0:9000");
    assert_eq!(config.llm.model, "x-ai/grok-code-fast-1");
    assert_eq!(config.llm.base_url, "https://example.test/v1");
    assert_eq!(config.llm.timeout_secs, 15);
    assert_eq!(config.exchange.max_rounds, 4);
}

#[test]
fn test_load_minimal_config_applies_defaults() {
    let file = write_config(
        r#"
[llm]
api_key_env = "MY_API_KEY"
"#,
    );

    let config = ServiceConfig::load_from_file(file.path()).unwrap();
    assert_eq!(config.server.bind_addr, "127.0.0.1:8000");
    assert_eq!(config.llm.base_url, "https://openrouter.ai/api/v1");
    assert_eq!(config.exchange.max_rounds, 10);
}

#[test]
fn test_missing_file_is_read_error() {
    let result = ServiceConfig::load_from_file(std::path::Path::new("/nonexistent/textroute.toml"));
    assert!(matches!(result, Err(ConfigError::FileRead(_))));
}

#[test]
fn test_invalid_toml_is_parse_error() {
    let file = write_config("this is not toml [[[");
    let result = ServiceConfig::load_from_file(file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_missing_llm_section_is_parse_error() {
    let file = write_config(
        r#"
[server]
bind_addr = "127.0.0.1:8000"
"#,
    );
    let result = ServiceConfig::load_from_file(file.path());
    assert!(matches!(result, Err(ConfigError::TomlParse(_))));
}

#[test]
fn test_zero_max_rounds_is_invalid() {
    let file = write_config(
        r#"
[llm]
api_key_env = "MY_API_KEY"

[exchange]
max_rounds = 0
"#,
    );
    let result = ServiceConfig::load_from_file(file.path());
    assert!(matches!(result, Err(ConfigError::InvalidConfig(_))));
}

#[test]
fn test_api_key_resolution_roundtrip() {
    let file = write_config(
        r#"
[llm]
api_key_env = "TEXTROUTE_TEST_KEY_ROUNDTRIP"
"#,
    );
    let config = ServiceConfig::load_from_file(file.path()).unwrap();

    std::env::set_var("TEXTROUTE_TEST_KEY_ROUNDTRIP", "sk-test");
    assert_eq!(config.resolve_api_key().unwrap(), "sk-test");
    std::env::remove_var("TEXTROUTE_TEST_KEY_ROUNDTRIP");

    assert!(matches!(
        config.resolve_api_key(),
        Err(ConfigError::EnvVarNotFound(_))
    ));
}
