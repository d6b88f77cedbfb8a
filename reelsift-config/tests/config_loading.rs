use std::fs;
use std::time::Duration;

use reelsift_config::{ConfigLoadError, ConfigLoader, ConfigSource, EnvConfig};
use tempfile::TempDir;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, contents).unwrap();
    path
}

fn loader_in(dir: &TempDir) -> ConfigLoader {
    ConfigLoader::new().with_search_root(dir.path())
}

#[test]
fn defaults_apply_when_nothing_is_configured() {
    let dir = TempDir::new().unwrap();
    let load = loader_in(&dir).load_with_env(EnvConfig::default()).unwrap();

    assert_eq!(load.source, ConfigSource::Default);
    assert_eq!(load.config.backend.base_url, "http://localhost:8096");
    assert_eq!(load.config.backend.api_version, "v1");
    assert_eq!(load.config.backend.request_timeout, Duration::from_secs(30));
    assert_eq!(load.config.logging.filter, "info,reelsift_core=info");
}

#[test]
fn default_candidate_file_is_discovered() {
    let dir = TempDir::new().unwrap();
    let path = write(
        &dir,
        "config/reelsift.toml",
        "[backend]\nbase_url = \"media.lan:8096/\"\nrequest_timeout = \"5s\"\n",
    );

    let load = loader_in(&dir).load_with_env(EnvConfig::default()).unwrap();
    assert_eq!(load.source, ConfigSource::File(path));
    assert_eq!(load.config.backend.base_url, "http://media.lan:8096");
    assert_eq!(load.config.backend.request_timeout, Duration::from_secs(5));
}

#[test]
fn explicit_path_wins_over_environment() {
    let dir = TempDir::new().unwrap();
    let explicit = write(&dir, "explicit.json", r#"{"backend": {"api_version": "v2"}}"#);
    let env_path = write(&dir, "env.toml", "[backend]\napi_version = \"v3\"\n");

    let env = EnvConfig {
        config_path: Some(env_path),
        ..EnvConfig::default()
    };
    let load = loader_in(&dir)
        .with_config_path(&explicit)
        .load_with_env(env)
        .unwrap();
    assert_eq!(load.source, ConfigSource::Explicit(explicit));
    assert_eq!(load.config.backend.api_version, "v2");
}

#[test]
fn env_path_beats_inline_json() {
    let dir = TempDir::new().unwrap();
    let env_path = write(&dir, "env.toml", "[logging]\nfilter = \"debug\"\n");

    let env = EnvConfig {
        config_path: Some(env_path.clone()),
        config_json: Some(r#"{"logging": {"filter": "trace"}}"#.to_string()),
        ..EnvConfig::default()
    };
    let load = loader_in(&dir).load_with_env(env).unwrap();
    assert_eq!(load.source, ConfigSource::EnvPath(env_path));
    assert_eq!(load.config.logging.filter, "debug");
}

#[test]
fn inline_json_is_used_before_default_files() {
    let dir = TempDir::new().unwrap();
    write(&dir, "reelsift.toml", "[logging]\nfilter = \"warn\"\n");

    let env = EnvConfig {
        config_json: Some(r#"{"logging": {"filter": "trace"}}"#.to_string()),
        ..EnvConfig::default()
    };
    let load = loader_in(&dir).load_with_env(env).unwrap();
    assert_eq!(load.source, ConfigSource::EnvInline);
    assert_eq!(load.config.logging.filter, "trace");
}

#[test]
fn url_and_api_key_overrides_apply_last() {
    let dir = TempDir::new().unwrap();
    write(
        &dir,
        "reelsift.toml",
        "[backend]\nbase_url = \"http://file:1\"\napi_key = \"from-file\"\n",
    );

    let env = EnvConfig {
        backend_url: Some("https://override.example/".to_string()),
        api_key: Some("from-env".to_string()),
        ..EnvConfig::default()
    };
    let load = loader_in(&dir).load_with_env(env).unwrap();
    assert_eq!(load.config.backend.base_url, "https://override.example");
    assert_eq!(load.config.backend.api_key.as_deref(), Some("from-env"));

    let settings = load.config.backend.http_settings();
    assert_eq!(settings.api_key.as_deref(), Some("from-env"));
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = loader_in(&dir)
        .with_config_path(dir.path().join("absent.toml"))
        .load_with_env(EnvConfig::default())
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::MissingConfig { .. }));
}

#[test]
fn malformed_file_reports_parse_error() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "broken.toml", "[backend\nbase_url = ");
    let err = loader_in(&dir)
        .with_config_path(path)
        .load_with_env(EnvConfig::default())
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::Toml { .. }));
}

#[test]
fn invalid_timeout_is_rejected_at_parse_time() {
    let dir = TempDir::new().unwrap();
    let path = write(&dir, "slow.toml", "[backend]\nrequest_timeout = \"forever\"\n");
    let err = loader_in(&dir)
        .with_config_path(path)
        .load_with_env(EnvConfig::default())
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::Toml { .. }));
}

#[test]
fn explicit_env_file_is_loaded() {
    let dir = TempDir::new().unwrap();
    let env_file = write(&dir, "reelsift.env", "REELSIFT_LOADER_ENV_MARKER=loaded\n");

    let load = loader_in(&dir).with_env_file(&env_file).load().unwrap();
    assert!(load.env_file_loaded);
    assert_eq!(
        std::env::var("REELSIFT_LOADER_ENV_MARKER").as_deref(),
        Ok("loaded")
    );
}

#[test]
fn missing_explicit_env_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    let err = loader_in(&dir)
        .with_env_file(dir.path().join("absent.env"))
        .load()
        .unwrap_err();
    assert!(matches!(err, ConfigLoadError::EnvFile(_)));
}
