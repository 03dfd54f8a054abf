//! Tests for config - locating and loading the TOML configuration file.

mod support;

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use students_api::config::{resolve_path, Config, ConfigError};
use students_api::db::RepositoryType;

const SAMPLE: &str = r#"
env = "dev"
storage_path = "storage/test.db"

[http_server]
address = "127.0.0.1:9999"
shutdown_timeout_secs = 2
"#;

fn write_config(dir: &Path, contents: &str) -> PathBuf {
    let path = dir.join("config.toml");
    fs::write(&path, contents).unwrap();
    path
}

#[test]
fn test_env_path_wins_over_flag() {
    support::with_scoped_env(&[("CONFIG_PATH", Some("from-env.toml"))], || {
        let path = resolve_path(Some(Path::new("from-flag.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("from-env.toml"));
    });
}

#[test]
fn test_flag_used_when_env_unset() {
    support::with_scoped_env(&[("CONFIG_PATH", None)], || {
        let path = resolve_path(Some(Path::new("from-flag.toml"))).unwrap();
        assert_eq!(path, PathBuf::from("from-flag.toml"));
    });
}

#[test]
fn test_no_path_is_an_error() {
    support::with_scoped_env(&[("CONFIG_PATH", Some(""))], || {
        assert!(matches!(resolve_path(None), Err(ConfigError::PathNotSet)));
    });
}

#[test]
fn test_missing_file_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");

    let err = Config::from_file(&missing).unwrap_err();
    assert!(matches!(err, ConfigError::NotFound(ref p) if p == &missing));
}

#[test]
fn test_malformed_file_is_parse_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), "env = \n[http_server");

    assert!(matches!(Config::from_file(&path), Err(ConfigError::Parse(_))));
}

#[test]
fn test_load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), SAMPLE);

    support::with_scoped_env(&[("CONFIG_PATH", None), ("ENV", None)], || {
        let config = Config::load(Some(path.as_path())).unwrap();
        assert_eq!(config.env, "dev");
        assert_eq!(config.storage_path, "storage/test.db");
        assert_eq!(config.storage_backend, RepositoryType::Sqlite);
        assert_eq!(config.http_server.address, "127.0.0.1:9999");
        assert_eq!(config.shutdown_timeout(), Duration::from_secs(2));
    });
}

#[test]
fn test_env_variable_overrides_env_key() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(dir.path(), SAMPLE);

    support::with_scoped_env(&[("ENV", Some("production"))], || {
        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.env, "production");
        assert!(config.is_production());
    });
}

#[test]
fn test_env_variable_satisfies_required_env() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_config(
        dir.path(),
        "[http_server]\naddress = \"127.0.0.1:8082\"\n",
    );

    support::with_scoped_env(&[("ENV", None)], || {
        assert!(matches!(
            Config::from_file(&path),
            Err(ConfigError::Invalid(_))
        ));
    });
    support::with_scoped_env(&[("ENV", Some("local"))], || {
        assert_eq!(Config::from_file(&path).unwrap().env, "local");
    });
}

#[test]
fn test_bundled_local_config_parses() {
    let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("config/local.toml");
    let contents = fs::read_to_string(path).unwrap();

    let config = Config::parse(&contents).unwrap();
    assert_eq!(config.env, "local");
    assert_eq!(config.http_server.address, "127.0.0.1:8082");
}
