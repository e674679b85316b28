//! Unit tests for configuration and graceful degradation
//!
//! Note: Uses serial_test crate to prevent ENV variable race conditions.
//! Tests that manipulate SEATMAP_ROOT_FOLDER or SEATMAP_CONFIG are marked
//! with #[serial] so they run sequentially.

use seatmap_common::config::{
    load_toml_config, read_toml_config, write_toml_config, ImportConfig, RootFolderInitializer,
    RootFolderResolver, TomlConfig, CONFIG_FILE_ENV, ROOT_FOLDER_ENV,
};
use serial_test::serial;
use std::env;
use std::path::PathBuf;
use tempfile::TempDir;

#[test]
fn test_defaults() {
    let config = TomlConfig::default();
    assert_eq!(config.import.chunk_size, 50);
    assert_eq!(config.import.queue_capacity, 64);
    assert!(!config.import.create_missing_tables);
    assert_eq!(config.logging.level, "info");
    assert!(config.root_folder.is_none());
}

#[test]
fn test_partial_toml_fills_defaults() {
    let config: TomlConfig = toml::from_str(
        r#"
        [import]
        create_missing_tables = true
        "#,
    )
    .unwrap();

    assert!(config.import.create_missing_tables);
    assert_eq!(config.import.chunk_size, 50);
    assert_eq!(config.logging.level, "info");
}

#[test]
fn test_zero_chunk_size_rejected() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[import]\nchunk_size = 0\n").unwrap();

    let err = read_toml_config(&path).unwrap_err();
    assert!(err.to_string().contains("chunk_size"));
}

#[test]
fn test_write_then_read() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.toml");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/srv/seatmap")),
        import: ImportConfig {
            chunk_size: 25,
            ..Default::default()
        },
        ..Default::default()
    };

    write_toml_config(&config, &path).unwrap();
    assert_eq!(read_toml_config(&path).unwrap(), config);
}

#[test]
#[serial]
fn test_missing_config_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    env::set_var(CONFIG_FILE_ENV, temp_dir.path().join("absent.toml"));

    let config = load_toml_config(None).unwrap();
    assert_eq!(config, TomlConfig::default());

    env::remove_var(CONFIG_FILE_ENV);
}

#[test]
#[serial]
fn test_malformed_config_file_is_error() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(&path, "[import\nchunk_size = ").unwrap();

    assert!(load_toml_config(Some(&path)).is_err());
}

#[test]
#[serial]
fn test_resolver_cli_arg_wins() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/seatmap-env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/seatmap-toml")),
        ..Default::default()
    };

    let resolved = RootFolderResolver::new("test-module")
        .with_cli_arg(Some(PathBuf::from("/tmp/seatmap-cli")))
        .with_toml_config(&config)
        .resolve();
    assert_eq!(resolved, PathBuf::from("/tmp/seatmap-cli"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_env_beats_toml() {
    env::set_var(ROOT_FOLDER_ENV, "/tmp/seatmap-env");
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/seatmap-toml")),
        ..Default::default()
    };

    let resolved = RootFolderResolver::new("test-module")
        .with_toml_config(&config)
        .resolve();
    assert_eq!(resolved, PathBuf::from("/tmp/seatmap-env"));

    env::remove_var(ROOT_FOLDER_ENV);
}

#[test]
#[serial]
fn test_resolver_toml_then_default() {
    env::remove_var(ROOT_FOLDER_ENV);
    let config = TomlConfig {
        root_folder: Some(PathBuf::from("/tmp/seatmap-toml")),
        ..Default::default()
    };

    let from_toml = RootFolderResolver::new("test-module")
        .with_toml_config(&config)
        .resolve();
    assert_eq!(from_toml, PathBuf::from("/tmp/seatmap-toml"));

    let fallback = RootFolderResolver::new("test-module").resolve();
    assert_eq!(fallback, seatmap_common::config::default_root_folder());
}

#[test]
fn test_initializer_creates_root_folder() {
    let temp_dir = TempDir::new().unwrap();
    let root = temp_dir.path().join("data");
    let initializer = RootFolderInitializer::new(root.clone());

    initializer.ensure_directory_exists().unwrap();
    assert!(root.is_dir());
    assert_eq!(initializer.database_path(), root.join("seatmap.db"));
}
