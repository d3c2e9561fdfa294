use std::path::PathBuf;

use serial_test::serial;
use temp_env::with_vars;

use super::*;

fn cleanup_all_lrp_env_vars() {
    for (key, _) in std::env::vars() {
        if key.starts_with("LRP__") || key == "CONFIG_PATH" {
            std::env::remove_var(&key);
        }
    }
}

#[test]
#[serial]
fn default_config_should_initialize_with_hardcoded_values() {
    let config = WatchNodeConfig::default();

    assert_eq!(config.watch.event_buffer_size, 64);
    assert_eq!(config.watch.error_buffer_size, 16);
    assert_eq!(config.watch.source_buffer_size, 256);
    assert_eq!(config.watch.source_poll_interval_ms, 100);
    assert_eq!(config.storage.db_root_dir, PathBuf::from("./db"));
}

#[test]
#[serial]
fn new_should_merge_environment_overrides() {
    cleanup_all_lrp_env_vars();
    with_vars(
        vec![
            ("LRP__WATCH__EVENT_BUFFER_SIZE", Some("128")),
            ("LRP__STORAGE__DB_ROOT_DIR", Some("/tmp/lrp/db")),
        ],
        || {
            let config = WatchNodeConfig::new().unwrap();

            assert_eq!(config.watch.event_buffer_size, 128);
            assert_eq!(config.watch.error_buffer_size, 16);
            assert_eq!(config.storage.db_root_dir, PathBuf::from("/tmp/lrp/db"));
        },
    );
}

#[test]
#[serial]
fn with_override_config_should_merge_file_settings() {
    cleanup_all_lrp_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("override.toml");

    std::fs::write(
        &config_path,
        r#"
        [watch]
        event_buffer_size = 8
        source_poll_interval_ms = 20
        "#,
    )
    .unwrap();

    let empty_vars: Vec<(&str, Option<&str>)> = vec![];
    with_vars(empty_vars, || {
        let base_config = WatchNodeConfig::new().expect("success");
        let config = base_config
            .with_override_config(config_path.to_str().unwrap())
            .expect("override should load");

        assert_eq!(config.watch.event_buffer_size, 8);
        assert_eq!(config.watch.source_poll_interval_ms, 20);
        // Untouched values keep their defaults
        assert_eq!(config.watch.error_buffer_size, 16);
    });
}

#[test]
#[serial]
fn config_path_env_should_be_loaded_by_new() {
    cleanup_all_lrp_env_vars();
    let temp_dir = tempfile::tempdir().unwrap();
    let config_path = temp_dir.path().join("lrp.toml");
    std::fs::write(
        &config_path,
        r#"
        [watch]
        error_buffer_size = 4
        "#,
    )
    .unwrap();

    with_vars(vec![("CONFIG_PATH", Some(config_path.to_str().unwrap()))], || {
        let config = WatchNodeConfig::new().unwrap();
        assert_eq!(config.watch.error_buffer_size, 4);
    });
}

#[test]
fn validation_should_fail_with_zero_event_buffer() {
    let mut config = WatchNodeConfig::default();
    config.watch.event_buffer_size = 0;

    let result = config.validate();
    assert!(matches!(result, Err(Error::Config(_))));
}

#[test]
fn validation_should_fail_with_zero_poll_interval() {
    let mut config = WatchNodeConfig::default();
    config.watch.source_poll_interval_ms = 0;

    assert!(config.validate().is_err());
}

#[test]
fn validation_should_fail_with_empty_db_root_dir() {
    let mut config = WatchNodeConfig::default();
    config.storage.db_root_dir = PathBuf::new();

    assert!(config.validate().is_err());
}

#[test]
fn validation_should_pass_for_defaults() {
    assert!(WatchNodeConfig::default().validate().is_ok());
}
