use std::fs;
use std::time::Duration;

use jobdag::config::{load_and_validate, load_or_default};
use jobdag::errors::JobError;
use tempfile::tempdir;

#[test]
fn test_relative_paths_resolve_against_config_dir() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Jobdag.toml");
    fs::write(
        &path,
        r#"
[storage]
database = "db/jobs.json"
data_dir = "tables"

[run]
operation_timeout_secs = 5
"#,
    )
    .unwrap();

    let cfg = load_and_validate(&path).unwrap();

    assert_eq!(cfg.storage.database, dir.path().join("db/jobs.json"));
    assert_eq!(cfg.storage.data_dir, dir.path().join("tables"));
    assert_eq!(cfg.operation_timeout(), Duration::from_secs(5));
}

#[test]
fn test_empty_config_uses_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Jobdag.toml");
    fs::write(&path, "").unwrap();

    let cfg = load_and_validate(&path).unwrap();

    assert_eq!(cfg.storage.database, dir.path().join("storage/job.json"));
    assert_eq!(cfg.storage.data_dir, dir.path().join("storage/data"));
    assert_eq!(cfg.operation_timeout(), Duration::from_secs(30));
}

#[test]
fn test_absolute_paths_are_kept() {
    let dir = tempdir().unwrap();
    let elsewhere = tempdir().unwrap();
    let path = dir.path().join("Jobdag.toml");
    let db = elsewhere.path().join("job.json");
    fs::write(
        &path,
        format!("[storage]\ndatabase = {:?}\n", db.to_string_lossy()),
    )
    .unwrap();

    let cfg = load_and_validate(&path).unwrap();

    assert_eq!(cfg.storage.database, db);
}

#[test]
fn test_zero_timeout_is_config_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Jobdag.toml");
    fs::write(&path, "[run]\noperation_timeout_secs = 0\n").unwrap();

    match load_and_validate(&path) {
        Err(JobError::ConfigError(msg)) => assert!(msg.contains("operation_timeout_secs")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn test_database_inside_data_dir_is_config_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Jobdag.toml");
    fs::write(
        &path,
        "[storage]\ndatabase = \"data/job.json\"\ndata_dir = \"data\"\n",
    )
    .unwrap();

    assert!(matches!(
        load_and_validate(&path),
        Err(JobError::ConfigError(_))
    ));
}

#[test]
fn test_unknown_section_is_toml_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("Jobdag.toml");
    fs::write(&path, "[bogus]\nkey = 1\n").unwrap();

    assert!(matches!(load_and_validate(&path), Err(JobError::TomlError(_))));
}

#[test]
fn test_missing_explicit_config_is_error() {
    let dir = tempdir().unwrap();
    assert!(matches!(
        load_and_validate(dir.path().join("absent.toml")),
        Err(JobError::ConfigError(_))
    ));
}

#[test]
fn test_missing_default_config_falls_back_to_defaults() {
    let dir = tempdir().unwrap();

    let cfg = load_or_default(dir.path().join("Jobdag.toml")).unwrap();

    assert_eq!(cfg.storage.database, dir.path().join("storage/job.json"));
}
