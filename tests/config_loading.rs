// tests/config_loading.rs

use std::fs;

use tempfile::tempdir;

use taskdag::config::{load_and_validate, load_from_path};
use taskdag::{RunOptions, TaskdagError};

type TestResult = Result<(), Box<dyn std::error::Error>>;

#[test]
fn full_config_is_loaded_into_run_options() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("Taskdag.toml");
    fs::write(
        &path,
        r#"
[executor]
max_workers = 3
stream_buffer = 8

[summary]
print = true
"#,
    )?;

    let cfg = load_and_validate(&path)?;
    assert!(cfg.summary.print);
    assert_eq!(
        RunOptions::from(&cfg),
        RunOptions {
            max_workers: 3,
            stream_buffer: 8
        }
    );
    Ok(())
}

#[test]
fn empty_file_uses_defaults() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("empty.toml");
    fs::write(&path, "")?;

    let cfg = load_and_validate(&path)?;
    assert_eq!(RunOptions::from(&cfg), RunOptions::default());
    assert!(!cfg.summary.print);
    Ok(())
}

#[test]
fn zero_workers_is_rejected() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("bad.toml");
    fs::write(&path, "[executor]\nmax_workers = 0\n")?;

    // Raw loading accepts it; validation does not.
    assert_eq!(load_from_path(&path)?.executor.max_workers, 0);
    match load_and_validate(&path) {
        Err(TaskdagError::ConfigError(msg)) => assert!(msg.contains("max_workers")),
        other => panic!("expected ConfigError, got {other:?}"),
    }
    Ok(())
}

#[test]
fn malformed_toml_is_a_toml_error() -> TestResult {
    let dir = tempdir()?;
    let path = dir.path().join("broken.toml");
    fs::write(&path, "[executor\nmax_workers = ")?;

    assert!(matches!(load_and_validate(&path), Err(TaskdagError::TomlError(_))));
    Ok(())
}

#[test]
fn missing_file_is_an_io_error() -> TestResult {
    let dir = tempdir()?;
    let result = load_and_validate(dir.path().join("nope.toml"));
    assert!(matches!(result, Err(TaskdagError::IoError(_))));
    Ok(())
}
