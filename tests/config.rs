use std::fs;
use std::time::Duration;

use fanout::{BatchConfig, FanoutError, PoolKind, Result, DEFAULT_COUNT, DEFAULT_WAIT_TIMEOUT};
use tempfile::TempDir;

#[test]
fn defaults() {
    let config = BatchConfig::new("http://localhost:37337", DEFAULT_COUNT);
    assert_eq!(config.count, 10);
    assert_eq!(config.wait_timeout, Duration::from_secs(2));
    assert_eq!(config.concurrency_limit, None);
    assert_eq!(config.request_timeout, None);
    assert_eq!(config.pool, PoolKind::Shared);
    assert_eq!(PoolKind::default(), PoolKind::Shared);
    assert!(config.validate().is_ok());
}

#[test]
fn partial_config_file_uses_defaults() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("batch.json");
    fs::write(
        &path,
        r#"{"target": "http://127.0.0.1:8080", "count": 25, "concurrency_limit": 4, "pool": "rayon", "request_timeout": 1.5}"#,
    )?;

    let config = BatchConfig::from_file(&path)?;
    assert_eq!(config.target, "http://127.0.0.1:8080");
    assert_eq!(config.count, 25);
    assert_eq!(config.wait_timeout, DEFAULT_WAIT_TIMEOUT);
    assert_eq!(config.concurrency_limit, Some(4));
    assert_eq!(config.pool, PoolKind::Rayon);
    assert_eq!(config.request_timeout, Some(Duration::from_millis(1500)));
    Ok(())
}

#[test]
fn config_file_round_trip() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("batch.json");
    let config = BatchConfig::new("http://localhost:1", 3)
        .with_wait_timeout(Duration::from_millis(250))
        .with_concurrency_limit(2, PoolKind::Naive)
        .with_request_timeout(Duration::from_secs(1));

    fs::write(&path, serde_json::to_string(&config)?)?;
    assert_eq!(BatchConfig::from_file(&path)?, config);
    Ok(())
}

#[test]
fn invalid_values_are_rejected() -> Result<()> {
    let temp_dir = TempDir::new()?;
    let path = temp_dir.path().join("batch.json");

    fs::write(&path, r#"{"target": "x", "concurrency_limit": 0}"#)?;
    assert!(matches!(BatchConfig::from_file(&path), Err(FanoutError::Config(_))));

    fs::write(&path, r#"{"target": "x", "wait_timeout": -1}"#)?;
    assert!(matches!(BatchConfig::from_file(&path), Err(FanoutError::Serde(_))));

    let zero_wait = BatchConfig::new("x", 1).with_wait_timeout(Duration::ZERO);
    assert!(matches!(zero_wait.validate(), Err(FanoutError::Config(_))));
    Ok(())
}

#[test]
fn pool_kind_names() -> Result<()> {
    for name in PoolKind::NAMES.iter() {
        assert_eq!(name.parse::<PoolKind>()?.to_string(), *name);
    }
    assert!(matches!("threads".parse::<PoolKind>(), Err(FanoutError::Parsing(_))));
    Ok(())
}
