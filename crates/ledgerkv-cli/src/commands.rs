//! Subcommand implementations.

use anyhow::{Context, Result};
use ledgerkv::{LogStore, StorageEngine};
use ledgerkv_io::MonolithicBackend;

pub fn set(path: &str, key: &str, value: &str) -> Result<()> {
    let mut store = open(path)?;
    store
        .set(key.as_bytes(), value.as_bytes())
        .with_context(|| format!("failed to set key {key:?}"))?;
    Ok(())
}

pub fn get(path: &str, key: &str) -> Result<()> {
    let mut store = open(path)?;
    let value = store
        .get(key.as_bytes())
        .with_context(|| format!("failed to get key {key:?}"))?;
    println!("{}", String::from_utf8_lossy(&value));
    Ok(())
}

pub fn delete(path: &str, key: &str) -> Result<()> {
    let mut store = open(path)?;
    store
        .delete(key.as_bytes())
        .with_context(|| format!("failed to delete key {key:?}"))?;
    Ok(())
}

pub fn stats(path: &str) -> Result<()> {
    let store = open(path)?;
    println!("keys: {}", store.len());
    println!("log size: {} bytes", store.log_size()?);
    Ok(())
}

fn open(path: &str) -> Result<LogStore<MonolithicBackend>> {
    LogStore::open_path(path).with_context(|| format!("failed to open log file {path:?}"))
}
