use anyhow::{Context, Result};
use std::fs;
use std::path::PathBuf;

/// `$TASKGENIE_HOME`, else `~/.taskgenie`.
pub fn genie_home() -> Result<PathBuf> {
    if let Some(dir) = std::env::var_os("TASKGENIE_HOME").filter(|v| !v.is_empty()) {
        return Ok(PathBuf::from(dir));
    }
    let home = std::env::var("HOME").context("HOME is not set")?;
    Ok(PathBuf::from(home).join(".taskgenie"))
}

pub fn ensure_genie_home() -> Result<PathBuf> {
    let dir = genie_home()?;
    fs::create_dir_all(&dir).with_context(|| format!("create {}", dir.display()))?;
    Ok(dir)
}

pub fn session_path() -> Result<PathBuf> {
    Ok(ensure_genie_home()?.join("session.json"))
}

pub fn config_path() -> Result<PathBuf> {
    Ok(ensure_genie_home()?.join("config.toml"))
}
