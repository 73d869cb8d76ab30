use anyhow::{Context, Result};
use genie_client::{ClientConfig, DEFAULT_BASE_URL};
use genie_core::{ExtraKeywords, KeywordRules, TaskAssembler};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::time::Duration;

use crate::state::config_path;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub api: ApiSection,
    pub display: DisplaySection,
    /// Extra inference keywords, appended to the built-in groups.
    #[serde(skip_serializing_if = "ExtraKeywords::is_empty")]
    pub keywords: ExtraKeywords,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiSection {
    pub base_url: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySection {
    /// IANA timezone used to decide what "today" and "overdue" mean.
    pub timezone: String,
}

impl Default for ApiSection {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for DisplaySection {
    fn default() -> Self {
        Self {
            timezone: "UTC".to_string(),
        }
    }
}

impl Config {
    pub fn client_config(&self) -> ClientConfig {
        ClientConfig {
            base_url: self.api.base_url.clone(),
            timeout: Duration::from_secs(self.api.timeout_secs.max(1)),
        }
    }

    pub fn assembler(&self) -> TaskAssembler {
        TaskAssembler::new(KeywordRules::default().with_extra(&self.keywords))
    }
}

pub fn load_config() -> Result<Config> {
    load_config_from(&config_path()?)
}

pub fn load_config_from(p: &Path) -> Result<Config> {
    if !p.exists() {
        return Ok(Config::default());
    }
    let s = fs::read_to_string(p).with_context(|| format!("read {}", p.display()))?;
    let cfg: Config = toml::from_str(&s).with_context(|| format!("parse {}", p.display()))?;
    genie_core::time::parse_tz(&cfg.display.timezone)
        .with_context(|| format!("check display.timezone in {}", p.display()))?;
    Ok(cfg)
}

pub fn save_config(cfg: &Config) -> Result<()> {
    let p = config_path()?;
    let s = toml::to_string_pretty(cfg).context("serialize config")?;
    fs::write(&p, s).with_context(|| format!("write {}", p.display()))?;
    Ok(())
}

pub fn init_config() -> Result<()> {
    let p = config_path()?;
    if p.exists() {
        println!("Config already exists: {}", p.display());
        return Ok(());
    }
    save_config(&Config::default())?;
    println!("Wrote {}", p.display());
    Ok(())
}

pub fn show_config() -> Result<()> {
    let p = config_path()?;
    let cfg = load_config()?;
    let source = if p.exists() { "file" } else { "defaults" };
    println!("# {} ({source})", p.display());
    print!("{}", toml::to_string_pretty(&cfg).context("serialize config")?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tmp_file(name: &str, contents: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("genie-config-{}-{name}", std::process::id()));
        fs::create_dir_all(&dir).unwrap();
        let p = dir.join("config.toml");
        fs::write(&p, contents).unwrap();
        p
    }

    #[test]
    fn test_missing_file_uses_defaults() {
        let cfg = load_config_from(Path::new("/nonexistent/genie/config.toml")).unwrap();
        assert_eq!(cfg.api.base_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.api.timeout_secs, 30);
        assert!(cfg.keywords.is_empty());
    }

    #[test]
    fn test_partial_file() {
        let p = tmp_file(
            "partial",
            "[api]\nbase_url = \"https://genie.example.com/api\"\n\n[keywords]\nhealth = [\"dentist\"]\n",
        );
        let cfg = load_config_from(&p).unwrap();
        assert_eq!(cfg.api.base_url, "https://genie.example.com/api");
        assert_eq!(cfg.api.timeout_secs, 30);
        assert_eq!(cfg.display.timezone, "UTC");
        assert_eq!(cfg.keywords.health, vec!["dentist".to_string()]);
    }

    #[test]
    fn test_bad_timezone_rejected() {
        let p = tmp_file("tz", "[display]\ntimezone = \"Nowhere/Land\"\n");
        assert!(load_config_from(&p).is_err());
    }

    #[test]
    fn test_roundtrip_default() {
        let s = toml::to_string_pretty(&Config::default()).unwrap();
        let back: Config = toml::from_str(&s).unwrap();
        assert_eq!(back.api.base_url, DEFAULT_BASE_URL);
    }
}
