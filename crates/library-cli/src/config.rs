use std::path::{Path, PathBuf};

use library_core::DEFAULT_LOAN_PERIOD_DAYS;
use serde::{Deserialize, Serialize};

use crate::constants::DEFAULT_FREQUENT_BORROWER_THRESHOLD;

/// Contents of `config.toml`. Every section is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibraryConfig {
    #[serde(default)]
    pub library: LibrarySection,
    #[serde(default)]
    pub loans: LoansSection,
    #[serde(default)]
    pub reports: ReportsSection,
    #[serde(default)]
    pub ui: UiSection,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LibrarySection {
    pub data_dir: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoansSection {
    #[serde(default = "default_period_days")]
    pub period_days: u32,
}

impl Default for LoansSection {
    fn default() -> Self {
        Self {
            period_days: DEFAULT_LOAN_PERIOD_DAYS,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportsSection {
    #[serde(default = "default_threshold")]
    pub frequent_borrower_threshold: u32,
}

impl Default for ReportsSection {
    fn default() -> Self {
        Self {
            frequent_borrower_threshold: DEFAULT_FREQUENT_BORROWER_THRESHOLD,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UiSection {
    #[serde(default)]
    pub ascii: bool,
}

fn default_period_days() -> u32 {
    DEFAULT_LOAN_PERIOD_DAYS
}

fn default_threshold() -> u32 {
    DEFAULT_FREQUENT_BORROWER_THRESHOLD
}

impl LibraryConfig {
    pub fn new(data_dir: PathBuf, period_days: u32) -> Self {
        Self {
            library: LibrarySection {
                data_dir: Some(data_dir.to_string_lossy().to_string()),
            },
            loans: LoansSection { period_days },
            ..Self::default()
        }
    }
}

pub fn default_config_path() -> anyhow::Result<PathBuf> {
    Ok(xdg_config_dir()?.join("config.toml"))
}

pub fn default_data_dir() -> anyhow::Result<PathBuf> {
    xdg_data_dir()
}

pub fn read_config(path: &Path) -> anyhow::Result<LibraryConfig> {
    let contents = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read config {}: {}", path.display(), e))?;
    toml::from_str(&contents)
        .map_err(|e| anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e))
}

pub fn write_config(path: &Path, config: &LibraryConfig) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {}",
                parent.display(),
                e
            )
        })?;
    }
    let contents =
        toml::to_string_pretty(config).map_err(|e| anyhow::anyhow!("TOML error: {}", e))?;
    std::fs::write(path, contents)
        .map_err(|e| anyhow::anyhow!("Failed to write config {}: {}", path.display(), e))?;
    Ok(())
}

pub fn xdg_config_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_CONFIG_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("library"));
        }
    }
    Ok(home_dir()?.join(".config").join("library"))
}

pub fn xdg_data_dir() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("XDG_DATA_HOME") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value).join("library"));
        }
    }
    Ok(home_dir()?.join(".local").join("share").join("library"))
}

fn home_dir() -> anyhow::Result<PathBuf> {
    let home = std::env::var("HOME")
        .map_err(|_| anyhow::anyhow!("HOME is not set; cannot resolve default paths"))?;
    Ok(PathBuf::from(home))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: LibraryConfig = toml::from_str("").unwrap();
        assert_eq!(config.loans.period_days, 14);
        assert_eq!(config.reports.frequent_borrower_threshold, 3);
        assert!(config.library.data_dir.is_none());
        assert!(!config.ui.ascii);
    }

    #[test]
    fn test_partial_sections() {
        let config: LibraryConfig = toml::from_str("[loans]\nperiod_days = 21\n").unwrap();
        assert_eq!(config.loans.period_days, 21);
        assert_eq!(config.reports, ReportsSection::default());
    }

    #[test]
    fn test_write_then_read() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = LibraryConfig::new(PathBuf::from("/srv/library"), 7);

        write_config(&path, &config).unwrap();

        assert_eq!(read_config(&path).unwrap(), config);
    }

    #[test]
    fn test_unparsable_config_names_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[loans]\nperiod_days = \"soon\"\n").unwrap();

        let err = read_config(&path).unwrap_err();

        assert!(err.to_string().contains("config.toml"));
    }
}
