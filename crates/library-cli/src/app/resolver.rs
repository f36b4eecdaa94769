//! Path resolution for the config file and data directory.

use std::path::{Path, PathBuf};

use crate::config::{default_config_path, default_data_dir, LibraryConfig};

/// Resolve the config file path, checking LIBRARY_CONFIG env var first.
pub fn resolve_config_path() -> anyhow::Result<PathBuf> {
    if let Ok(value) = std::env::var("LIBRARY_CONFIG") {
        if !value.trim().is_empty() {
            return Ok(PathBuf::from(value));
        }
    }
    default_config_path()
}

/// Resolve the data directory: flag or env first, then config, then the XDG
/// default.
pub fn resolve_data_dir(flag: Option<&Path>, config: &LibraryConfig) -> anyhow::Result<PathBuf> {
    if let Some(path) = flag {
        return Ok(path.to_path_buf());
    }
    if let Some(path) = config.library.data_dir.as_deref() {
        if !path.trim().is_empty() {
            return Ok(PathBuf::from(path));
        }
    }
    default_data_dir()
}

/// Error message when the data directory does not exist yet.
pub fn missing_library_message(data_dir: &Path) -> String {
    format!(
        "No library found at {}\n\nRun:\n  library init\n\nOr point at an existing one:\n  LIBRARY_DATA_DIR=/path/to/library library shell",
        data_dir.display()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flag_wins_over_config() {
        let config = LibraryConfig::new(PathBuf::from("/from/config"), 14);
        let resolved = resolve_data_dir(Some(Path::new("/from/flag")), &config).unwrap();
        assert_eq!(resolved, PathBuf::from("/from/flag"));
    }

    #[test]
    fn test_config_used_without_flag() {
        let config = LibraryConfig::new(PathBuf::from("/from/config"), 14);
        let resolved = resolve_data_dir(None, &config).unwrap();
        assert_eq!(resolved, PathBuf::from("/from/config"));
    }

    #[test]
    fn test_missing_message_names_directory() {
        let message = missing_library_message(Path::new("/srv/library"));
        assert!(message.contains("/srv/library"));
        assert!(message.contains("library init"));
    }
}
