//! Locating and reading the TOML configuration file.

use super::file::ConfigFile;
use crate::core::error::{AppError, Result};
use std::fs;
use std::path::{Path, PathBuf};

const LOCAL_CONFIG_NAME: &str = "email-verifier.toml";

/// Returns the first configuration file that exists.
///
/// An explicit path must exist; the implicit locations (`./email-verifier.toml`,
/// then `$HOME/.config/email-verifier/config.toml`) are optional.
pub fn find_config_file(explicit: Option<&Path>) -> Result<Option<PathBuf>> {
    if let Some(path) = explicit {
        if path.is_file() {
            return Ok(Some(path.to_path_buf()));
        }
        return Err(AppError::Config(format!(
            "Config file '{}' not found",
            path.display()
        )));
    }

    let mut candidates = vec![PathBuf::from(LOCAL_CONFIG_NAME)];
    if let Ok(home) = std::env::var("HOME") {
        candidates.push(
            PathBuf::from(home)
                .join(".config")
                .join("email-verifier")
                .join("config.toml"),
        );
    }

    Ok(candidates.into_iter().find(|p| p.is_file()))
}

/// Reads and parses a configuration file.
pub fn load_config_file(path: &Path) -> Result<ConfigFile> {
    tracing::info!("Loading configuration from {}", path.display());
    let content = fs::read_to_string(path)?;
    let file: ConfigFile = toml::from_str(&content)?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_explicit_path_is_an_error() {
        let result = find_config_file(Some(Path::new("/definitely/not/here.toml")));
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn loads_file_from_disk() {
        let path = std::env::temp_dir().join(format!(
            "email-verifier-test-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "[verification]\ncatch_all_check_enabled = true\n").unwrap();

        let found = find_config_file(Some(&path)).unwrap();
        assert_eq!(found.as_deref(), Some(path.as_path()));
        let file = load_config_file(&path).unwrap();
        assert_eq!(file.verification.catch_all_check_enabled, Some(true));

        fs::remove_file(&path).ok();
    }

    #[test]
    fn malformed_file_reports_toml_error() {
        let path = std::env::temp_dir().join(format!(
            "email-verifier-bad-{}.toml",
            std::process::id()
        ));
        fs::write(&path, "[smtp\n").unwrap();
        assert!(matches!(load_config_file(&path), Err(AppError::Toml(_))));
        fs::remove_file(&path).ok();
    }
}
