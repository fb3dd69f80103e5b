//! Path management for Fatura
//!
//! ## Path Resolution Order
//!
//! 1. `FATURA_DATA_DIR` environment variable (if set)
//! 2. The platform config directory from `directories`
//!    (`~/.config/fatura` on Linux, `~/Library/Application Support/fatura`
//!    on macOS, `%APPDATA%\fatura\config` on Windows)

use std::path::PathBuf;

use directories::ProjectDirs;

use crate::error::FaturaError;

/// Environment variable that overrides the base directory
pub const DATA_DIR_ENV: &str = "FATURA_DATA_DIR";

/// Manages all paths used by Fatura
#[derive(Debug, Clone)]
pub struct FaturaPaths {
    base_dir: PathBuf,
}

impl FaturaPaths {
    /// Resolve the base directory from the environment or the platform default
    ///
    /// # Errors
    ///
    /// Returns an error if no home directory can be determined.
    pub fn new() -> Result<Self, FaturaError> {
        let base_dir = match std::env::var(DATA_DIR_ENV) {
            Ok(custom) if !custom.trim().is_empty() => PathBuf::from(custom),
            _ => ProjectDirs::from("", "", "fatura")
                .map(|dirs| dirs.config_dir().to_path_buf())
                .ok_or_else(|| {
                    FaturaError::Config("Could not determine a home directory".into())
                })?,
        };

        Ok(Self { base_dir })
    }

    /// Create paths under a custom base directory (useful for testing)
    pub fn with_base_dir(base_dir: PathBuf) -> Self {
        Self { base_dir }
    }

    pub fn base_dir(&self) -> &PathBuf {
        &self.base_dir
    }

    /// Directory holding the JSON record files
    pub fn data_dir(&self) -> PathBuf {
        self.base_dir.join("data")
    }

    pub fn settings_file(&self) -> PathBuf {
        self.base_dir.join("config.json")
    }

    pub fn audit_log(&self) -> PathBuf {
        self.base_dir.join("audit.log")
    }

    pub fn cards_file(&self) -> PathBuf {
        self.data_dir().join("cards.json")
    }

    pub fn purchases_file(&self) -> PathBuf {
        self.data_dir().join("purchases.json")
    }

    pub fn installments_file(&self) -> PathBuf {
        self.data_dir().join("installments.json")
    }

    pub fn paid_invoices_file(&self) -> PathBuf {
        self.data_dir().join("paid_invoices.json")
    }

    pub fn recurring_file(&self) -> PathBuf {
        self.data_dir().join("recurring.json")
    }

    /// Ensure the base and data directories exist
    pub fn ensure_directories(&self) -> Result<(), FaturaError> {
        std::fs::create_dir_all(&self.base_dir)
            .map_err(|e| FaturaError::Io(format!("Failed to create base directory: {}", e)))?;

        std::fs::create_dir_all(self.data_dir())
            .map_err(|e| FaturaError::Io(format!("Failed to create data directory: {}", e)))?;

        Ok(())
    }

    /// Check if Fatura has been initialized (config file exists)
    pub fn is_initialized(&self) -> bool {
        self.settings_file().exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_custom_base_dir() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FaturaPaths::with_base_dir(temp_dir.path().to_path_buf());

        assert_eq!(paths.base_dir(), temp_dir.path());
        assert_eq!(paths.data_dir(), temp_dir.path().join("data"));
        assert_eq!(
            paths.paid_invoices_file(),
            temp_dir.path().join("data").join("paid_invoices.json")
        );
    }

    #[test]
    fn test_env_var_override() {
        let temp_dir = TempDir::new().unwrap();
        std::env::set_var(DATA_DIR_ENV, temp_dir.path());

        let paths = FaturaPaths::new().unwrap();
        assert_eq!(paths.base_dir(), temp_dir.path());

        std::env::remove_var(DATA_DIR_ENV);
    }

    #[test]
    fn test_ensure_directories() {
        let temp_dir = TempDir::new().unwrap();
        let paths = FaturaPaths::with_base_dir(temp_dir.path().join("nested"));

        paths.ensure_directories().unwrap();
        assert!(paths.data_dir().exists());
        assert!(!paths.is_initialized());
    }
}
