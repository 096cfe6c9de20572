use crate::{env_or_default, ConfigError, FromEnv};
use std::path::PathBuf;

/// Local filesystem locations for uploaded images and generated receipts.
///
/// Loaded from environment variables:
/// - `UPLOAD_DIR` (default: ./data/uploads)
/// - `RECEIPT_DIR` (default: ./data/receipts)
#[derive(Clone, Debug)]
pub struct StorageConfig {
    pub upload_dir: PathBuf,
    pub receipt_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(upload_dir: impl Into<PathBuf>, receipt_dir: impl Into<PathBuf>) -> Self {
        Self {
            upload_dir: upload_dir.into(),
            receipt_dir: receipt_dir.into(),
        }
    }

    /// Path where a receipt PDF is stored for the given receipt id.
    pub fn receipt_path(&self, receipt_id: impl std::fmt::Display) -> PathBuf {
        self.receipt_dir.join(format!("receipt-{}.pdf", receipt_id))
    }
}

impl FromEnv for StorageConfig {
    fn from_env() -> Result<Self, ConfigError> {
        Ok(Self {
            upload_dir: PathBuf::from(env_or_default("UPLOAD_DIR", "./data/uploads")),
            receipt_dir: PathBuf::from(env_or_default("RECEIPT_DIR", "./data/receipts")),
        })
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("./data/uploads"),
            receipt_dir: PathBuf::from("./data/receipts"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_defaults() {
        temp_env::with_vars([("UPLOAD_DIR", None::<&str>), ("RECEIPT_DIR", None)], || {
            let config = StorageConfig::from_env().unwrap();
            assert_eq!(config.upload_dir, PathBuf::from("./data/uploads"));
            assert_eq!(config.receipt_dir, PathBuf::from("./data/receipts"));
        });
    }

    #[test]
    fn test_storage_config_custom() {
        temp_env::with_vars(
            [("UPLOAD_DIR", Some("/srv/uploads")), ("RECEIPT_DIR", Some("/srv/receipts"))],
            || {
                let config = StorageConfig::from_env().unwrap();
                assert_eq!(config.upload_dir, PathBuf::from("/srv/uploads"));
            },
        );
    }

    #[test]
    fn test_receipt_path() {
        let config = StorageConfig::default();
        let id = "0192f0c1-2345-7890-abcd-ef0123456789";
        let path = config.receipt_path(id);
        assert!(path.to_string_lossy().ends_with("receipt-0192f0c1-2345-7890-abcd-ef0123456789.pdf"));
    }
}
