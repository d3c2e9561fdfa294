use std::path::PathBuf;

use serde::Deserialize;
use serde::Serialize;

use super::invalid;
use crate::Result;

/// Location of the persistent (sled) store
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct StorageConfig {
    /// Root directory of the sled database
    #[serde(default = "default_db_root_dir")]
    pub db_root_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_root_dir: default_db_root_dir(),
        }
    }
}

impl StorageConfig {
    /// The directory is created when missing and must be writable
    pub fn validate(&self) -> Result<()> {
        if self.db_root_dir.as_os_str().is_empty() {
            return Err(invalid("storage.db_root_dir cannot be empty"));
        }

        #[cfg(not(test))]
        {
            let dir = &self.db_root_dir;
            std::fs::create_dir_all(dir)
                .map_err(|e| invalid(format!("cannot create storage.db_root_dir {}: {e}", dir.display())))?;
            let metadata = std::fs::metadata(dir)
                .map_err(|e| invalid(format!("cannot inspect storage.db_root_dir {}: {e}", dir.display())))?;
            if metadata.permissions().readonly() {
                return Err(invalid(format!("storage.db_root_dir {} is read-only", dir.display())));
            }
        }

        Ok(())
    }
}

fn default_db_root_dir() -> PathBuf {
    PathBuf::from("./db")
}
