//! Watch node configuration.
mod storage;
mod watch;
pub use storage::*;
pub use watch::*;

#[cfg(test)]
mod config_test;

use std::env;

use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use serde::Serialize;

use crate::Error;
use crate::Result;

/// Settings of a watch node, loaded in layers: type defaults, then the TOML
/// file named by `CONFIG_PATH`, then `LRP__*` environment variables
/// (e.g. `LRP__WATCH__EVENT_BUFFER_SIZE=128`).
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct WatchNodeConfig {
    #[serde(default)]
    pub watch: WatchConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl WatchNodeConfig {
    /// Load without validation; call [`validate`](Self::validate) before use.
    pub fn new() -> Result<Self> {
        let config_path = env::var("CONFIG_PATH").ok();
        Self::load(&Self::default(), config_path.as_deref())
    }

    /// Layer the file at `path` over `self`. Environment variables still win.
    pub fn with_override_config(
        &self,
        path: &str,
    ) -> Result<Self> {
        Self::load(self, Some(path))
    }

    pub fn validate(self) -> Result<Self> {
        self.watch.validate()?;
        self.storage.validate()?;
        Ok(self)
    }

    fn load(
        base: &Self,
        path: Option<&str>,
    ) -> Result<Self> {
        let mut builder = Config::builder().add_source(Config::try_from(base)?);
        if let Some(path) = path {
            builder = builder.add_source(File::with_name(path));
        }
        let config = builder
            .add_source(
                Environment::with_prefix("LRP")
                    .separator("__")
                    .ignore_empty(true)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()?;
        Ok(config)
    }
}

fn invalid(message: impl Into<String>) -> Error {
    Error::Config(ConfigError::Message(message.into()))
}
