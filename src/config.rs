// used to read a separate config file with environment overrides
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::error::Result;
use crate::persist::PersistenceMode;

/// Library configuration. Hosts usually get by with the defaults; a
/// `lumetric.toml` next to the binary or `LUMETRIC_*` environment variables
/// override them.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Path of the SQLite file backing the persistence layer. `None` keeps
    /// everything in memory, which only makes sense for tests.
    pub storage_path: Option<String>,
    /// Sent as the `mp_lib` reserved field on every event.
    pub library_tag: String,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            storage_path: None,
            library_tag: String::from("lumetric"),
        }
    }
}

impl TrackerConfig {
    pub fn load() -> Result<TrackerConfig> {
        let settings = Config::builder()
            .add_source(File::with_name("lumetric").required(false))
            .add_source(Environment::with_prefix("LUMETRIC"))
            .build()?;
        Ok(settings.try_deserialize()?)
    }

    pub fn persistence_mode(&self) -> PersistenceMode {
        match &self.storage_path {
            Some(path) => PersistenceMode::File(path.clone()),
            None => PersistenceMode::InMemory,
        }
    }
}

/// Device metadata attached to every event. Collecting it is the host's job;
/// the engine only merges whatever the host hands over. Absent fields show up
/// as `"UNKNOWN"` on outgoing records.
#[derive(Debug, Clone, Default)]
pub struct DeviceInfo {
    /// Fallback distinct id used by `track` while no events identity is set.
    pub device_id: Option<String>,
    pub carrier: Option<String>,
    pub model: Option<String>,
    pub os_version: Option<String>,
}
