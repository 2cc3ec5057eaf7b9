use std::{fs, path::Path, path::PathBuf};

use serde::Deserialize;

use crate::{
    GraphEditError, Result,
    codec::DEFAULT_WORKFLOW_NAME,
    history::DEFAULT_HISTORY_CAPACITY,
    registry::FALLBACK_FRAMEWORK,
    store::{Autosave, DEFAULT_RECENT_LIMIT, FileKv, KvStore, MemKv},
};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// number of snapshots kept for undo/redo, defaults to 50
    pub history_capacity: usize,
    /// number of documents kept in the recent index, defaults to 10
    pub recent_limit: usize,
    /// name of a new workflow
    pub default_name: String,
    /// framework whose palette a new editor shows
    pub default_framework: String,
    /// autosave config
    pub autosave: AutosaveConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AutosaveConfig {
    /// store type
    #[serde(default)]
    pub store_type: StoreType,
    /// directory for the file store
    pub dir: Option<PathBuf>,
}

#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum StoreType {
    #[default]
    Mem,
    File,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            history_capacity: DEFAULT_HISTORY_CAPACITY,
            recent_limit: DEFAULT_RECENT_LIMIT,
            default_name: DEFAULT_WORKFLOW_NAME.to_string(),
            default_framework: FALLBACK_FRAMEWORK.to_string(),
            autosave: AutosaveConfig::default(),
        }
    }
}

impl Config {
    pub fn create<T: AsRef<Path>>(path: T) -> Result<Self> {
        let data = fs::read_to_string(path.as_ref()).map_err(|e| GraphEditError::Config(format!("failed to load config file {:?}: {}", path.as_ref(), e)))?;

        Self::load_from_str(data.as_str())
    }

    pub fn load_from_str(toml_str: &str) -> Result<Self> {
        let config = toml::from_str::<Config>(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Opens the configured autosave backend.
    pub fn open_autosave(&self) -> Result<Autosave<Box<dyn KvStore>>> {
        let kv: Box<dyn KvStore> = match self.autosave.store_type {
            StoreType::Mem => Box::new(MemKv::new()),
            StoreType::File => {
                let dir = self.autosave.dir.as_ref().ok_or(GraphEditError::Config("autosave.dir is required when store_type is file".into()))?;
                Box::new(FileKv::open(dir)?)
            }
        };
        Ok(Autosave::with_recent_limit(kv, self.recent_limit))
    }

    fn validate(&self) -> Result<()> {
        if self.history_capacity == 0 {
            return Err(GraphEditError::Config("history_capacity must be at least 1".into()));
        }
        if self.autosave.store_type == StoreType::File && self.autosave.dir.is_none() {
            return Err(GraphEditError::Config("autosave.dir is required when store_type is file".into()));
        }
        Ok(())
    }
}
