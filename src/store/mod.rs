//! Host-local persistence for autosaved workflows.
//!
//! Provides an abstraction over different storage backends:
//! - `MemKv`: In-memory storage for testing and ephemeral hosts
//! - `FileKv`: One JSON file per key in a directory

mod autosave;
mod db;

use std::error::Error;

use crate::{GraphEditError, Result};

pub use autosave::{Autosave, DEFAULT_RECENT_LIMIT, RECENT_WORKFLOWS_KEY, RecentWorkflow, workflow_key};
pub use db::{FileKv, MemKv};

/// Maps backend errors to GraphEditError.
fn map_db_err(err: impl Error) -> GraphEditError {
    GraphEditError::Store(err.to_string())
}

/// String key-value storage provided by the host.
pub trait KvStore {
    /// Reads the value stored under `key`.
    fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>>;

    /// Writes `value` under `key`, replacing any previous value.
    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> Result<()>;

    /// Deletes `key`. Deleting a missing key is not an error.
    fn remove(
        &self,
        key: &str,
    ) -> Result<()>;
}

impl<T: KvStore + ?Sized> KvStore for Box<T> {
    fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>> {
        (**self).get(key)
    }

    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> Result<()> {
        (**self).set(key, value)
    }

    fn remove(
        &self,
        key: &str,
    ) -> Result<()> {
        (**self).remove(key)
    }
}
