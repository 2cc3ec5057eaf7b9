use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

use crate::{Result, ShareLock, store::KvStore};

/// Process-local key-value store. Entries live until removed.
#[derive(Debug, Clone, Default)]
pub struct MemKv {
    entries: ShareLock<HashMap<String, String>>,
}

impl MemKv {
    pub fn new() -> Self {
        Self {
            entries: Arc::new(RwLock::new(HashMap::new())),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KvStore for MemKv {
    fn get(
        &self,
        key: &str,
    ) -> Result<Option<String>> {
        Ok(self.entries.read().unwrap_or_else(PoisonError::into_inner).get(key).cloned())
    }

    fn set(
        &self,
        key: &str,
        value: &str,
    ) -> Result<()> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(
        &self,
        key: &str,
    ) -> Result<()> {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).remove(key);
        Ok(())
    }
}
