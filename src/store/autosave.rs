use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::{
    Result,
    codec::{self, WorkflowDocument},
    store::KvStore,
    utils,
};

/// Key of the most-recently-saved index.
pub const RECENT_WORKFLOWS_KEY: &str = "recent-workflows";

/// Default number of documents kept in the recent index.
pub const DEFAULT_RECENT_LIMIT: usize = 10;

/// Key a workflow document is autosaved under.
pub fn workflow_key(name: &str) -> String {
    format!("workflow-{}", name)
}

/// Entry of the recent index: the saved document plus when it was saved.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct RecentWorkflow {
    #[serde(flatten)]
    pub document: WorkflowDocument,
    /// save time in milliseconds
    pub saved_at: i64,
}

pub struct Autosave<S> {
    kv: S,
    recent_limit: usize,
}

impl<S: KvStore> Autosave<S> {
    pub fn new(kv: S) -> Self {
        Self::with_recent_limit(kv, DEFAULT_RECENT_LIMIT)
    }

    pub fn with_recent_limit(
        kv: S,
        recent_limit: usize,
    ) -> Self {
        Self {
            kv,
            recent_limit,
        }
    }

    pub fn kv(&self) -> &S {
        &self.kv
    }

    /// Writes `doc` under `workflow-<name>` and moves it to the front of
    /// the recent index, replacing any older entry with the same name.
    pub fn save(
        &self,
        doc: &WorkflowDocument,
    ) -> Result<()> {
        debug!("autosave::save({})", doc.name);
        self.kv.set(&workflow_key(&doc.name), &codec::to_json(doc)?)?;

        let mut recent = self.recent()?;
        recent.retain(|r| r.document.name != doc.name);
        recent.insert(
            0,
            RecentWorkflow {
                document: doc.clone(),
                saved_at: utils::time::time_millis(),
            },
        );
        recent.truncate(self.recent_limit);
        self.write_recent(&recent)
    }

    /// Reads the document saved as `name`, if any.
    pub fn load(
        &self,
        name: &str,
    ) -> Result<Option<WorkflowDocument>> {
        match self.kv.get(&workflow_key(name))? {
            Some(text) => Ok(Some(codec::from_json(&text)?)),
            None => Ok(None),
        }
    }

    /// Deletes the document saved as `name` and its recent entry.
    pub fn remove(
        &self,
        name: &str,
    ) -> Result<()> {
        self.kv.remove(&workflow_key(name))?;

        let mut recent = self.recent()?;
        let before = recent.len();
        recent.retain(|r| r.document.name != name);
        if recent.len() != before {
            self.write_recent(&recent)?;
        }
        Ok(())
    }

    /// Recently saved documents, newest first. An unreadable index reads
    /// as empty.
    pub fn recent(&self) -> Result<Vec<RecentWorkflow>> {
        let Some(text) = self.kv.get(RECENT_WORKFLOWS_KEY)? else {
            return Ok(Vec::new());
        };
        match serde_json::from_str::<Vec<RecentWorkflow>>(&text) {
            Ok(recent) => Ok(recent),
            Err(e) => {
                warn!("autosave: ignoring unreadable recent index: {}", e);
                Ok(Vec::new())
            }
        }
    }

    fn write_recent(
        &self,
        recent: &[RecentWorkflow],
    ) -> Result<()> {
        self.kv.set(RECENT_WORKFLOWS_KEY, &serde_json::to_string(recent)?)
    }
}
