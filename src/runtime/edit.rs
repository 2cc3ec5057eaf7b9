//! Inline label edit channel.
//!
//! Rendered nodes hold an [`EditPublisher`] and publish save requests;
//! the editor owns the [`EditBus`] and consumes each request exactly once,
//! in arrival order.

use std::sync::Arc;

use tracing::trace;

use crate::{Result, common::Queue, events::EditRequest, graph::NodeId};

/// Capacity of the pending edit queue.
pub const EDIT_QUEUE_SIZE: usize = 1024;

pub struct EditBus {
    queue: Arc<Queue<EditRequest>>,
}

impl Default for EditBus {
    fn default() -> Self {
        Self::new(EDIT_QUEUE_SIZE)
    }
}

impl EditBus {
    pub fn new(cap: usize) -> Self {
        Self {
            queue: Queue::new(cap),
        }
    }

    /// Handle for a node component to publish through.
    pub fn publisher(&self) -> EditPublisher {
        EditPublisher {
            queue: self.queue.clone(),
        }
    }

    /// Takes every pending request, oldest first.
    pub fn drain(&self) -> Vec<EditRequest> {
        std::iter::from_fn(|| self.queue.try_next()).collect()
    }

    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[derive(Clone)]
pub struct EditPublisher {
    queue: Arc<Queue<EditRequest>>,
}

impl EditPublisher {
    pub fn publish(
        &self,
        request: EditRequest,
    ) -> Result<()> {
        trace!("edit::publish({}, {:?})", request.node_id, request.new_label);
        self.queue.send(request)
    }

    pub fn request_label(
        &self,
        node_id: impl Into<NodeId>,
        new_label: impl Into<String>,
    ) -> Result<()> {
        self.publish(EditRequest::new(node_id, new_label))
    }
}
