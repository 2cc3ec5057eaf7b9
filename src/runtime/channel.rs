use std::sync::{Arc, PoisonError, RwLock};

use crate::{
    Result, ShareLock,
    events::{Event, GraphEvent, HistoryEvent, Message, NodeEvent},
    graph::NodeId,
};

macro_rules! dispatch_event {
    ($handles:expr, $(&$item:ident), +) => {
        // handlers may register further handlers, so dispatch on a copy
        let handlers = $handles.read().unwrap_or_else(PoisonError::into_inner).clone();
        for handle in handlers.iter() {
            (handle)($(&$item),+);
        }
    };
}

pub type GraphEventHandle = Arc<dyn Fn(&Event<Message>) + Send + Sync>;

#[derive(Debug, Clone)]
pub struct ChannelOptions {
    /// use the glob pattern to match the node id
    /// eg. agent-*
    pub nid: String,
}

impl Default for ChannelOptions {
    fn default() -> Self {
        Self {
            nid: "*".to_string(),
        }
    }
}

impl ChannelOptions {
    pub fn with_nid(nid: impl Into<String>) -> Self {
        Self {
            nid: nid.into(),
        }
    }
}

/// Synchronous notification channel.
///
/// Messages are delivered to every matching handler before `emit`
/// returns, so handlers observe changes strictly in call order.
#[derive(Clone, Default)]
pub struct Channel {
    events: ShareLock<Vec<GraphEventHandle>>,
}

impl Channel {
    pub fn new() -> Self {
        Self {
            events: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub(crate) fn emit(
        &self,
        message: Message,
    ) {
        let evt = Event::new(&message);
        dispatch_event!(self.events, &evt);
    }

    fn register(
        &self,
        handle: GraphEventHandle,
    ) {
        self.events.write().unwrap_or_else(PoisonError::into_inner).push(handle);
    }

    /// number of registered handlers
    pub fn handler_count(&self) -> usize {
        self.events.read().unwrap_or_else(PoisonError::into_inner).len()
    }
}

#[derive(Clone)]
pub struct ChannelEvent {
    channel: Arc<Channel>,

    glob: globset::GlobMatcher,
}

impl ChannelEvent {
    pub fn channel(
        channel: Arc<Channel>,
        options: ChannelOptions,
    ) -> Result<Self> {
        Ok(Self {
            channel,
            glob: globset::Glob::new(&options.nid)?.compile_matcher(),
        })
    }

    /// every event whose node id matches
    pub fn on_event(
        &self,
        f: impl Fn(&Event<Message>) + Send + Sync + 'static,
    ) {
        let glob = self.glob.clone();

        self.channel.register(Arc::new(move |e| {
            if is_match(&glob, e) {
                f(e);
            }
        }));
    }

    /// node events for matching node ids
    pub fn on_node(
        &self,
        f: impl Fn(&NodeId, &NodeEvent) + Send + Sync + 'static,
    ) {
        let glob = self.glob.clone();

        self.channel.register(Arc::new(move |e| {
            if let GraphEvent::Node(event) = &e.event {
                if is_match(&glob, e) {
                    f(&e.nid, event);
                }
            }
        }));
    }

    /// history movements, regardless of the node pattern
    pub fn on_history(
        &self,
        f: impl Fn(&HistoryEvent) + Send + Sync + 'static,
    ) {
        self.channel.register(Arc::new(move |e| {
            if let GraphEvent::History(event) = &e.event {
                f(event);
            }
        }));
    }
}

fn is_match(
    glob: &globset::GlobMatcher,
    e: &Event<Message>,
) -> bool {
    glob.is_match(&e.nid)
}
