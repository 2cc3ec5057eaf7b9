use std::sync::Arc;

use crate::{Config, Editor, GraphEditError, Result, registry::NodeTypeRegistry, runtime::Channel};

#[derive(Default)]
pub struct EditorBuilder {
    config: Config,
    name: Option<String>,
    framework: Option<String>,
    registry: Option<Arc<NodeTypeRegistry>>,
    channel: Option<Arc<Channel>>,
}

impl EditorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Base configuration. Explicit builder settings take precedence.
    pub fn config(
        mut self,
        config: Config,
    ) -> Self {
        self.config = config;
        self
    }

    pub fn name(
        mut self,
        name: impl Into<String>,
    ) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn framework(
        mut self,
        framework: impl Into<String>,
    ) -> Self {
        self.framework = Some(framework.into());
        self
    }

    pub fn history_capacity(
        mut self,
        n: usize,
    ) -> Self {
        self.config.history_capacity = n;
        self
    }

    pub fn registry(
        mut self,
        registry: NodeTypeRegistry,
    ) -> Self {
        self.registry = Some(Arc::new(registry));
        self
    }

    /// Shares an existing notification channel instead of creating one.
    pub fn channel(
        mut self,
        channel: Arc<Channel>,
    ) -> Self {
        self.channel = Some(channel);
        self
    }

    pub fn build(&self) -> Result<Editor> {
        if self.config.history_capacity == 0 {
            return Err(GraphEditError::Config("history_capacity must be at least 1".into()));
        }

        let name = self.name.clone().unwrap_or_else(|| self.config.default_name.clone());
        let framework = self.framework.clone().unwrap_or_else(|| self.config.default_framework.clone());
        let registry = self.registry.clone().unwrap_or_else(|| Arc::new(NodeTypeRegistry::builtin()));
        let channel = self.channel.clone().unwrap_or_default();

        Ok(Editor::new(name, framework, self.config.history_capacity, registry, channel))
    }
}
