//! Command registry
//!
//! Stores the command plugins and resolves a chat command name to the plugin
//! that handles it. Names are matched case-insensitively.

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::reply::ReplySink;

/// A chat command handler hosted by the bot
#[async_trait]
pub trait CommandPlugin: Send + Sync {
    /// Stable plugin identifier
    fn name(&self) -> &str;

    /// Command names (without the leading `/`) this plugin answers
    fn commands(&self) -> Vec<&str>;

    /// One-line usage shown by `/help`
    fn usage(&self) -> String;

    /// Handle one invocation; failures must be reported through `replies`
    async fn handle(&self, args: &str, replies: &ReplySink);
}

pub struct CommandRegistry {
    /// Lowercased command name to plugin
    commands: BTreeMap<String, Arc<dyn CommandPlugin>>,
    /// Registration order, for help output
    plugins: Vec<Arc<dyn CommandPlugin>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: BTreeMap::new(),
            plugins: Vec::new(),
        }
    }

    /// Register a plugin under all of its command names
    ///
    /// # Errors
    /// Returns an error if any of its names is already taken; the registry is
    /// left unchanged in that case.
    pub fn register(&mut self, plugin: Arc<dyn CommandPlugin>) -> Result<(), anyhow::Error> {
        let names: Vec<String> = plugin
            .commands()
            .into_iter()
            .map(|name| name.to_lowercase())
            .collect();

        for name in &names {
            if let Some(existing) = self.commands.get(name) {
                return Err(
                    anyhow::anyhow!(
                        "Command /{} is already registered by {}",
                        name,
                        existing.name()
                    )
                );
            }
        }

        crate::log_info!("Registered plugin '{}' for /{}", plugin.name(), names.join(", /"));

        for name in names {
            self.commands.insert(name, plugin.clone());
        }
        self.plugins.push(plugin);
        Ok(())
    }

    pub fn get(&self, command: &str) -> Option<Arc<dyn CommandPlugin>> {
        self.commands.get(&command.to_lowercase()).cloned()
    }

    pub fn plugins(&self) -> &[Arc<dyn CommandPlugin>] {
        &self.plugins
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}
