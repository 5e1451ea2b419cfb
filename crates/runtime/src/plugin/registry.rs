//! Ordered plugin registry shared by every lifecycle operation.

use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, warn};

use super::PluginDefinition;
use crate::config::RuntimeConfig;
use crate::error::{HookKind, PluginError, Result};

/// Effective plugin list: built-ins first, then caller-supplied plugins.
///
/// The order is fixed at construction and is the iteration order of every
/// lifecycle call. A user plugin can therefore rely on built-in data being
/// initialized before its own hooks run.
pub struct PluginRegistry<G> {
    plugins: Arc<[PluginDefinition<G>]>,
    builtin_count: usize,
}

impl<G> PluginRegistry<G> {
    /// Creates a registry from an explicit built-in list and user plugins.
    pub fn new(
        builtins: Vec<PluginDefinition<G>>,
        user: Vec<PluginDefinition<G>>,
        config: &RuntimeConfig,
    ) -> Result<Self> {
        let builtin_count = builtins.len();
        let plugins: Vec<_> = builtins.into_iter().chain(user).collect();

        let mut seen = HashSet::with_capacity(plugins.len());
        for plugin in &plugins {
            if seen.insert(plugin.name()) {
                continue;
            }
            if config.reject_duplicate_names {
                return Err(PluginError::DuplicatePlugin {
                    name: plugin.name().to_owned(),
                });
            }
            warn!(
                target: "runtime::plugins",
                plugin = plugin.name(),
                "Duplicate plugin name accepted; actions will reach every match"
            );
        }

        debug!(
            target: "runtime::plugins",
            builtins = builtin_count,
            user = plugins.len() - builtin_count,
            "Plugin registry built"
        );

        Ok(Self {
            plugins: plugins.into(),
            builtin_count,
        })
    }

    /// Creates a registry with no built-ins.
    pub fn from_plugins(user: Vec<PluginDefinition<G>>, config: &RuntimeConfig) -> Result<Self> {
        Self::new(Vec::new(), user, config)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PluginDefinition<G>> {
        self.plugins.iter()
    }

    pub fn as_slice(&self) -> &[PluginDefinition<G>] {
        &self.plugins
    }

    pub fn builtins(&self) -> &[PluginDefinition<G>] {
        &self.plugins[..self.builtin_count]
    }

    pub fn user_plugins(&self) -> &[PluginDefinition<G>] {
        &self.plugins[self.builtin_count..]
    }

    /// Returns the first plugin registered under `name`.
    pub fn get(&self, name: &str) -> Option<&PluginDefinition<G>> {
        self.plugins.iter().find(|plugin| plugin.name() == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.plugins.iter().map(PluginDefinition::name)
    }

    /// Plugins exposing `hook`, in registry order.
    pub fn with_hook(&self, hook: HookKind) -> impl Iterator<Item = &PluginDefinition<G>> + '_ {
        self.plugins.iter().filter(move |plugin| plugin.has(hook))
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }
}

impl<G: 'static> PluginRegistry<G> {
    /// Creates a registry prefixed with [`crate::builtins::default_plugins`].
    pub fn with_default_builtins(
        user: Vec<PluginDefinition<G>>,
        config: &RuntimeConfig,
    ) -> Result<Self> {
        Self::new(crate::builtins::default_plugins(), user, config)
    }
}

impl<G> Clone for PluginRegistry<G> {
    fn clone(&self) -> Self {
        Self {
            plugins: Arc::clone(&self.plugins),
            builtin_count: self.builtin_count,
        }
    }
}
