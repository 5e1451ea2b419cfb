//! Game state as seen by the plugin runtime.
//!
//! A [`GameState`] is an immutable value: lifecycle steps read one and return
//! a new one. Plugin slots hold erased [`Payload`]s, so cloning a state only
//! bumps reference counts for plugin data.
mod ctx;

use std::any::Any;
use std::collections::BTreeMap;

pub use ctx::{Ctx, PlayerId};

use crate::payload::Payload;

/// Persistent and ephemeral halves of one plugin's slot.
#[derive(Clone, Debug, Default)]
pub struct PluginRecord {
    /// Persistent plugin-owned state. Survives across turns.
    pub data: Payload,

    /// Capability object regenerated before every move. Valid only until the
    /// next flush.
    pub api: Option<Payload>,
}

impl PluginRecord {
    pub fn new(data: Payload) -> Self {
        Self { data, api: None }
    }

    pub fn with_api(mut self, api: Payload) -> Self {
        self.api = Some(api);
        self
    }

    /// Returns a copy keeping only the persistent data.
    pub fn data_only(&self) -> Self {
        Self::new(self.data.clone())
    }
}

/// Plugin slots keyed by plugin name.
pub type PluginStates = BTreeMap<String, PluginRecord>;

/// Canonical game state: game payload, turn context, and plugin slots.
#[derive(Clone, Debug, Default)]
pub struct GameState<G> {
    /// Game-specific payload owned by move logic.
    pub g: G,
    pub ctx: Ctx,
    pub plugins: PluginStates,
}

impl<G> GameState<G> {
    /// Creates a state with no plugin slots.
    pub fn new(g: G, ctx: Ctx) -> Self {
        Self {
            g,
            ctx,
            plugins: PluginStates::new(),
        }
    }

    pub fn plugin(&self, name: &str) -> Option<&PluginRecord> {
        self.plugins.get(name)
    }

    /// Returns the slot for `name`, or an empty record if none exists yet.
    pub fn plugin_or_default(&self, name: &str) -> PluginRecord {
        self.plugins.get(name).cloned().unwrap_or_default()
    }

    /// Borrows a plugin's persistent data as `T`, if present and of that type.
    pub fn data_as<T: Any>(&self, name: &str) -> Option<&T> {
        self.plugins.get(name)?.data.downcast_ref::<T>()
    }

    /// Borrows a plugin's current capability object as `T`.
    pub fn api_as<T: Any>(&self, name: &str) -> Option<&T> {
        self.plugins.get(name)?.api.as_ref()?.downcast_ref::<T>()
    }
}
