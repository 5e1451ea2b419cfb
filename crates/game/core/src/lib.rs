//! Deterministic game state types shared by the plugin runtime and its host.
//!
//! `game-core` defines the values that flow through every plugin lifecycle
//! call: the [`GameState`] triple (`g`, `ctx`, `plugins`), the turn metadata
//! in [`Ctx`], the per-plugin [`PluginRecord`] slots holding erased
//! [`Payload`]s, and the [`Action`] messages addressed to plugins by name.
//! The runtime crate composes plugins over these types; nothing in here knows
//! about plugins beyond their slots.
pub mod action;
pub mod config;
pub mod error;
pub mod payload;
pub mod state;

pub use action::{Action, ActionPayload};
pub use config::GameConfig;
pub use error::{PayloadError, PayloadSlot};
pub use payload::Payload;
pub use state::{Ctx, GameState, PlayerId, PluginRecord, PluginStates};
