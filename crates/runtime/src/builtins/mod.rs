//! Plugins installed ahead of every user plugin.
//!
//! Built-ins are ordinary [`PluginDefinition`]s. They are handed to the
//! registry explicitly; [`default_plugins`] builds a fresh list on each call
//! rather than reading shared state.
//!
//! - [`random`]: seeded, replayable randomness for moves
//! - [`events`]: turn and phase transitions requested from inside a move
pub mod events;
pub mod random;

use crate::plugin::PluginDefinition;

pub use events::{EventsApi, GameEvent};
pub use random::{PrngState, RandomApi};

/// Built-in plugins in their fixed execution order.
pub fn default_plugins<G: 'static>() -> Vec<PluginDefinition<G>> {
    vec![random::plugin(), events::plugin()]
}
