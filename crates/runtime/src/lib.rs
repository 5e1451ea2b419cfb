//! Plugin orchestration for turn-based game state.
//!
//! Plugins extend a game with their own persistent data, a per-step
//! capability object handed to moves, action handlers, and middleware around
//! moves. This crate runs those extensions in a fixed order over immutable
//! [`GameState`](game_core::GameState) values.
//!
//! Modules are organized by responsibility:
//! - [`plugin`] defines plugin descriptors, the typed builder, and the registry
//! - [`lifecycle`] hosts the setup/enhance/action/flush/no-client operations
//! - [`middleware`] wraps moves and triggers with `fn_wrap` hooks
//! - [`context`] provides the enhanced context handed to moves
//! - [`builtins`] ships the random and events plugins
//! - [`runtime`] bundles everything behind a builder
pub mod builtins;
pub mod config;
pub mod context;
pub mod error;
pub mod lifecycle;
pub mod middleware;
pub mod plugin;
pub mod runtime;

pub use builtins::{EventsApi, GameEvent, PrngState, RandomApi, default_plugins};
pub use config::RuntimeConfig;
pub use context::EnhancedCtx;
pub use error::{BoxError, HookKind, HookResult, PluginError, Result};
pub use middleware::{GameFn, game_fn};
pub use plugin::{
    ApiArgs, FlushRawArgs, PluginBuilder, PluginDefinition, PluginRegistry, SetupArgs, StepArgs,
};
pub use runtime::{PluginRuntime, PluginRuntimeBuilder};
