//! High-level plugin runtime.
//!
//! [`PluginRuntime`] binds a registry to one game configuration and one
//! runtime configuration so hosts don't thread them through every lifecycle
//! call. It also drives a whole step the way a move is executed.

use game_core::{Action, Ctx, GameConfig, GameState};
use tracing::debug;

use crate::builtins;
use crate::config::RuntimeConfig;
use crate::context::EnhancedCtx;
use crate::error::{PluginError, Result};
use crate::lifecycle;
use crate::middleware::{self, GameFn};
use crate::plugin::{PluginDefinition, PluginRegistry};

/// Registry plus configuration, ready to drive game steps.
pub struct PluginRuntime<G> {
    registry: PluginRegistry<G>,
    game: GameConfig,
    config: RuntimeConfig,
}

impl<G: Clone + 'static> PluginRuntime<G> {
    /// Create a new runtime builder
    pub fn builder() -> PluginRuntimeBuilder<G> {
        PluginRuntimeBuilder::new()
    }

    pub fn registry(&self) -> &PluginRegistry<G> {
        &self.registry
    }

    pub fn game(&self) -> &GameConfig {
        &self.game
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    /// Builds the starting state for `g`: a fresh [`Ctx`] for the configured
    /// player count, then every plugin's `setup`.
    pub fn initial_state(&self, g: G) -> Result<GameState<G>> {
        self.setup(&GameState::new(g, Ctx::new(self.game.num_players)))
    }

    pub fn setup(&self, state: &GameState<G>) -> Result<GameState<G>> {
        lifecycle::setup(state, &self.registry, &self.game)
    }

    pub fn enhance(&self, state: &GameState<G>) -> Result<GameState<G>> {
        lifecycle::enhance(state, &self.registry, &self.game)
    }

    pub fn enhance_ctx(&self, state: &GameState<G>) -> EnhancedCtx {
        lifecycle::enhance_ctx(state)
    }

    pub fn fn_wrap(&self, f: GameFn<G>) -> GameFn<G> {
        middleware::fn_wrap(f, &self.registry)
    }

    pub fn process_action(&self, state: &GameState<G>, action: &Action) -> Result<GameState<G>> {
        lifecycle::process_action(state, action, &self.registry)
    }

    pub fn flush(&self, state: &GameState<G>) -> Result<GameState<G>> {
        lifecycle::flush(state, &self.registry, &self.game, &self.config)
    }

    pub fn no_client(&self, state: &GameState<G>) -> Result<bool> {
        lifecycle::no_client(state, &self.registry, &self.game)
    }

    /// Runs `f` as one step: enhance, project the context, wrap, invoke, flush.
    ///
    /// Failures of `f` (or of a wrapper around it) come back as
    /// [`PluginError::Move`].
    pub fn run_step(&self, state: &GameState<G>, f: GameFn<G>) -> Result<GameState<G>> {
        let enhanced = self.invoke(state, f)?;
        self.flush(&enhanced)
    }

    /// Runs a step the way a client does: `None` if any plugin vetoes the
    /// result, in which case the client must wait for the master's state.
    pub fn run_client_step(&self, state: &GameState<G>, f: GameFn<G>) -> Result<Option<GameState<G>>> {
        let enhanced = self.invoke(state, f)?;
        if self.no_client(&enhanced)? {
            debug!(target: "runtime::plugins", "Client step discarded");
            return Ok(None);
        }
        self.flush(&enhanced).map(Some)
    }

    fn invoke(&self, state: &GameState<G>, f: GameFn<G>) -> Result<GameState<G>> {
        let enhanced = self.enhance(state)?;
        let ctx = self.enhance_ctx(&enhanced);
        let wrapped = self.fn_wrap(f);
        let g = wrapped(&enhanced.g, &ctx).map_err(PluginError::Move)?;
        Ok(GameState { g, ..enhanced })
    }
}

impl<G> Clone for PluginRuntime<G> {
    fn clone(&self) -> Self {
        Self {
            registry: self.registry.clone(),
            game: self.game.clone(),
            config: self.config.clone(),
        }
    }
}

/// Builder for [`PluginRuntime`].
pub struct PluginRuntimeBuilder<G> {
    builtins: Option<Vec<PluginDefinition<G>>>,
    plugins: Vec<PluginDefinition<G>>,
    game: GameConfig,
    config: RuntimeConfig,
}

impl<G: Clone + 'static> PluginRuntimeBuilder<G> {
    fn new() -> Self {
        Self {
            builtins: None,
            plugins: Vec::new(),
            game: GameConfig::default(),
            config: RuntimeConfig::default(),
        }
    }

    /// Replace the built-in set.
    ///
    /// Without this, [`builtins::default_plugins`] is used. Pass an empty list
    /// to run user plugins alone.
    pub fn builtins(mut self, builtins: Vec<PluginDefinition<G>>) -> Self {
        self.builtins = Some(builtins);
        self
    }

    /// Append a user plugin
    pub fn plugin(mut self, plugin: PluginDefinition<G>) -> Self {
        self.plugins.push(plugin);
        self
    }

    pub fn plugins(mut self, plugins: impl IntoIterator<Item = PluginDefinition<G>>) -> Self {
        self.plugins.extend(plugins);
        self
    }

    pub fn game(mut self, game: GameConfig) -> Self {
        self.game = game;
        self
    }

    /// Override runtime configuration
    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the runtime, validating plugin names
    pub fn build(self) -> Result<PluginRuntime<G>> {
        let builtins = self.builtins.unwrap_or_else(builtins::default_plugins);
        let registry = PluginRegistry::new(builtins, self.plugins, &self.config)?;
        Ok(PluginRuntime {
            registry,
            game: self.game,
            config: self.config,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use game_core::PlayerId;
    use serde_json::json;

    use super::*;
    use crate::builtins::{EventsApi, PrngState, RandomApi, events, random};
    use crate::middleware::game_fn;

    fn runtime() -> PluginRuntime<i64> {
        PluginRuntime::builder()
            .game(GameConfig::new("dice").with_seed(7))
            .build()
            .unwrap()
    }

    #[test]
    fn initial_state_seeds_builtins() {
        let state = runtime().initial_state(0).unwrap();

        assert_eq!(state.ctx.num_players, 2);
        assert_eq!(state.data_as::<PrngState>(random::NAME).unwrap().seed, 7);
        assert!(state.plugin(events::NAME).is_none());
    }

    #[test]
    fn run_step_returns_flushed_state_with_new_payload() {
        let runtime = runtime();
        let state = runtime.initial_state(10).unwrap();

        let next = runtime
            .run_step(
                &state,
                game_fn(|g: &i64, ctx| {
                    ctx.api::<EventsApi>(events::NAME).unwrap().end_turn();
                    Ok(g + 1)
                }),
            )
            .unwrap();

        assert_eq!(next.g, 11);
        assert_eq!(next.ctx.current_player, PlayerId(1));
        assert!(next.plugins.values().all(|record| record.api.is_none()));
        assert_eq!(state.g, 10);
    }

    #[test]
    fn move_failure_is_reported_as_move_error() {
        let runtime = runtime();
        let state = runtime.initial_state(0).unwrap();

        let err = runtime
            .run_step(
                &state,
                game_fn(|_: &i64, _| Err(io::Error::other("illegal move").into())),
            )
            .unwrap_err();

        assert!(matches!(err, PluginError::Move(_)));
        assert_eq!(err.plugin_name(), None);
    }

    #[test]
    fn client_step_is_discarded_after_randomness() {
        let runtime = runtime();
        let state = runtime.initial_state(0).unwrap();

        let rolled = runtime
            .run_client_step(
                &state,
                game_fn(|_: &i64, ctx| {
                    Ok(i64::from(ctx.api::<RandomApi>(random::NAME).unwrap().d6()))
                }),
            )
            .unwrap();
        assert!(rolled.is_none());

        let quiet = runtime
            .run_client_step(&state, game_fn(|g: &i64, _| Ok(g + 2)))
            .unwrap();
        assert_eq!(quiet.map(|state| state.g), Some(2));
    }

    #[test]
    fn empty_builtins_leave_only_user_plugins() {
        let runtime = PluginRuntime::<i64>::builder()
            .builtins(Vec::new())
            .plugin(PluginDefinition::new("solo"))
            .build()
            .unwrap();

        assert_eq!(runtime.registry().names().collect::<Vec<_>>(), vec!["solo"]);
        assert!(runtime.registry().builtins().is_empty());
    }

    #[test]
    fn duplicate_of_builtin_name_is_rejected() {
        let err = PluginRuntime::<i64>::builder()
            .plugin(PluginDefinition::new(random::NAME))
            .build()
            .err()
            .unwrap();

        assert!(matches!(err, PluginError::DuplicatePlugin { ref name } if name == "random"));
    }

    #[test]
    fn actions_reach_plugins_through_runtime() {
        let runtime = PluginRuntime::<i64>::builder()
            .plugin(
                PluginDefinition::builder::<i64, ()>("score")
                    .action(|score, payload| Ok(score + payload.arg::<i64>("points")?))
                    .build(),
            )
            .build()
            .unwrap();
        let state = runtime.initial_state(0).unwrap();

        let next = runtime
            .process_action(&state, &Action::plugin("score", json!({ "points": 3 })))
            .unwrap();

        assert_eq!(next.data_as::<i64>("score"), Some(&3));
    }
}
