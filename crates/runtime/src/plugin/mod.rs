//! Plugin descriptors.
//!
//! A plugin is a name plus up to seven optional operations. The runtime checks
//! which operations are present at call time; there is no plugin trait to
//! implement and no default method bodies. Hooks operate on erased
//! [`Payload`]s so plugins with different data types can share one registry.
//! Plugin authors normally go through [`PluginBuilder`], which lets them write
//! hooks against their own concrete data and api types.
mod builder;
mod registry;

use std::fmt;
use std::sync::Arc;

use game_core::{ActionPayload, Ctx, GameConfig, GameState, Payload};
use strum::IntoEnumIterator;

use crate::error::{HookKind, HookResult};
use crate::middleware::GameFn;

pub use builder::PluginBuilder;
pub use registry::PluginRegistry;

/// Arguments to `setup`.
pub struct SetupArgs<'a, G> {
    pub g: &'a G,
    pub ctx: &'a Ctx,
    pub game: &'a GameConfig,
}

/// Arguments to `api`.
pub struct ApiArgs<'a, G, D> {
    pub g: &'a G,
    pub ctx: &'a Ctx,
    pub data: &'a D,
    pub game: &'a GameConfig,
}

/// Arguments to `flush` and `no_client`.
pub struct StepArgs<'a, G, D, A> {
    pub g: &'a G,
    pub ctx: &'a Ctx,
    pub game: &'a GameConfig,
    /// `None` when the plugin has no capability object in its slot.
    pub api: Option<&'a A>,
    pub data: &'a D,
}

/// Arguments to `flush_raw`. The hook owns the whole state and returns its
/// replacement.
pub struct FlushRawArgs<'a, G, D, A> {
    pub state: GameState<G>,
    pub game: &'a GameConfig,
    pub api: Option<&'a A>,
    pub data: &'a D,
}

pub type SetupHook<G> = Arc<dyn Fn(&SetupArgs<'_, G>) -> HookResult<Payload> + Send + Sync>;

pub type ApiHook<G> = Arc<dyn Fn(&ApiArgs<'_, G, Payload>) -> HookResult<Payload> + Send + Sync>;

pub type ActionHook = Arc<dyn Fn(&Payload, &ActionPayload) -> HookResult<Payload> + Send + Sync>;

/// Receives the function built so far and every registered plugin.
pub type FnWrapHook<G> = Arc<dyn Fn(GameFn<G>, &[PluginDefinition<G>]) -> GameFn<G> + Send + Sync>;

pub type FlushHook<G> =
    Arc<dyn Fn(&StepArgs<'_, G, Payload, Payload>) -> HookResult<Payload> + Send + Sync>;

pub type FlushRawHook<G> =
    Arc<dyn Fn(FlushRawArgs<'_, G, Payload, Payload>) -> HookResult<GameState<G>> + Send + Sync>;

pub type NoClientHook<G> =
    Arc<dyn Fn(&StepArgs<'_, G, Payload, Payload>) -> HookResult<bool> + Send + Sync>;

/// Named capability set. Every operation is optional.
pub struct PluginDefinition<G> {
    pub name: String,
    /// Produces the initial `data` at game start.
    pub setup: Option<SetupHook<G>>,
    /// Builds the capability object exposed to moves through the context.
    pub api: Option<ApiHook<G>>,
    /// Handles actions whose payload type equals the plugin name.
    pub action: Option<ActionHook>,
    /// Wraps moves and triggers.
    pub fn_wrap: Option<FnWrapHook<G>>,
    /// Folds the step's api back into persistent `data`.
    pub flush: Option<FlushHook<G>>,
    /// Full-state escape hatch, consulted only when `flush` is absent.
    pub flush_raw: Option<FlushRawHook<G>>,
    /// Marks states that must not be trusted when computed on a client.
    pub no_client: Option<NoClientHook<G>>,
}

impl<G> PluginDefinition<G> {
    /// Creates a descriptor with no operations.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            setup: None,
            api: None,
            action: None,
            fn_wrap: None,
            flush: None,
            flush_raw: None,
            no_client: None,
        }
    }

    /// Starts a typed builder whose hooks see `D` as data and `A` as api.
    pub fn builder<D, A>(name: impl Into<String>) -> PluginBuilder<G, D, A> {
        PluginBuilder::new(name)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn has(&self, hook: HookKind) -> bool {
        match hook {
            HookKind::Setup => self.setup.is_some(),
            HookKind::Api => self.api.is_some(),
            HookKind::Action => self.action.is_some(),
            HookKind::FnWrap => self.fn_wrap.is_some(),
            HookKind::Flush => self.flush.is_some(),
            HookKind::FlushRaw => self.flush_raw.is_some(),
            HookKind::NoClient => self.no_client.is_some(),
        }
    }

    /// Operations this plugin exposes, in lifecycle order.
    pub fn hooks(&self) -> impl Iterator<Item = HookKind> + '_ {
        HookKind::iter().filter(|hook| self.has(*hook))
    }

    // Raw setters work on erased payloads. Closures passed here get their
    // higher-ranked signatures from the bounds.

    pub fn on_setup<F>(mut self, hook: F) -> Self
    where
        F: Fn(&SetupArgs<'_, G>) -> HookResult<Payload> + Send + Sync + 'static,
    {
        self.setup = Some(Arc::new(hook));
        self
    }

    pub fn on_api<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ApiArgs<'_, G, Payload>) -> HookResult<Payload> + Send + Sync + 'static,
    {
        self.api = Some(Arc::new(hook));
        self
    }

    pub fn on_action<F>(mut self, hook: F) -> Self
    where
        F: Fn(&Payload, &ActionPayload) -> HookResult<Payload> + Send + Sync + 'static,
    {
        self.action = Some(Arc::new(hook));
        self
    }

    pub fn on_fn_wrap<F>(mut self, hook: F) -> Self
    where
        F: Fn(GameFn<G>, &[PluginDefinition<G>]) -> GameFn<G> + Send + Sync + 'static,
    {
        self.fn_wrap = Some(Arc::new(hook));
        self
    }

    pub fn on_flush<F>(mut self, hook: F) -> Self
    where
        F: Fn(&StepArgs<'_, G, Payload, Payload>) -> HookResult<Payload> + Send + Sync + 'static,
    {
        self.flush = Some(Arc::new(hook));
        self
    }

    pub fn on_flush_raw<F>(mut self, hook: F) -> Self
    where
        F: Fn(FlushRawArgs<'_, G, Payload, Payload>) -> HookResult<GameState<G>>
            + Send
            + Sync
            + 'static,
    {
        self.flush_raw = Some(Arc::new(hook));
        self
    }

    pub fn on_no_client<F>(mut self, hook: F) -> Self
    where
        F: Fn(&StepArgs<'_, G, Payload, Payload>) -> HookResult<bool> + Send + Sync + 'static,
    {
        self.no_client = Some(Arc::new(hook));
        self
    }
}

impl<G> Clone for PluginDefinition<G> {
    fn clone(&self) -> Self {
        Self {
            name: self.name.clone(),
            setup: self.setup.clone(),
            api: self.api.clone(),
            action: self.action.clone(),
            fn_wrap: self.fn_wrap.clone(),
            flush: self.flush.clone(),
            flush_raw: self.flush_raw.clone(),
            no_client: self.no_client.clone(),
        }
    }
}

impl<G> fmt::Debug for PluginDefinition<G> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginDefinition")
            .field("name", &self.name)
            .field("hooks", &self.hooks().collect::<Vec<_>>())
            .finish()
    }
}
