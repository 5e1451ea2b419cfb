//! Typed construction of plugin descriptors.

use std::any::Any;
use std::marker::PhantomData;

use game_core::{ActionPayload, GameState, Payload, PayloadError, PayloadSlot};

use super::{ApiArgs, FlushRawArgs, PluginDefinition, SetupArgs, StepArgs};
use crate::error::HookResult;
use crate::middleware::GameFn;

/// Builds a [`PluginDefinition`] from hooks written against concrete types.
///
/// `D` is the plugin's persistent data and `A` its capability object. The
/// builder erases both into [`Payload`]s and downcasts them back before
/// calling each hook, so a plugin never sees another plugin's types. An empty
/// data slot is presented as `D::default()`.
pub struct PluginBuilder<G, D, A> {
    definition: PluginDefinition<G>,
    _types: PhantomData<fn() -> (D, A)>,
}

impl<G, D, A> PluginBuilder<G, D, A> {
    pub(super) fn new(name: impl Into<String>) -> Self {
        Self {
            definition: PluginDefinition::new(name),
            _types: PhantomData,
        }
    }

    pub fn build(self) -> PluginDefinition<G> {
        self.definition
    }
}

impl<G, D, A> PluginBuilder<G, D, A>
where
    G: 'static,
    D: Any + Clone + Default + Send + Sync,
    A: Any + Send + Sync,
{
    pub fn setup<F>(mut self, hook: F) -> Self
    where
        F: Fn(&SetupArgs<'_, G>) -> HookResult<D> + Send + Sync + 'static,
    {
        self.definition = self
            .definition
            .on_setup(move |args| hook(args).map(Payload::new));
        self
    }

    pub fn api<F>(mut self, hook: F) -> Self
    where
        F: Fn(&ApiArgs<'_, G, D>) -> HookResult<A> + Send + Sync + 'static,
    {
        self.definition = self.definition.on_api(move |args| {
            let data = args.data.read::<D>(PayloadSlot::Data)?;
            hook(&ApiArgs {
                g: args.g,
                ctx: args.ctx,
                data: &data,
                game: args.game,
            })
            .map(Payload::new)
        });
        self
    }

    pub fn action<F>(mut self, hook: F) -> Self
    where
        F: Fn(&D, &ActionPayload) -> HookResult<D> + Send + Sync + 'static,
    {
        self.definition = self.definition.on_action(move |data, payload| {
            let data = data.read::<D>(PayloadSlot::Data)?;
            hook(&data, payload).map(Payload::new)
        });
        self
    }

    pub fn fn_wrap<F>(mut self, hook: F) -> Self
    where
        F: Fn(GameFn<G>, &[PluginDefinition<G>]) -> GameFn<G> + Send + Sync + 'static,
    {
        self.definition = self.definition.on_fn_wrap(hook);
        self
    }

    pub fn flush<F>(mut self, hook: F) -> Self
    where
        F: Fn(&StepArgs<'_, G, D, A>) -> HookResult<D> + Send + Sync + 'static,
    {
        self.definition = self.definition.on_flush(move |args| {
            let data = args.data.read::<D>(PayloadSlot::Data)?;
            let api = typed_api::<A>(args.api)?;
            hook(&StepArgs {
                g: args.g,
                ctx: args.ctx,
                game: args.game,
                api,
                data: &data,
            })
            .map(Payload::new)
        });
        self
    }

    pub fn flush_raw<F>(mut self, hook: F) -> Self
    where
        F: Fn(FlushRawArgs<'_, G, D, A>) -> HookResult<GameState<G>> + Send + Sync + 'static,
    {
        self.definition = self.definition.on_flush_raw(move |args| {
            let FlushRawArgs {
                state,
                game,
                api,
                data,
            } = args;
            let data = data.read::<D>(PayloadSlot::Data)?;
            let api = typed_api::<A>(api)?;
            hook(FlushRawArgs {
                state,
                game,
                api,
                data: &data,
            })
        });
        self
    }

    pub fn no_client<F>(mut self, hook: F) -> Self
    where
        F: Fn(&StepArgs<'_, G, D, A>) -> HookResult<bool> + Send + Sync + 'static,
    {
        self.definition = self.definition.on_no_client(move |args| {
            let data = args.data.read::<D>(PayloadSlot::Data)?;
            let api = typed_api::<A>(args.api)?;
            hook(&StepArgs {
                g: args.g,
                ctx: args.ctx,
                game: args.game,
                api,
                data: &data,
            })
        });
        self
    }
}

fn typed_api<A: Any>(api: Option<&Payload>) -> Result<Option<&A>, PayloadError> {
    match api {
        None => Ok(None),
        Some(payload) => payload.try_ref::<A>(PayloadSlot::Api),
    }
}
