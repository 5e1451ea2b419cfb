//! Plugin lifecycle operations.
//!
//! Every operation borrows the input state and returns a new one (or a value
//! derived from it); the caller's state is never modified. Plugins are visited
//! in registry order and a hook only ever sees its own slot.
//!
//! A failing hook stops the operation at that plugin. Slots already rewritten
//! for earlier plugins in the same call live only in the discarded working
//! copy, so the caller is left holding its pre-call state.

use game_core::{Action, GameConfig, GameState, PluginRecord};
use tracing::{debug, trace, warn};

use crate::config::RuntimeConfig;
use crate::context::EnhancedCtx;
use crate::error::{BoxError, HookKind, PluginError, Result};
use crate::plugin::{ApiArgs, FlushRawArgs, PluginDefinition, PluginRegistry, SetupArgs, StepArgs};

/// Initializes persistent data for every plugin exposing `setup`.
///
/// Calling this again resets those slots.
pub fn setup<G: Clone>(
    state: &GameState<G>,
    registry: &PluginRegistry<G>,
    game: &GameConfig,
) -> Result<GameState<G>> {
    let mut next = state.clone();
    let mut initialized = 0usize;

    for plugin in registry.iter() {
        let Some(hook) = &plugin.setup else {
            continue;
        };
        trace!(target: "runtime::plugins", plugin = plugin.name(), "setup");
        let data = hook(&SetupArgs {
            g: &next.g,
            ctx: &next.ctx,
            game,
        })
        .map_err(failed(plugin, HookKind::Setup))?;
        next.plugins
            .insert(plugin.name().to_owned(), PluginRecord::new(data));
        initialized += 1;
    }

    debug!(target: "runtime::plugins", initialized, "Plugins set up");
    Ok(next)
}

/// Regenerates the capability object of every plugin exposing `api`.
///
/// Persistent data is carried over untouched.
pub fn enhance<G: Clone>(
    state: &GameState<G>,
    registry: &PluginRegistry<G>,
    game: &GameConfig,
) -> Result<GameState<G>> {
    let mut next = state.clone();

    for plugin in registry.iter() {
        let Some(hook) = &plugin.api else {
            continue;
        };
        trace!(target: "runtime::plugins", plugin = plugin.name(), "api");
        let record = next.plugin_or_default(plugin.name());
        let api = hook(&ApiArgs {
            g: &next.g,
            ctx: &next.ctx,
            data: &record.data,
            game,
        })
        .map_err(failed(plugin, HookKind::Api))?;
        next.plugins
            .insert(plugin.name().to_owned(), record.with_api(api));
    }

    Ok(next)
}

/// Projects `ctx` plus one capability entry per plugin slot.
pub fn enhance_ctx<G>(state: &GameState<G>) -> EnhancedCtx {
    let mut ctx = EnhancedCtx::new(state.ctx.clone());
    for (name, record) in &state.plugins {
        ctx.insert(name.clone(), record.api.clone());
    }
    ctx
}

/// Routes `action` to every plugin named `action.payload.kind` that exposes
/// `action`.
///
/// Only the matching slot's data changes. When duplicate names are allowed,
/// each match sees the data written by the previous one.
pub fn process_action<G: Clone>(
    state: &GameState<G>,
    action: &Action,
    registry: &PluginRegistry<G>,
) -> Result<GameState<G>> {
    let target = action.payload.kind.as_str();
    let mut next = state.clone();
    let mut handled = 0usize;

    for plugin in registry.iter().filter(|plugin| plugin.name() == target) {
        let Some(hook) = &plugin.action else {
            continue;
        };
        let record = next.plugin_or_default(target);
        let data = hook(&record.data, &action.payload).map_err(failed(plugin, HookKind::Action))?;
        next.plugins
            .insert(target.to_owned(), PluginRecord { data, ..record });
        handled += 1;
    }

    if handled == 0 {
        trace!(target: "runtime::plugins", action = target, "No plugin handles action");
    } else {
        debug!(target: "runtime::plugins", action = target, handled, "Plugin action processed");
    }
    Ok(next)
}

/// Commits each plugin's end-of-step data.
///
/// `flush` takes precedence over `flush_raw`; plugins with neither keep their
/// slot. With [`RuntimeConfig::clear_api_on_flush`] every remaining
/// capability object is dropped afterwards.
pub fn flush<G: Clone>(
    state: &GameState<G>,
    registry: &PluginRegistry<G>,
    game: &GameConfig,
    config: &RuntimeConfig,
) -> Result<GameState<G>> {
    let mut next = state.clone();

    for plugin in registry.iter() {
        let name = plugin.name();
        if let Some(hook) = &plugin.flush {
            trace!(target: "runtime::plugins", plugin = name, "flush");
            let record = next.plugin_or_default(name);
            let data = hook(&StepArgs {
                g: &next.g,
                ctx: &next.ctx,
                game,
                api: record.api.as_ref(),
                data: &record.data,
            })
            .map_err(failed(plugin, HookKind::Flush))?;
            next.plugins.insert(name.to_owned(), PluginRecord::new(data));
        } else if let Some(hook) = &plugin.flush_raw {
            trace!(target: "runtime::plugins", plugin = name, "flush_raw");
            let record = next.plugin_or_default(name);
            next = hook(FlushRawArgs {
                state: next,
                game,
                api: record.api.as_ref(),
                data: &record.data,
            })
            .map_err(failed(plugin, HookKind::FlushRaw))?;
            // The plugin had the whole state; only its data may survive in its slot.
            let stripped = next.plugin_or_default(name).data_only();
            next.plugins.insert(name.to_owned(), stripped);
        }
    }

    if config.clear_api_on_flush {
        for record in next.plugins.values_mut() {
            record.api = None;
        }
    }

    debug!(target: "runtime::plugins", slots = next.plugins.len(), "Plugins flushed");
    Ok(next)
}

/// Returns true if any plugin marks the state as unsafe to apply on a client.
///
/// Plugins without a slot are skipped rather than asked.
pub fn no_client<G>(
    state: &GameState<G>,
    registry: &PluginRegistry<G>,
    game: &GameConfig,
) -> Result<bool> {
    for plugin in registry.iter() {
        let Some(hook) = &plugin.no_client else {
            continue;
        };
        let Some(record) = state.plugin(plugin.name()) else {
            continue;
        };
        let veto = hook(&StepArgs {
            g: &state.g,
            ctx: &state.ctx,
            game,
            api: record.api.as_ref(),
            data: &record.data,
        })
        .map_err(failed(plugin, HookKind::NoClient))?;
        if veto {
            debug!(target: "runtime::plugins", plugin = plugin.name(), "Client state vetoed");
            return Ok(true);
        }
    }
    Ok(false)
}

fn failed<G>(
    plugin: &PluginDefinition<G>,
    hook: HookKind,
) -> impl FnOnce(BoxError) -> PluginError + '_ {
    move |source| {
        warn!(
            target: "runtime::plugins",
            plugin = plugin.name(),
            hook = %hook,
            error = %source,
            "Plugin hook failed"
        );
        PluginError::hook(plugin.name(), hook, source)
    }
}
