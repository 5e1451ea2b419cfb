//! Move and trigger middleware.
//!
//! Each plugin's `fn_wrap` receives the function built so far and returns a
//! new one that must call through to it. Wrapping folds left over the
//! registry, starting from the original function:
//!
//! ```text
//! acc_0 = f
//! acc_{i+1} = wrappers[i].fn_wrap(acc_i, all_plugins)
//! ```
//!
//! so the last registered wrapper ends up outermost and `f` innermost.
//! Built-ins sit before user plugins in the registry and therefore wrap
//! closer to `f`.

use std::sync::Arc;

use tracing::trace;

use crate::context::EnhancedCtx;
use crate::error::HookResult;
use crate::plugin::PluginRegistry;

/// A move or trigger: reads the game payload and enhanced context, returns the
/// next game payload.
pub type GameFn<G> = Arc<dyn Fn(&G, &EnhancedCtx) -> HookResult<G> + Send + Sync>;

/// Erases a closure into a [`GameFn`].
pub fn game_fn<G, F>(f: F) -> GameFn<G>
where
    F: Fn(&G, &EnhancedCtx) -> HookResult<G> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Wraps `f` in every `fn_wrap` hook of the registry.
pub fn fn_wrap<G>(f: GameFn<G>, registry: &PluginRegistry<G>) -> GameFn<G> {
    let all = registry.as_slice();
    all.iter()
        .filter_map(|plugin| plugin.fn_wrap.as_ref().map(|wrap| (plugin.name(), wrap)))
        .fold(f, |inner, (name, wrap)| {
            trace!(target: "runtime::plugins", plugin = name, "Wrapping game function");
            wrap(inner, all)
        })
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::config::RuntimeConfig;
    use crate::plugin::PluginDefinition;

    fn prefixing(name: &'static str) -> PluginDefinition<String> {
        PluginDefinition::new(name).on_fn_wrap(move |next, _| {
            game_fn(move |g: &String, ctx| Ok(format!("{name}({})", next(g, ctx)?)))
        })
    }

    fn registry(
        builtins: Vec<PluginDefinition<String>>,
        user: Vec<PluginDefinition<String>>,
    ) -> PluginRegistry<String> {
        PluginRegistry::new(builtins, user, &RuntimeConfig::default()).unwrap()
    }

    #[test]
    fn later_plugins_wrap_outermost() {
        let wrapped = fn_wrap(
            game_fn(|_: &String, _| Ok("fn".to_string())),
            &registry(vec![], vec![prefixing("A"), prefixing("B")]),
        );

        let out = wrapped(&String::new(), &EnhancedCtx::default()).unwrap();
        assert_eq!(out, "B(A(fn))");
    }

    #[test]
    fn builtins_wrap_inside_user_plugins() {
        let wrapped = fn_wrap(
            game_fn(|_: &String, _| Ok("fn".to_string())),
            &registry(vec![prefixing("builtin")], vec![prefixing("user")]),
        );

        let out = wrapped(&String::new(), &EnhancedCtx::default()).unwrap();
        assert_eq!(out, "user(builtin(fn))");
    }

    #[test]
    fn outer_pre_logic_runs_first_and_post_logic_last() {
        let log = Arc::new(Mutex::new(Vec::new()));

        let tracing_wrapper = |name: &'static str, log: Arc<Mutex<Vec<String>>>| {
            PluginDefinition::<String>::new(name).on_fn_wrap(move |next, _| {
                let log = Arc::clone(&log);
                game_fn(move |g: &String, ctx| {
                    log.lock().unwrap().push(format!("{name}:before"));
                    let out = next(g, ctx)?;
                    log.lock().unwrap().push(format!("{name}:after"));
                    Ok(out)
                })
            })
        };

        let inner_log = Arc::clone(&log);
        let wrapped = fn_wrap(
            game_fn(move |g: &String, _| {
                inner_log.lock().unwrap().push("fn".to_string());
                Ok(g.clone())
            }),
            &registry(
                vec![],
                vec![
                    tracing_wrapper("A", Arc::clone(&log)),
                    tracing_wrapper("B", Arc::clone(&log)),
                ],
            ),
        );

        wrapped(&String::new(), &EnhancedCtx::default()).unwrap();
        assert_eq!(
            *log.lock().unwrap(),
            vec!["B:before", "A:before", "fn", "A:after", "B:after"]
        );
    }

    #[test]
    fn plugins_without_wrappers_leave_function_untouched() {
        let original = game_fn(|g: &String, _| Ok(g.clone()));
        let wrapped = fn_wrap(
            Arc::clone(&original),
            &registry(vec![PluginDefinition::new("plain")], vec![]),
        );

        assert!(Arc::ptr_eq(&original, &wrapped));
    }

    #[test]
    fn wrappers_receive_every_registered_plugin() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let recorder = {
            let seen = Arc::clone(&seen);
            PluginDefinition::<String>::new("recorder").on_fn_wrap(move |next, all| {
                *seen.lock().unwrap() = all.iter().map(|p| p.name().to_string()).collect();
                next
            })
        };

        fn_wrap(
            game_fn(|g: &String, _| Ok(g.clone())),
            &registry(vec![PluginDefinition::new("builtin")], vec![recorder]),
        );

        assert_eq!(*seen.lock().unwrap(), vec!["builtin", "recorder"]);
    }
}
