//! Context handed to moves and triggers.

use std::any::Any;
use std::collections::BTreeMap;
use std::ops::Deref;

use game_core::{Ctx, Payload};

/// Turn context augmented with each plugin's capability object.
///
/// Built by projection right before a move runs and never persisted. Every
/// plugin that has a slot appears here, even without an api; such entries
/// resolve to `None`.
#[derive(Clone, Debug, Default)]
pub struct EnhancedCtx {
    ctx: Ctx,
    apis: BTreeMap<String, Option<Payload>>,
}

impl EnhancedCtx {
    pub fn new(ctx: Ctx) -> Self {
        Self {
            ctx,
            apis: BTreeMap::new(),
        }
    }

    pub(crate) fn insert(&mut self, name: String, api: Option<Payload>) {
        self.apis.insert(name, api);
    }

    pub fn ctx(&self) -> &Ctx {
        &self.ctx
    }

    pub fn into_ctx(self) -> Ctx {
        self.ctx
    }

    /// Returns true if `name` had a plugin slot when the context was built.
    pub fn contains(&self, name: &str) -> bool {
        self.apis.contains_key(name)
    }

    pub fn raw_api(&self, name: &str) -> Option<&Payload> {
        self.apis.get(name)?.as_ref()
    }

    /// Looks up a plugin's capability object as `T`.
    pub fn api<T: Any>(&self, name: &str) -> Option<&T> {
        self.raw_api(name)?.downcast_ref::<T>()
    }

    pub fn plugin_names(&self) -> impl Iterator<Item = &str> + '_ {
        self.apis.keys().map(String::as_str)
    }
}

impl Deref for EnhancedCtx {
    type Target = Ctx;

    fn deref(&self) -> &Ctx {
        &self.ctx
    }
}

#[cfg(test)]
mod tests {
    use game_core::PlayerId;

    use super::*;

    fn sample() -> EnhancedCtx {
        let mut ctx = EnhancedCtx::new(Ctx::new(3));
        ctx.insert("random".into(), Some(Payload::new(4_u32)));
        ctx.insert("audit".into(), None);
        ctx
    }

    #[test]
    fn plugin_names_follow_slot_order() {
        let ctx = sample();

        assert_eq!(ctx.plugin_names().collect::<Vec<_>>(), vec!["audit", "random"]);
        assert_eq!(ctx.api::<u32>("random"), Some(&4));
        assert!(ctx.api::<u64>("random").is_none());
        assert!(ctx.contains("audit") && ctx.raw_api("audit").is_none());
    }

    #[test]
    fn into_ctx_drops_capabilities() {
        let ctx = sample();
        assert_eq!(ctx.num_players, 3);

        let plain = ctx.into_ctx();
        assert_eq!(plain, Ctx::new(3));
        assert_eq!(plain.current_player, PlayerId(0));
    }
}
