//! Error types surfaced by the plugin runtime.
//!
//! Plugin hooks report failures as boxed errors. The orchestrator stops the
//! lifecycle call at the first failing hook and wraps the failure with the
//! plugin name and hook kind so the host can tell which extension broke.
use thiserror::Error;

/// Error type returned by plugin hooks and wrapped game functions.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Result of a single plugin hook invocation.
pub type HookResult<T> = std::result::Result<T, BoxError>;

pub type Result<T> = std::result::Result<T, PluginError>;

/// Identifies one of the optional operations a plugin can expose.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
    strum::EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum HookKind {
    Setup,
    Api,
    Action,
    FnWrap,
    Flush,
    FlushRaw,
    NoClient,
}

#[derive(Debug, Error)]
pub enum PluginError {
    #[error("plugin '{plugin}' failed in {hook} hook")]
    Hook {
        plugin: String,
        hook: HookKind,
        #[source]
        source: BoxError,
    },

    #[error("game function failed")]
    Move(#[source] BoxError),

    #[error("plugin name '{name}' is registered more than once")]
    DuplicatePlugin { name: String },

    #[error("invalid runtime configuration")]
    Config(#[from] ron::error::SpannedError),
}

impl PluginError {
    pub fn hook(plugin: impl Into<String>, hook: HookKind, source: BoxError) -> Self {
        Self::Hook {
            plugin: plugin.into(),
            hook,
            source,
        }
    }

    /// Name of the plugin responsible for the failure, if any.
    pub fn plugin_name(&self) -> Option<&str> {
        match self {
            Self::Hook { plugin, .. } => Some(plugin),
            Self::DuplicatePlugin { name } => Some(name),
            Self::Move(_) | Self::Config(_) => None,
        }
    }
}
