//! Runtime configuration.

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Tunables for how strictly the runtime enforces plugin invariants.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Drop every slot's `api` at the end of a flush, including plugins that
    /// define neither `flush` nor `flush_raw`.
    ///
    /// When disabled, such plugins keep their stale capability object until
    /// the next enhance overwrites it.
    pub clear_api_on_flush: bool,

    /// Fail registry construction when two plugins share a name.
    ///
    /// When disabled, duplicates are accepted with a warning and every
    /// same-named plugin receives actions addressed to that name, in order.
    pub reject_duplicate_names: bool,
}

impl RuntimeConfig {
    /// Parses a configuration from RON. Missing fields keep their defaults.
    pub fn from_ron_str(source: &str) -> Result<Self> {
        Ok(ron::from_str(source)?)
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            clear_api_on_flush: true,
            reject_duplicate_names: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::PluginError;

    #[test]
    fn defaults_enforce_invariants() {
        let config = RuntimeConfig::default();

        assert!(config.clear_api_on_flush);
        assert!(config.reject_duplicate_names);
    }

    #[test]
    fn ron_overrides_single_field() {
        let config = RuntimeConfig::from_ron_str("(clear_api_on_flush: false)").unwrap();

        assert!(!config.clear_api_on_flush);
        assert!(config.reject_duplicate_names);
    }

    #[test]
    fn malformed_ron_is_a_config_error() {
        let err = RuntimeConfig::from_ron_str("(clear_api_on_flush: maybe)").unwrap_err();

        assert!(matches!(err, PluginError::Config(_)));
    }
}
