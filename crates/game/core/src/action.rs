//! Externally dispatched actions addressed to plugins by name.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A dispatched action. Only the payload matters to the plugin runtime.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Action {
    pub payload: ActionPayload,
}

impl Action {
    /// Creates an action routed to the plugin named `plugin`.
    pub fn plugin(plugin: impl Into<String>, args: Value) -> Self {
        Self {
            payload: ActionPayload::new(plugin, args),
        }
    }
}

/// Body of a plugin action. `type` names the target plugin.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ActionPayload {
    #[serde(rename = "type")]
    pub kind: String,

    /// Plugin-defined arguments.
    #[serde(default)]
    pub args: Value,
}

impl ActionPayload {
    pub fn new(kind: impl Into<String>, args: Value) -> Self {
        Self {
            kind: kind.into(),
            args,
        }
    }

    /// Deserializes a single named argument.
    pub fn arg<T: DeserializeOwned>(&self, key: &str) -> Result<T, serde_json::Error> {
        let value = self.args.get(key).cloned().unwrap_or(Value::Null);
        serde_json::from_value(value)
    }

    /// Deserializes the whole argument object.
    pub fn args_as<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_value(self.args.clone())
    }
}
