//! Errors raised while reading erased plugin payloads.
//!
//! Payload errors never originate in game logic. They indicate that a slot
//! holds a value of a different type than the plugin reading it expects,
//! which in practice means two plugins were registered under one name.

/// Which half of a plugin slot a payload was read from.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    Hash,
    strum::Display,
    strum::AsRefStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum PayloadSlot {
    Data,
    Api,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum PayloadError {
    #[error("plugin {slot} holds a value that is not a `{expected}`")]
    TypeMismatch {
        slot: PayloadSlot,
        expected: &'static str,
    },
}

impl PayloadError {
    pub fn type_mismatch<T>(slot: PayloadSlot) -> Self {
        Self::TypeMismatch {
            slot,
            expected: std::any::type_name::<T>(),
        }
    }
}
