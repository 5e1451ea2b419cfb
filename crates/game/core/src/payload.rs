//! Type-erased values stored in plugin slots.
//!
//! Each plugin owns concrete data and api types, but the game state must hold
//! every plugin's slot side by side. [`Payload`] erases the concrete type
//! behind an `Arc<dyn Any>`; only the owning plugin downcasts it back.
//!
//! Payloads are immutable. Cloning one shares the allocation, so copying a
//! `GameState` never deep-copies plugin data, and a slot that was not touched
//! by a lifecycle step still points at the same value afterwards.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::error::{PayloadError, PayloadSlot};

/// Erased, shareable plugin value. The default payload is empty.
#[derive(Clone, Default)]
pub struct Payload(Option<Arc<dyn Any + Send + Sync>>);

impl Payload {
    pub fn new<T: Any + Send + Sync>(value: T) -> Self {
        Self(Some(Arc::new(value)))
    }

    pub fn empty() -> Self {
        Self(None)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// Returns true if the payload holds a `T`.
    pub fn is<T: Any>(&self) -> bool {
        self.downcast_ref::<T>().is_some()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.0.as_deref()?.downcast_ref::<T>()
    }

    /// Borrows the stored value.
    ///
    /// An empty payload yields `Ok(None)`; a payload of another type is an error.
    pub fn try_ref<T: Any>(&self, slot: PayloadSlot) -> Result<Option<&T>, PayloadError> {
        match self.0.as_deref() {
            None => Ok(None),
            Some(value) => value
                .downcast_ref::<T>()
                .map(Some)
                .ok_or_else(|| PayloadError::type_mismatch::<T>(slot)),
        }
    }

    /// Reads an owned copy of the stored value, defaulting when empty.
    pub fn read<T>(&self, slot: PayloadSlot) -> Result<T, PayloadError>
    where
        T: Any + Clone + Default,
    {
        Ok(self.try_ref::<T>(slot)?.cloned().unwrap_or_default())
    }

    /// Returns true if both payloads share the same allocation (or are both empty).
    pub fn ptr_eq(&self, other: &Self) -> bool {
        match (&self.0, &other.0) {
            (None, None) => true,
            (Some(a), Some(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Debug for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            None => f.write_str("Payload(empty)"),
            Some(_) => f.write_str("Payload(..)"),
        }
    }
}
