//! Change-detecting property cells.
//!
//! [`Property<T>`] wraps a value and reports whether a write actually changed
//! it. Pairing a property with a [`Signal`](crate::Signal) gives the
//! "notify only when the value differs" behavior the tool strip uses for every
//! value it publishes.
//!
//! # Example
//!
//! ```
//! use toolstrip_core::{Property, Signal};
//!
//! struct Published {
//!     width: Property<f32>,
//!     width_changed: Signal<f32>,
//! }
//!
//! impl Published {
//!     fn publish(&self, width: f32) {
//!         if self.width.set(width) {
//!             self.width_changed.emit(width);
//!         }
//!     }
//! }
//!
//! let published = Published {
//!     width: Property::new(0.0),
//!     width_changed: Signal::new(),
//! };
//! published.publish(42.0);
//! assert_eq!(published.width.get(), 42.0);
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A value cell that tracks changes.
///
/// When `set()` is called, the new value is compared with the current one and
/// the call returns whether the value actually changed.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T: Clone> Property<T> {
    /// Create a new property with an initial value.
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Get the current value.
    ///
    /// This clones the value. For large types, consider using `with()` instead.
    pub fn get(&self) -> T {
        self.value.read().clone()
    }

    /// Access the value through a closure without cloning.
    pub fn with<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&T) -> R,
    {
        f(&self.value.read())
    }

    /// Set the value without reporting a change.
    pub fn set_silent(&self, value: T) {
        *self.value.write() = value;
    }
}

impl<T: Clone + PartialEq> Property<T> {
    /// Set the value, returning `true` if the value changed.
    ///
    /// The caller should emit the associated notification signal when this
    /// returns `true`.
    pub fn set(&self, value: T) -> bool {
        let mut current = self.value.write();
        if *current != value {
            *current = value;
            true
        } else {
            false
        }
    }

    /// Set the value, returning the old value if it changed.
    pub fn replace(&self, value: T) -> Option<T> {
        let mut current = self.value.write();
        if *current != value {
            Some(std::mem::replace(&mut *current, value))
        } else {
            None
        }
    }
}

impl<T: Clone> Clone for Property<T> {
    fn clone(&self) -> Self {
        Self::new(self.get())
    }
}

impl<T: Clone + Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: Clone + fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Property")
            .field("value", &self.get())
            .finish()
    }
}
