//! Change-detecting properties.
//!
//! A [`Property<T>`] holds one value and tells the writer whether a write
//! actually changed it. The error aggregator commits every recomputed error
//! list through one, and only emits `errors_changed` when `set` says the
//! content moved.
//!
//! # Example
//!
//! ```
//! use checkform_core::Property;
//!
//! let errors = Property::new(vec!["job".to_string()]);
//! assert!(!errors.set(vec!["job".to_string()]));
//! assert!(errors.set(Vec::new()));
//! assert!(errors.with(Vec::is_empty));
//! ```

use std::fmt;

use parking_lot::RwLock;

/// A value cell whose writes report change.
pub struct Property<T> {
    value: RwLock<T>,
}

impl<T> Property<T> {
    pub fn new(value: T) -> Self {
        Self {
            value: RwLock::new(value),
        }
    }

    /// Borrow the value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.value.read())
    }
}

impl<T: Clone> Property<T> {
    /// A clone of the current value. Prefer [`Property::with`] for lists.
    pub fn get(&self) -> T {
        self.with(T::clone)
    }
}

impl<T: PartialEq> Property<T> {
    /// Store `value`, returning `true` if it differs from the held one.
    ///
    /// An equal value is dropped and the held one kept.
    pub fn set(&self, value: T) -> bool {
        let mut held = self.value.write();
        if *held == value {
            return false;
        }
        *held = value;
        true
    }
}

impl<T: Default> Default for Property<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Property<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Property").field(&*self.value.read()).finish()
    }
}
