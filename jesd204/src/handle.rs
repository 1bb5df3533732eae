//! Lightweight handle types for shared ownership and weak back references.
//!
//! Provide two complementary handle types:
//! - [Handle<T>] owns a strong reference to an object using [alloc::sync::Arc]. A registered
//!   JESD204 device keeps one of these on its parent device for as long as the node exists.
//! - [HandleRef<T>] stores a weak reference ([alloc::sync::Weak]) and is what callers pass in
//!   when they register a device; it must not keep the target alive on its own.
//!
//! Both accept unsized targets, so trait objects such as `Handle<dyn ParentDevice>` work.
//! Call [HandleRef::get_handle] to attempt an upgrade; it returns [None] if the strong owner(s)
//! have dropped the object. **Consumers must handle the [None] case explicitly.**
use alloc::sync::{Arc, Weak};
use core::{fmt::Debug, ops::Deref};

/// Strong owning handle backed by [Arc<T>].
///
/// Cloning the handle increments the reference count.
pub struct Handle<T: ?Sized> {
    inner: Arc<T>,
}

impl<T: ?Sized> Deref for Handle<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner
    }
}

impl<T: ?Sized> From<Arc<T>> for Handle<T> {
    fn from(inner: Arc<T>) -> Self {
        Self { inner }
    }
}

impl<T: ?Sized> Clone for Handle<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: ?Sized + Debug> Debug for Handle<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        self.inner.fmt(f)
    }
}

impl<T> Handle<T> {
    pub fn new(value: T) -> Handle<T> {
        Handle {
            inner: Arc::new(value),
        }
    }
}

impl<T: ?Sized> Handle<T> {
    /// Create a non-owning [HandleRef<T>] that refers to the same underlying object.
    ///
    /// The returned [HandleRef<T>] does not increment the strong reference count and
    /// must be upgraded with [HandleRef::get_handle] before use.
    pub fn create_ref(&self) -> HandleRef<T> {
        HandleRef {
            inner: Arc::downgrade(&self.inner),
        }
    }

    /// Whether both handles point at the same object.
    pub fn ptr_eq(this: &Handle<T>, other: &Handle<T>) -> bool {
        Arc::ptr_eq(&this.inner, &other.inner)
    }
}

/// Weak (non-owning) handle backed by [Weak<T>].
///
/// A [HandleRef<T>] represents an optional reference to an object which may be destroyed
/// independently of the referrers.
pub struct HandleRef<T: ?Sized> {
    inner: Weak<T>,
}

impl<T: ?Sized> Clone for HandleRef<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: ?Sized> Debug for HandleRef<T> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("HandleRef")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}

impl<T: ?Sized> HandleRef<T> {
    /// Attempt to upgrade the weak reference into a strong [Handle<T>].
    ///
    /// Return `Some(Handle<T>)` if the target is still alive, otherwise return `None`.
    pub fn get_handle(&self) -> Option<Handle<T>> {
        Weak::upgrade(&self.inner).map(|inner| Handle { inner })
    }
}
