//! Sole Ownership Handle
//!
//! `Sole<T>` owns one heap-allocated record. The record itself never sits on
//! the caller's stack; only the pointer moves through the call chain.
//!
//! Ownership moves, it is never shared:
//!
//! - Rust moves (`let b = a;`) transfer the handle as usual.
//! - [`Sole::take`] and [`Sole::assign_from`] transfer out of a handle that
//!   stays in scope. The source is left empty and reports so through
//!   [`Sole::is_empty`].
//! - There is no `Clone`. Records offer a `duplicate` factory instead, which
//!   builds an independent, separately tracked copy.
//!
//! Dereferencing an empty handle panics with a null-access message. That is a
//! defect in the caller; use [`Sole::try_get`] where emptiness is expected.

use std::fmt;
use std::ops::Deref;

use crate::params::error::{ParamsError, Result};

/// Exclusive owner of one heap-allocated record
pub struct Sole<T> {
    inner: Option<Box<T>>,
}

impl<T> Sole<T> {
    /// Create a handle that owns nothing
    pub fn empty() -> Self {
        Self { inner: None }
    }

    /// Allocate `value` on the heap and take ownership of it
    pub fn new(value: T) -> Self {
        Self {
            inner: Some(Box::new(value)),
        }
    }

    /// Take ownership of an already boxed value
    pub fn from_box(value: Box<T>) -> Self {
        Self { inner: Some(value) }
    }

    /// True when the handle owns nothing
    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    /// Borrow the record, or `None` when empty
    pub fn get(&self) -> Option<&T> {
        self.inner.as_deref()
    }

    /// Borrow the record, or fail with [`ParamsError::EmptyHandle`]
    pub fn try_get(&self) -> Result<&T> {
        self.get().ok_or(ParamsError::EmptyHandle)
    }

    /// Move ownership into a new handle, leaving this one empty
    pub fn take(&mut self) -> Self {
        Self {
            inner: self.inner.take(),
        }
    }

    /// Drop the current record (if any) and take ownership of `other`'s
    ///
    /// `other` is empty afterwards.
    pub fn assign_from(&mut self, other: &mut Sole<T>) {
        self.inner = other.inner.take();
    }

    /// Drop the owned record, leaving the handle empty
    pub fn reset(&mut self) {
        self.inner = None;
    }

    /// Give up the handle and return the boxed record
    pub fn into_inner(self) -> Option<Box<T>> {
        self.inner
    }
}

impl<T> Default for Sole<T> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<T> Deref for Sole<T> {
    type Target = T;

    fn deref(&self) -> &T {
        match self.inner.as_deref() {
            Some(value) => value,
            None => panic!("null access: dereferenced an empty Sole handle"),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Sole<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.inner.as_deref() {
            Some(value) => f.debug_tuple("Sole").field(value).finish(),
            None => f.write_str("Sole(<empty>)"),
        }
    }
}

impl<T> From<Box<T>> for Sole<T> {
    fn from(value: Box<T>) -> Self {
        Self::from_box(value)
    }
}
