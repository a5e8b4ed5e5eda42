//! Shareable storage cells that flags write through.
//!
//! A [`Slot`] is allocated by the application, handed to a flag by reference,
//! and read back after parsing. The flag never owns the slot's lifetime; it
//! only writes the resolved value into it. Cloning a slot clones the handle,
//! not the value, so the application and the flag observe the same cell.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// A single-threaded, reference-counted storage cell.
pub struct Slot<T>(Rc<RefCell<T>>);

impl<T> Slot<T> {
    pub fn new(value: T) -> Self {
        Slot(Rc::new(RefCell::new(value)))
    }

    /// Replace the stored value.
    pub fn set(&self, value: T) {
        *self.0.borrow_mut() = value;
    }

    /// Run `f` against the stored value without cloning it.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.0.borrow())
    }

    /// Whether two handles point at the same cell.
    pub fn same_cell(&self, other: &Slot<T>) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Stable identity of the underlying cell, used for aliasing diagnostics.
    pub(crate) fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl<T: Clone> Slot<T> {
    pub fn get(&self) -> T {
        self.0.borrow().clone()
    }
}

impl<T: Default> Default for Slot<T> {
    fn default() -> Self {
        Slot::new(T::default())
    }
}

impl<T> Clone for Slot<T> {
    fn clone(&self) -> Self {
        Slot(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for Slot<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Slot").field(&*self.0.borrow()).finish()
    }
}
