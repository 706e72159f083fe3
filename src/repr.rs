//! This module contains the representation holder, the underlayer type of the
//! [`Seq`](crate::Seq) and [`Map`](crate::Map) collections.
//!
//! Collections are reference counted, so an alias shares the storage of its anchor
//! instead of copying it, and self-referencing documents can be composed.
use std::{
    cell::{Ref, RefCell, RefMut},
    fmt::{Debug, Formatter, Result as FmtResult},
    rc::Rc,
};

/// A shared, mutable collection holder.
///
/// Cloning a holder clones the handle, not the data.
/// Comparison and hashing see through the handle into the data.
///
/// ```
/// use yaml_codec::repr::Shared;
///
/// let a = Shared::new(vec![1, 2]);
/// let b = a.clone();
/// b.borrow_mut().push(3);
/// assert_eq!(a.borrow().len(), 3);
/// assert!(a.ptr_eq(&b));
/// ```
pub struct Shared<T>(Rc<RefCell<T>>);

impl<T> Shared<T> {
    /// Create a new holder.
    pub fn new(data: T) -> Self {
        Self(Rc::new(RefCell::new(data)))
    }

    /// Immutably borrow the data.
    ///
    /// Panics if the data is currently mutably borrowed.
    pub fn borrow(&self) -> Ref<'_, T> {
        self.0.borrow()
    }

    /// Mutably borrow the data.
    ///
    /// Panics if the data is currently borrowed.
    pub fn borrow_mut(&self) -> RefMut<'_, T> {
        self.0.borrow_mut()
    }

    /// Try to borrow the data, `None` if it is mutably borrowed.
    pub fn try_borrow(&self) -> Option<Ref<'_, T>> {
        self.0.try_borrow().ok()
    }

    /// The identity of the holder, stable while the holder is alive.
    pub fn id(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }

    /// Return true if both holders point to the same data.
    pub fn ptr_eq(&self, rhs: &Self) -> bool {
        Rc::ptr_eq(&self.0, &rhs.0)
    }
}

impl<T> Clone for Shared<T> {
    fn clone(&self) -> Self {
        Self(self.0.clone())
    }
}

impl<T: Default> Default for Shared<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T> From<T> for Shared<T> {
    fn from(data: T) -> Self {
        Self::new(data)
    }
}

thread_local! {
    static PRINTING: RefCell<Vec<usize>> = const { RefCell::new(Vec::new()) };
}

impl<T: Debug> Debug for Shared<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        let id = self.id();
        if PRINTING.with(|p| p.borrow().contains(&id)) {
            return f.write_str("<cycle>");
        }
        let Some(data) = self.try_borrow() else {
            return f.write_str("<borrowed>");
        };
        PRINTING.with(|p| p.borrow_mut().push(id));
        let r = data.fmt(f);
        PRINTING.with(|p| p.borrow_mut().pop());
        r
    }
}
