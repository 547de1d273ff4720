//! Trait surface for mergeable heaps
//!
//! This module provides:
//!
//! - [`MergeableHeap`]: the operations a mergeable priority queue supports,
//!   including handle-based `decrease_key`
//! - [`Handle`]: marker trait for the opaque element handles returned by `push`
//! - [`HeapError`]: the failure conditions heap operations can report
//!
//! Unlike `std::collections::BinaryHeap` these are min-heaps, and `push`
//! returns a handle so the caller can later lower an element's key in place.

use std::fmt;

/// Error type for heap operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeapError {
    /// `find_min` or `extract_min` was called on an empty heap
    EmptyHeap,
    /// The handle no longer identifies a live element (it was extracted)
    InvalidHandle,
}

impl fmt::Display for HeapError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HeapError::EmptyHeap => write!(f, "heap is empty"),
            HeapError::InvalidHandle => {
                write!(f, "handle is no longer valid (element was removed)")
            }
        }
    }
}

impl std::error::Error for HeapError {}

/// A handle to an element in the heap, used for decrease_key operations
///
/// This is an opaque type that identifies a specific element in the heap.
/// The exact implementation varies by heap type.
///
/// Note: Handles may be `Clone` but not necessarily `Copy`, depending on
/// the underlying implementation (e.g., reference-counted vs raw pointer).
pub trait Handle: Clone + PartialEq + Eq {}

/// A min-heap that supports structural union with another heap
///
/// The heap stores comparable keys. `push` returns a [`Handle`] that can be
/// used later with `decrease_key`. `meld` consumes the other heap, so the
/// donor cannot be observed in a half-transferred state.
///
/// Empty-heap conditions are reported as [`HeapError::EmptyHeap`] rather than
/// a default value; observability is left entirely to the caller.
///
/// # Example
///
/// ```rust
/// use binomial_heap::binomial::BinomialHeap;
/// use binomial_heap::MergeableHeap;
///
/// let mut heap = BinomialHeap::new();
/// let handle = heap.push(5);
/// heap.push(3);
/// heap.decrease_key(&handle, 1).unwrap();
/// assert_eq!(heap.find_min(), Ok(&1));
/// ```
pub trait MergeableHeap<T: Ord> {
    /// The handle type for this heap, used to reference elements for decrease_key
    type Handle: Handle;

    /// Creates a new empty heap
    fn new() -> Self;

    /// Returns the number of elements in the heap
    fn len(&self) -> usize;

    /// Returns true if the heap is empty
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Inserts a key, returning a handle for later `decrease_key` calls
    fn push(&mut self, key: T) -> Self::Handle;

    /// Returns a reference to the minimum key
    ///
    /// # Errors
    /// Returns `HeapError::EmptyHeap` if the heap contains no elements.
    fn find_min(&self) -> Result<&T, HeapError>;

    /// Removes and returns the minimum key
    ///
    /// # Errors
    /// Returns `HeapError::EmptyHeap` if the heap contains no elements.
    fn extract_min(&mut self) -> Result<T, HeapError>;

    /// Absorbs all elements of `other` into this heap
    ///
    /// `other` is consumed; afterwards every element it held is owned by
    /// `self` and `self.len()` has grown by `other.len()`.
    fn meld(&mut self, other: Self);

    /// Lowers the key of the element identified by `handle`
    ///
    /// If `new_key` is greater than the element's current key the call is a
    /// deliberate no-op and returns `Ok(())`; callers must not rely on it to
    /// increase keys.
    ///
    /// # Errors
    /// Returns `HeapError::InvalidHandle` if the element behind the handle
    /// no longer exists (it was removed by `extract_min`).
    fn decrease_key(&mut self, handle: &Self::Handle, new_key: T) -> Result<(), HeapError>;
}
