//! Mergeable binomial min-heap with handle-based decrease-key
//!
//! This crate provides a binomial heap: a priority queue built from a forest
//! of power-of-two-sized trees, mirroring the binary representation of its
//! size. Merging two heaps works like binary addition with carries, which is
//! what makes structural union cheap.
//!
//! # Features
//!
//! - **push**: O(log n) worst-case, returns a handle for later `decrease_key`
//! - **find_min / extract_min**: O(log n), reported as `Err(HeapError::EmptyHeap)`
//!   on an empty heap
//! - **meld**: O(log n + log m) structural union that consumes the donor heap
//! - **decrease_key**: O(log n) bubble-up by value swapping; larger keys are
//!   a deliberate no-op
//!
//! # Example
//!
//! ```rust
//! use binomial_heap::binomial::BinomialHeap;
//! use binomial_heap::MergeableHeap;
//!
//! let mut heap: BinomialHeap<i32> = [4, 3, 5].into_iter().collect();
//! let handle = heap.push(6);
//! assert_eq!(heap.find_min(), Ok(&3));
//!
//! heap.decrease_key(&handle, 0).unwrap();
//! assert_eq!(heap.extract_min(), Ok(0));
//! assert_eq!(heap.find_min(), Ok(&3));
//! ```

pub mod binomial;
pub mod traits;

// Re-export the main trait and error type for convenience
pub use traits::{Handle, HeapError, MergeableHeap};
