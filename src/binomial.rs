//! Binomial Heap implementation
//!
//! A binomial heap is a forest of binomial trees with:
//! - O(log n) push and extract_min
//! - O(log n) decrease_key
//! - O(log n + log m) meld
//!
//! # Algorithm Overview
//!
//! A binomial heap maintains a root list of binomial trees, where:
//! - Each tree satisfies the heap property
//! - At most one tree of each degree (0, 1, 2, ..., log n)
//! - This is analogous to the binary representation of n
//!
//! **Binomial Tree Bₖ**: Recursively defined:
//! - B₀ is a single node
//! - Bₖ is formed by linking two B_{k-1} trees
//! - Bₖ has exactly 2ᵏ nodes and height k
//!
//! This implementation does not store a degree on each node. The root list is
//! kept in ascending degree order, and because degrees present correspond
//! exactly to the set bits of `len`, the degree of every root is recovered
//! from the degree sequence of the size. Merging two root lists
//! (`consolidate`) then works like binary addition: interleave by degree,
//! link equal-degree trees, and propagate carries.

use crate::traits::{Handle, HeapError, MergeableHeap};
use smallvec::SmallVec;
use std::cell::RefCell;
use std::mem;
use std::rc::{Rc, Weak};

/// Type alias for node reference (strong reference)
type NodeRef<T> = Rc<RefCell<Node<T>>>;

/// Type alias for optional node reference
type NodePtr<T> = Option<NodeRef<T>>;

/// Type alias for weak node reference (for parent links and handles)
type WeakNodeRef<T> = Weak<RefCell<Node<T>>>;

/// Degree list of a root list; at most `usize::BITS` entries, usually few
type DegreeSeq = SmallVec<[u32; 8]>;

/// Handle to an element in a binomial heap
///
/// The handle uses a weak reference to the node, allowing detection of
/// whether the node has been removed from the heap.
///
/// Handle identity is bound to the *node*, not the value: `decrease_key`
/// restores heap order by swapping key values along the parent chain, so a
/// lowered key may bubble away from the node this handle addresses. See
/// [`BinomialHeap::decrease_key`].
pub struct BinomialHandle<T> {
    node: WeakNodeRef<T>,
}

impl<T> Clone for BinomialHandle<T> {
    fn clone(&self) -> Self {
        BinomialHandle {
            node: self.node.clone(),
        }
    }
}

impl<T> PartialEq for BinomialHandle<T> {
    fn eq(&self, other: &Self) -> bool {
        self.node.ptr_eq(&other.node)
    }
}

impl<T> Eq for BinomialHandle<T> {}

impl<T> std::fmt::Debug for BinomialHandle<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinomialHandle")
            .field("valid", &(self.node.strong_count() > 0))
            .finish()
    }
}

impl<T> Handle for BinomialHandle<T> {}

/// Internal node structure for the binomial heap
///
/// Strong references flow from roots downward (`child`, `sibling`); the
/// parent back-reference is weak to avoid cycles. A node's sibling chain is
/// the heap's root list at the top level and its parent's child list
/// everywhere else.
///
/// There is no degree field: the degree of every root is derived from the
/// heap size, and inside a tree the child list of a degree-k node always
/// reads k-1, k-2, ..., 0.
struct Node<T> {
    key: T,
    /// Parent node - weak reference to avoid cycles (None if root)
    parent: Option<WeakNodeRef<T>>,
    /// First child in child list - strong reference (None if leaf)
    child: NodePtr<T>,
    /// Next sibling - strong reference (None if last in its list)
    sibling: NodePtr<T>,
}

/// Binomial min-heap over comparable keys
///
/// The root list hangs off `head` in ascending degree order; `len` counts all
/// nodes and doubles as the degree bookkeeping (set bits of `len` are exactly
/// the degrees present in the root list).
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
pub struct BinomialHeap<T: Ord> {
    /// First root of the root list, ascending degree (None if empty)
    head: NodePtr<T>,
    /// Number of elements in the heap
    len: usize,
}

// No manual Drop needed - Rc handles cleanup automatically when strong refs
// go to 0, and both sibling chains and tree heights are O(log n) deep.

impl<T: Ord> MergeableHeap<T> for BinomialHeap<T> {
    type Handle = BinomialHandle<T>;

    fn new() -> Self {
        Self { head: None, len: 0 }
    }

    fn len(&self) -> usize {
        self.len
    }

    /// Inserts a new key into the heap
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// Builds a singleton B₀ tree and consolidates it with the current root
    /// list, exactly like adding 1 in binary: a carry chain may cascade
    /// through every tree already present. The lazy alternative (append to
    /// the root list, defer linking to the next extract) would give O(1)
    /// amortized pushes, but it breaks the invariant that the root list
    /// always matches the degree sequence of `len`, which is what lets this
    /// heap avoid storing a degree per node. Eager consolidation is the
    /// deliberate choice here.
    fn push(&mut self, key: T) -> Self::Handle {
        let node = Rc::new(RefCell::new(Node {
            key,
            parent: None,
            child: None,
            sibling: None,
        }));

        // Create the handle before the node is moved into the root list
        let handle = BinomialHandle {
            node: Rc::downgrade(&node),
        };

        let head = self.head.take();
        self.head = Self::consolidate(head, self.len, Some(node), 1);
        self.len += 1;
        handle
    }

    /// Returns a reference to the minimum key
    ///
    /// **Time Complexity**: O(log n) - one scan over the root list
    fn find_min(&self) -> Result<&T, HeapError> {
        let (min, _) = self.min_root().ok_or(HeapError::EmptyHeap)?;

        // SAFETY: We return a reference tied to the &self lifetime.
        // The Rc keeps the node alive as long as it's in the root list.
        // This is safe because:
        // 1. The node is owned by the root list (strong ref)
        // 2. We're borrowing self immutably, so the root list can't change
        // 3. RefCell contents won't move while we hold &self
        let node_ptr = min.as_ptr();
        unsafe { Ok(&(*node_ptr).key) }
    }

    /// Removes and returns the minimum key
    ///
    /// **Time Complexity**: O(log n) worst-case
    ///
    /// **Algorithm**:
    /// 1. Scan the root list for the minimum root and its degree d
    /// 2. Detach it; its subtree covered 2ᵈ nodes, so it leaves 2ᵈ - 1
    ///    children behind
    /// 3. The children sit in descending degree order (d-1, ..., 0); reverse
    ///    them in place into an ascending-degree root list
    /// 4. Consolidate the reversed children with the remaining root list
    fn extract_min(&mut self) -> Result<T, HeapError> {
        let (min, degree) = self.min_root().ok_or(HeapError::EmptyHeap)?;
        self.unlink_root(&min);

        // 2^degree nodes covered by the minimum root, including itself
        let covered = 1usize << degree;
        let children = Self::reverse_children(min.borrow_mut().child.take());

        let head = self.head.take();
        self.head = Self::consolidate(head, self.len - covered, children, covered - 1);
        self.len -= 1;

        // At this point `min` holds the only strong reference: it was
        // unlinked from the root list and its children were detached.
        let node = Rc::try_unwrap(min)
            .ok()
            .expect("extracted root should have no other strong references")
            .into_inner();
        Ok(node.key)
    }

    /// Absorbs all elements of `other` into this heap
    ///
    /// **Time Complexity**: O(log n + log m)
    ///
    /// Consolidates the two root lists and sums the sizes. Duplicate keys are
    /// kept; the heap is a multiset. `other` is consumed, so every node it
    /// owned now belongs to `self`.
    fn meld(&mut self, mut other: Self) {
        let left = self.head.take();
        let right = other.head.take();
        self.head = Self::consolidate(left, self.len, right, other.len);
        self.len += other.len;
        other.len = 0;
    }

    /// Lowers the key of the element identified by `handle`
    ///
    /// **Time Complexity**: O(log n) - bounded by tree height
    ///
    /// A new key greater than the current one is deliberately ignored and
    /// reported as `Ok(())`; this operation never increases keys.
    ///
    /// Heap order is restored by swapping key *values* along the parent
    /// chain, never relinking nodes. The handle therefore stays bound to the
    /// physical node: after a decrease that bubbles the value upward, the
    /// handle no longer addresses the decreased value but whatever value the
    /// node received in the swaps.
    fn decrease_key(&mut self, handle: &Self::Handle, new_key: T) -> Result<(), HeapError> {
        let node = handle.node.upgrade().ok_or(HeapError::InvalidHandle)?;

        if new_key > node.borrow().key {
            return Ok(());
        }

        node.borrow_mut().key = new_key;
        Self::bubble_up(node);
        Ok(())
    }
}

impl<T: Ord> BinomialHeap<T> {
    /// Computes the ascending list of tree degrees present in a heap of `n`
    /// elements: the positions of the set bits of `n`, least-significant
    /// first. Pure, O(log n).
    ///
    /// A heap of size 13 (0b1101) holds trees of degrees [0, 2, 3].
    fn degree_sequence(mut n: usize) -> DegreeSeq {
        let mut degrees = DegreeSeq::new();
        let mut degree = 0;
        while n != 0 {
            if n & 1 != 0 {
                degrees.push(degree);
            }
            degree += 1;
            n >>= 1;
        }
        degrees
    }

    /// Merges two ascending-degree root lists into one
    ///
    /// **Time Complexity**: O(log n + log m)
    ///
    /// The lists arrive with their sizes rather than per-node degrees; each
    /// list's degrees are recovered with [`Self::degree_sequence`]. The merge
    /// mirrors binary addition:
    ///
    /// 1. Interleave the two lists by ascending degree (a classic two-way
    ///    merge), which may leave adjacent duplicate degrees.
    /// 2. Walk the merged list with a three-entry window. When the current
    ///    and next entry share a degree and no third entry of that degree
    ///    follows, link them: the root with the larger key becomes the new
    ///    leftmost child of the other, and the survivor's degree grows by
    ///    one. A third entry of the same degree means a carry is pending at
    ///    the next position, so the merge is deferred one step - exactly how
    ///    a carry propagates in addition.
    ///
    /// Ties on equal keys go to the earlier entry, keeping merges
    /// deterministic. The returned list has at most one tree per degree.
    fn consolidate(
        left: NodePtr<T>,
        left_len: usize,
        right: NodePtr<T>,
        right_len: usize,
    ) -> NodePtr<T> {
        let left_degrees = Self::degree_sequence(left_len);
        let right_degrees = Self::degree_sequence(right_len);
        let left_roots = Self::take_chain(left);
        let right_roots = Self::take_chain(right);
        debug_assert_eq!(left_roots.len(), left_degrees.len());
        debug_assert_eq!(right_roots.len(), right_degrees.len());

        // Step 1: interleave-merge by ascending degree.
        let mut roots: Vec<NodeRef<T>> = Vec::with_capacity(left_roots.len() + right_roots.len());
        let mut degrees = DegreeSeq::new();
        let mut left_iter = left_roots.into_iter().zip(left_degrees).peekable();
        let mut right_iter = right_roots.into_iter().zip(right_degrees).peekable();
        loop {
            // On equal degrees the left list goes first, so equal-key links
            // deterministically keep the left operand as the parent.
            let take_left = match (left_iter.peek(), right_iter.peek()) {
                (Some((_, ld)), Some((_, rd))) => ld <= rd,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            let (node, degree) = if take_left {
                left_iter.next().expect("peeked entry must exist")
            } else {
                right_iter.next().expect("peeked entry must exist")
            };
            roots.push(node);
            degrees.push(degree);
        }

        // Step 2: resolve duplicate degrees with carry deferral. Each input
        // list has distinct degrees, so at most two entries share a degree
        // before a carry lands on them - three at most transiently.
        let mut pos = 0;
        while pos + 1 < roots.len() {
            let duplicate = degrees[pos] == degrees[pos + 1];
            let carry_pending = pos + 2 < roots.len() && degrees[pos] == degrees[pos + 2];
            if !duplicate || carry_pending {
                pos += 1;
                continue;
            }

            // Link the pair; the root with the smaller key survives. The
            // survivor may now collide with its next neighbor, so `pos` is
            // re-examined rather than advanced.
            let left_wins = roots[pos].borrow().key <= roots[pos + 1].borrow().key;
            let child = if left_wins {
                degrees.remove(pos + 1);
                roots.remove(pos + 1)
            } else {
                degrees.remove(pos);
                roots.remove(pos)
            };
            Self::add_leftmost_child(&roots[pos], child);
            degrees[pos] += 1;
        }

        Self::link_chain(roots)
    }

    /// Unlinks a sibling chain into a vector of parentless trees
    fn take_chain(head: NodePtr<T>) -> Vec<NodeRef<T>> {
        let mut nodes = Vec::new();
        let mut current = head;
        while let Some(node) = current {
            current = node.borrow_mut().sibling.take();
            nodes.push(node);
        }
        nodes
    }

    /// Relinks a vector of trees into a sibling chain, returning its head
    fn link_chain(nodes: Vec<NodeRef<T>>) -> NodePtr<T> {
        let mut head: NodePtr<T> = None;
        for node in nodes.into_iter().rev() {
            node.borrow_mut().sibling = head.take();
            head = Some(node);
        }
        head
    }

    /// Makes `child` the new leftmost child of `parent`
    ///
    /// Both must be roots of trees of equal degree; afterwards the combined
    /// tree has degree one higher. O(1).
    fn add_leftmost_child(parent: &NodeRef<T>, child: NodeRef<T>) {
        let mut parent_ref = parent.borrow_mut();
        {
            let mut child_ref = child.borrow_mut();
            child_ref.parent = Some(Rc::downgrade(parent));
            child_ref.sibling = parent_ref.child.take();
        }
        parent_ref.child = Some(child);
    }

    /// Scans the root list for the minimum root and its degree
    ///
    /// Degrees are read off `degree_sequence(len)` in step with the walk, so
    /// the caller learns the subtree size (2^degree) for free. Returns None
    /// on an empty heap. Ties keep the earliest root.
    fn min_root(&self) -> Option<(NodeRef<T>, u32)> {
        let degrees = Self::degree_sequence(self.len);
        let mut current = self.head.clone()?;
        let mut min = Rc::clone(&current);
        let mut min_degree = degrees[0];

        let mut pos = 1;
        loop {
            let next = current.borrow().sibling.clone();
            match next {
                Some(node) => {
                    if node.borrow().key < min.borrow().key {
                        min = Rc::clone(&node);
                        min_degree = degrees[pos];
                    }
                    current = node;
                    pos += 1;
                }
                None => break,
            }
        }

        Some((min, min_degree))
    }

    /// Detaches `root` from the root list, keeping the rest intact
    fn unlink_root(&mut self, root: &NodeRef<T>) {
        let head = self
            .head
            .as_ref()
            .expect("unlink_root called on an empty heap");
        if Rc::ptr_eq(head, root) {
            let next = root.borrow_mut().sibling.take();
            self.head = next;
            return;
        }

        let mut prev = Rc::clone(head);
        loop {
            let next = prev
                .borrow()
                .sibling
                .clone()
                .expect("root must be present in the root list");
            if Rc::ptr_eq(&next, root) {
                let after = root.borrow_mut().sibling.take();
                prev.borrow_mut().sibling = after;
                return;
            }
            prev = next;
        }
    }

    /// Reverses a detached child list into an ascending-degree root list
    ///
    /// Child lists read left to right in descending degree order; once the
    /// parent is gone they must become a root list for consolidation, which
    /// expects ascending degrees. Parent links are cleared along the way.
    fn reverse_children(head: NodePtr<T>) -> NodePtr<T> {
        let mut reversed: NodePtr<T> = None;
        let mut current = head;
        while let Some(node) = current {
            {
                let mut node_ref = node.borrow_mut();
                current = node_ref.sibling.take();
                node_ref.parent = None;
                node_ref.sibling = reversed.take();
            }
            reversed = Some(node);
        }
        reversed
    }

    /// Bubbles a lowered key up its tree to restore heap order
    ///
    /// Swaps key values with the parent while the parent's key is greater;
    /// the tree structure never changes, only payloads move. O(log n), the
    /// height of the tallest binomial tree.
    fn bubble_up(node: NodeRef<T>) {
        let mut current = node;

        loop {
            let parent_weak = {
                let node_ref = current.borrow();
                match &node_ref.parent {
                    Some(p) => p.clone(),
                    None => break, // Reached a root
                }
            };

            let parent = match parent_weak.upgrade() {
                Some(p) => p,
                None => break, // Parent gone (shouldn't happen)
            };

            if current.borrow().key >= parent.borrow().key {
                break; // Heap property satisfied
            }

            {
                let mut current_ref = current.borrow_mut();
                let mut parent_ref = parent.borrow_mut();
                mem::swap(&mut current_ref.key, &mut parent_ref.key);
            }

            current = parent;
        }
    }

    /// Verifies the structural invariants of the whole heap
    ///
    /// Intended for tests and debugging. Checks that:
    /// - roots are parentless and their degrees, in order, equal the degree
    ///   sequence of `len`
    /// - every tree is a well-formed binomial tree: a degree-k root has
    ///   children of degrees k-1, k-2, ..., 0 in that order
    /// - every node's key is <= the keys of all its children (heap order)
    /// - every parent back-reference points at the actual parent
    /// - the node count equals `len`
    pub fn verify_internal_structure(&self) -> bool {
        let degrees = Self::degree_sequence(self.len);
        let mut counted = 0usize;
        let mut pos = 0;

        let mut current = self.head.clone();
        while let Some(node) = current {
            if pos >= degrees.len() || node.borrow().parent.is_some() {
                return false;
            }
            match Self::verify_tree(&node, degrees[pos]) {
                Some(count) => counted += count,
                None => return false,
            }
            current = node.borrow().sibling.clone();
            pos += 1;
        }

        pos == degrees.len() && counted == self.len
    }

    /// Recursively checks one binomial tree, returning its node count
    fn verify_tree(node: &NodeRef<T>, degree: u32) -> Option<usize> {
        let mut count = 1usize;
        let mut expected = degree;

        let mut child = node.borrow().child.clone();
        while let Some(c) = child {
            if expected == 0 {
                return None; // More children than the degree allows
            }
            expected -= 1;

            {
                let c_ref = c.borrow();
                if c_ref.key < node.borrow().key {
                    return None; // Heap order violated
                }
                let parent = c_ref.parent.as_ref()?.upgrade()?;
                if !Rc::ptr_eq(&parent, node) {
                    return None; // Stale parent back-reference
                }
            }

            count += Self::verify_tree(&c, expected)?;
            child = c.borrow().sibling.clone();
        }

        if expected != 0 {
            return None; // Fewer children than the degree requires
        }
        Some(count)
    }
}

impl<T: Ord> Default for BinomialHeap<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord> Extend<T> for BinomialHeap<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for key in iter {
            self.push(key);
        }
    }
}

impl<T: Ord> FromIterator<T> for BinomialHeap<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut heap = Self::new();
        heap.extend(iter);
        heap
    }
}
