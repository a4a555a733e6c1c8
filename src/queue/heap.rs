// src/queue/heap.rs

//! Array-backed binary min-heap with a pluggable comparator.

use std::cmp::Ordering;
use std::fmt;

/// Binary min-heap ordered by a three-way comparator.
///
/// The element that compares lowest is always at the root, so
/// [`PriorityQueue::extract_min`] returns it in `O(log n)`. The default
/// comparator is [`Ord::cmp`] (ascending); pass any
/// `Fn(&T, &T) -> Ordering` to [`PriorityQueue::with_comparator`] to change
/// the direction or the key.
///
/// Invariant, held before and after every public call: for every non-root
/// index `i`, `heap[parent(i)]` does not compare greater than `heap[i]`.
#[derive(Clone)]
pub struct PriorityQueue<T, C = fn(&T, &T) -> Ordering> {
    heap: Vec<T>,
    compare: C,
}

impl<T: Ord> PriorityQueue<T> {
    /// Empty queue ordered ascending by `T`'s own ordering.
    pub fn new() -> Self {
        Self::with_comparator(T::cmp)
    }
}

impl<T: Ord> Default for PriorityQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T, C> PriorityQueue<T, C>
where
    C: Fn(&T, &T) -> Ordering,
{
    pub fn with_comparator(compare: C) -> Self {
        Self {
            heap: Vec::new(),
            compare,
        }
    }

    /// Append `item` and sift it up to its place.
    pub fn insert(&mut self, item: T) {
        self.heap.push(item);
        self.sift_up(self.heap.len() - 1);
    }

    /// Remove and return the lowest element, or `None` if the queue is empty.
    pub fn extract_min(&mut self) -> Option<T> {
        if self.heap.is_empty() {
            return None;
        }

        // Moves the last element into the root slot.
        let min = self.heap.swap_remove(0);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(min)
    }

    /// The lowest element without removing it.
    pub fn peek(&self) -> Option<&T> {
        self.heap.first()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Elements in heap (array) order, not sorted order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.heap.iter()
    }

    /// Copy of the backing array in heap order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        self.heap.clone()
    }

    /// Consume the queue, yielding its elements in extraction order.
    pub fn into_sorted_vec(mut self) -> Vec<T> {
        let mut sorted = Vec::with_capacity(self.heap.len());
        while let Some(item) = self.extract_min() {
            sorted.push(item);
        }
        sorted
    }

    /// Keep only the elements for which `keep` returns `true`, then restore
    /// heap order.
    pub fn retain<F>(&mut self, keep: F)
    where
        F: FnMut(&T) -> bool,
    {
        let before = self.heap.len();
        self.heap.retain(keep);
        if self.heap.len() != before {
            self.rebuild();
        }
    }

    pub fn clear(&mut self) {
        self.heap.clear();
    }

    /// Check the heap invariant over the whole array.
    pub fn is_heap(&self) -> bool {
        (1..self.heap.len())
            .all(|i| (self.compare)(&self.heap[parent(i)], &self.heap[i]) != Ordering::Greater)
    }

    fn rebuild(&mut self) {
        for index in (0..self.heap.len() / 2).rev() {
            self.sift_down(index);
        }
    }

    fn sift_up(&mut self, mut index: usize) {
        while index > 0 {
            let parent = parent(index);
            if (self.compare)(&self.heap[index], &self.heap[parent]) != Ordering::Less {
                break;
            }
            self.heap.swap(index, parent);
            index = parent;
        }
    }

    fn sift_down(&mut self, mut index: usize) {
        let len = self.heap.len();

        loop {
            let left = 2 * index + 1;
            let right = left + 1;
            let mut smallest = index;

            if left < len && (self.compare)(&self.heap[left], &self.heap[smallest]) == Ordering::Less {
                smallest = left;
            }
            if right < len && (self.compare)(&self.heap[right], &self.heap[smallest]) == Ordering::Less {
                smallest = right;
            }
            if smallest == index {
                break;
            }

            self.heap.swap(index, smallest);
            index = smallest;
        }
    }
}

fn parent(index: usize) -> usize {
    (index - 1) / 2
}

impl<T: fmt::Debug, C> fmt::Debug for PriorityQueue<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PriorityQueue")
            .field("len", &self.heap.len())
            .field("heap", &self.heap)
            .finish()
    }
}
