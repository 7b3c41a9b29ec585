//! Bounded least-recently-used map.

use std::collections::HashMap;
use std::hash::Hash;
use std::num::NonZeroUsize;

#[derive(Debug)]
struct Node<K, V> {
    key: K,
    value: V,
    prev: Option<usize>,
    next: Option<usize>,
}

/// LRU cache with a fixed capacity.
///
/// `head` is the most recently used entry, `tail` the next to be evicted.
#[derive(Debug)]
pub struct GenerationCache<K, V> {
    index: HashMap<K, usize>,
    nodes: Vec<Node<K, V>>,
    head: Option<usize>,
    tail: Option<usize>,
    capacity: NonZeroUsize,
}

impl<K: Hash + Eq + Clone, V> GenerationCache<K, V> {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self {
            index: HashMap::with_capacity(capacity.get()),
            nodes: Vec::with_capacity(capacity.get()),
            head: None,
            tail: None,
            capacity,
        }
    }

    /// True if `key` is present. Does not touch recency.
    pub fn has(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Fetch `key` and mark it most recently used.
    pub fn get(&mut self, key: &K) -> Option<&V> {
        let idx = *self.index.get(key)?;
        self.move_to_front(idx);
        Some(&self.nodes[idx].value)
    }

    /// Fetch `key` without changing recency.
    pub fn peek(&self, key: &K) -> Option<&V> {
        self.index.get(key).map(|&idx| &self.nodes[idx].value)
    }

    /// Insert or replace `key`, marking it most recently used.
    ///
    /// Returns the evicted entry when a new key pushed the cache past its
    /// capacity. Replacing an existing key never evicts.
    pub fn set(&mut self, key: K, value: V) -> Option<(K, V)> {
        if let Some(&idx) = self.index.get(&key) {
            self.nodes[idx].value = value;
            self.move_to_front(idx);
            return None;
        }

        if self.nodes.len() < self.capacity.get() {
            let idx = self.nodes.len();
            self.nodes.push(Node {
                key: key.clone(),
                value,
                prev: None,
                next: None,
            });
            self.index.insert(key, idx);
            self.push_front(idx);
            return None;
        }

        // Full: recycle the least recently used slot.
        let idx = self.tail?;
        self.unlink(idx);
        let node = &mut self.nodes[idx];
        let old_key = std::mem::replace(&mut node.key, key.clone());
        let old_value = std::mem::replace(&mut node.value, value);
        self.index.remove(&old_key);
        self.index.insert(key, idx);
        self.push_front(idx);
        Some((old_key, old_value))
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity.get()
    }

    /// Keys from most to least recently used.
    pub fn keys(&self) -> impl Iterator<Item = &K> + '_ {
        let mut cursor = self.head;
        std::iter::from_fn(move || {
            let idx = cursor?;
            cursor = self.nodes[idx].next;
            Some(&self.nodes[idx].key)
        })
    }

    fn move_to_front(&mut self, idx: usize) {
        if self.head == Some(idx) {
            return;
        }
        self.unlink(idx);
        self.push_front(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = (self.nodes[idx].prev, self.nodes[idx].next);
        match prev {
            Some(p) => self.nodes[p].next = next,
            None => self.head = next,
        }
        match next {
            Some(n) => self.nodes[n].prev = prev,
            None => self.tail = prev,
        }
        self.nodes[idx].prev = None;
        self.nodes[idx].next = None;
    }

    fn push_front(&mut self, idx: usize) {
        self.nodes[idx].prev = None;
        self.nodes[idx].next = self.head;
        if let Some(h) = self.head {
            self.nodes[h].prev = Some(idx);
        }
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
    }
}
