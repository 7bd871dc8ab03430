use std::cmp::Ordering;

use thiserror::Error;

/// Error kind for operations through a queue entry handle.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ApqError {
    /// The referenced element has been removed from its queue.
    #[error("queue entry is no longer live")]
    InvalidEntry,
}

/// Handle to an element inside an adaptable priority queue.
///
/// The handle stays valid until its element is removed (by `remove_min`
/// or `remove`). After that every operation through it fails with
/// [`ApqError::InvalidEntry`], even if the storage slot has since been
/// reused for another element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntryRef {
    slot: usize,
    generation: u64,
}

#[derive(Debug, Clone)]
struct Entry<K, V> {
    key: K,
    value: V,
    /// Current index in the owning queue's backing array.
    pos: usize,
}

#[derive(Debug, Clone)]
struct Slot<K, V> {
    generation: u64,
    entry: Option<Entry<K, V>>,
}

/// Slot arena shared by both queue implementations. Vacating a slot bumps
/// its generation, which is what makes outstanding handles detectably
/// stale.
#[derive(Debug, Clone)]
struct EntrySlab<K, V> {
    slots: Vec<Slot<K, V>>,
    free: Vec<usize>,
}

impl<K, V> EntrySlab<K, V> {
    fn new() -> Self {
        EntrySlab {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    fn with_capacity(capacity: usize) -> Self {
        EntrySlab {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
        }
    }

    fn insert(&mut self, key: K, value: V, pos: usize) -> EntryRef {
        let entry = Entry { key, value, pos };
        match self.free.pop() {
            Some(slot) => {
                self.slots[slot].entry = Some(entry);
                EntryRef {
                    slot,
                    generation: self.slots[slot].generation,
                }
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(entry),
                });
                EntryRef {
                    slot: self.slots.len() - 1,
                    generation: 0,
                }
            }
        }
    }

    /// Empty `slot` and return its element. Bumps the generation so every
    /// handle issued for the old occupant stops resolving.
    fn vacate(&mut self, slot: usize) -> (K, V) {
        // Slots named by a queue's backing array are always occupied.
        let entry = self.slots[slot].entry.take().unwrap();
        self.slots[slot].generation += 1;
        self.free.push(slot);
        (entry.key, entry.value)
    }

    fn resolve(&self, entry: EntryRef) -> Result<usize, ApqError> {
        match self.slots.get(entry.slot) {
            Some(slot) if slot.generation == entry.generation && slot.entry.is_some() => {
                Ok(entry.slot)
            }
            _ => Err(ApqError::InvalidEntry),
        }
    }

    fn get(&self, slot: usize) -> &Entry<K, V> {
        self.slots[slot].entry.as_ref().unwrap()
    }

    fn get_mut(&mut self, slot: usize) -> &mut Entry<K, V> {
        self.slots[slot].entry.as_mut().unwrap()
    }
}

/// Operations a shortest-path run needs from its open-set queue.
///
/// Implemented by [`HeapApq`] and [`ListApq`] so callers can pick the
/// queue backend per run.
pub trait AdaptablePriorityQueue<K: Ord, V> {
    /// Insert an element and return a handle for later key updates.
    fn add(&mut self, key: K, value: V) -> EntryRef;
    /// Remove and return the element with the smallest key, or `None`
    /// when the queue is empty.
    fn remove_min(&mut self) -> Option<(K, V)>;
    /// Change the key of a live element, restoring any ordering the
    /// queue maintains.
    fn update_key(&mut self, entry: EntryRef, new_key: K) -> Result<(), ApqError>;
    /// Read the current key of a live element.
    fn get_key(&self, entry: EntryRef) -> Result<&K, ApqError>;
    fn len(&self) -> usize;
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Adaptable priority queue backed by an array binary min-heap.
///
/// The heap array stores slot indices into the element arena; each
/// element records its current heap position, so key updates and
/// arbitrary removals run in O(log n). Ties between equal keys are
/// broken by whichever path the sift takes and should not be relied on.
#[derive(Debug, Clone)]
pub struct HeapApq<K, V> {
    slab: EntrySlab<K, V>,
    heap: Vec<usize>,
}

impl<K: Ord, V> HeapApq<K, V> {
    pub fn new() -> Self {
        HeapApq {
            slab: EntrySlab::new(),
            heap: Vec::new(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        HeapApq {
            slab: EntrySlab::with_capacity(capacity),
            heap: Vec::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Insert `(key, value)` and return a handle to the new element.
    pub fn add(&mut self, key: K, value: V) -> EntryRef {
        let pos = self.heap.len();
        let entry = self.slab.insert(key, value, pos);
        self.heap.push(entry.slot);
        self.sift_up(pos);
        entry
    }

    /// Peek the minimum key and its value without removing them.
    pub fn min(&self) -> Option<(&K, &V)> {
        let &slot = self.heap.first()?;
        let entry = self.slab.get(slot);
        Some((&entry.key, &entry.value))
    }

    /// Remove and return the minimum element.
    pub fn remove_min(&mut self) -> Option<(K, V)> {
        if self.heap.is_empty() {
            return None;
        }
        let root = self.heap[0];
        let last = self.heap.pop().unwrap();
        if !self.heap.is_empty() {
            self.heap[0] = last;
            self.slab.get_mut(last).pos = 0;
        }
        let removed = self.slab.vacate(root);
        if !self.heap.is_empty() {
            self.sift_down(0);
        }
        Some(removed)
    }

    /// Change the key of a live element, sifting it up on a decrease and
    /// down on an increase. An unchanged key leaves the heap untouched.
    pub fn update_key(&mut self, entry: EntryRef, new_key: K) -> Result<(), ApqError> {
        let slot = self.slab.resolve(entry)?;
        let element = self.slab.get_mut(slot);
        let order = new_key.cmp(&element.key);
        element.key = new_key;
        let pos = element.pos;
        match order {
            Ordering::Less => self.sift_up(pos),
            Ordering::Greater => self.sift_down(pos),
            Ordering::Equal => {}
        }
        Ok(())
    }

    pub fn get_key(&self, entry: EntryRef) -> Result<&K, ApqError> {
        let slot = self.slab.resolve(entry)?;
        Ok(&self.slab.get(slot).key)
    }

    /// Remove a live element from any position.
    ///
    /// The last array element takes over the vacated position and is then
    /// sifted in whichever direction restores the heap shape: up when it
    /// is smaller than its new parent, down otherwise.
    pub fn remove(&mut self, entry: EntryRef) -> Result<(K, V), ApqError> {
        let slot = self.slab.resolve(entry)?;
        let pos = self.slab.get(slot).pos;
        let last = self.heap.pop().unwrap();
        if pos < self.heap.len() {
            self.heap[pos] = last;
            self.slab.get_mut(last).pos = pos;
        }
        let removed = self.slab.vacate(slot);
        if pos < self.heap.len() {
            if pos > 0 && self.key_at(pos) < self.key_at(Self::parent(pos)) {
                self.sift_up(pos);
            } else {
                self.sift_down(pos);
            }
        }
        Ok(removed)
    }

    fn parent(pos: usize) -> usize {
        (pos - 1) / 2
    }

    fn left(pos: usize) -> usize {
        2 * pos + 1
    }

    fn right(pos: usize) -> usize {
        2 * pos + 2
    }

    fn key_at(&self, pos: usize) -> &K {
        &self.slab.get(self.heap[pos]).key
    }

    fn sift_up(&mut self, mut pos: usize) {
        while pos > 0 {
            let parent = Self::parent(pos);
            if self.key_at(pos) < self.key_at(parent) {
                self.swap_heap(pos, parent);
                pos = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut pos: usize) {
        loop {
            let left = Self::left(pos);
            if left >= self.heap.len() {
                break;
            }
            let mut child = left;
            let right = Self::right(pos);
            if right < self.heap.len() && self.key_at(right) < self.key_at(left) {
                child = right;
            }
            if self.key_at(child) < self.key_at(pos) {
                self.swap_heap(pos, child);
                pos = child;
            } else {
                break;
            }
        }
    }

    fn swap_heap(&mut self, a: usize, b: usize) {
        self.heap.swap(a, b);
        self.slab.get_mut(self.heap[a]).pos = a;
        self.slab.get_mut(self.heap[b]).pos = b;
    }

    #[cfg(test)]
    fn assert_invariants(&self) {
        for pos in 0..self.heap.len() {
            assert_eq!(self.slab.get(self.heap[pos]).pos, pos, "stored position drifted");
            if pos > 0 {
                let parent = Self::parent(pos);
                assert!(
                    self.key_at(parent) <= self.key_at(pos),
                    "heap shape violated at position {}",
                    pos
                );
            }
        }
    }
}

impl<K: Ord, V> Default for HeapApq<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> AdaptablePriorityQueue<K, V> for HeapApq<K, V> {
    fn add(&mut self, key: K, value: V) -> EntryRef {
        HeapApq::add(self, key, value)
    }

    fn remove_min(&mut self) -> Option<(K, V)> {
        HeapApq::remove_min(self)
    }

    fn update_key(&mut self, entry: EntryRef, new_key: K) -> Result<(), ApqError> {
        HeapApq::update_key(self, entry, new_key)
    }

    fn get_key(&self, entry: EntryRef) -> Result<&K, ApqError> {
        HeapApq::get_key(self, entry)
    }

    fn len(&self) -> usize {
        HeapApq::len(self)
    }
}

/// Adaptable priority queue over an unordered sequence.
///
/// Insertion and key updates are O(1) because there is no ordering to
/// maintain; extraction scans the whole body for the minimum. Kept as a
/// baseline to contrast with [`HeapApq`]: for the same operations over
/// distinct keys the two extract in the same order.
#[derive(Debug, Clone)]
pub struct ListApq<K, V> {
    slab: EntrySlab<K, V>,
    body: Vec<usize>,
}

impl<K: Ord, V> ListApq<K, V> {
    pub fn new() -> Self {
        ListApq {
            slab: EntrySlab::new(),
            body: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }

    pub fn add(&mut self, key: K, value: V) -> EntryRef {
        let pos = self.body.len();
        let entry = self.slab.insert(key, value, pos);
        self.body.push(entry.slot);
        entry
    }

    pub fn remove_min(&mut self) -> Option<(K, V)> {
        if self.body.is_empty() {
            return None;
        }
        let mut min = 0;
        for i in 1..self.body.len() {
            if self.key_at(i) < self.key_at(min) {
                min = i;
            }
        }
        let slot = self.body.swap_remove(min);
        if min < self.body.len() {
            self.slab.get_mut(self.body[min]).pos = min;
        }
        Some(self.slab.vacate(slot))
    }

    pub fn update_key(&mut self, entry: EntryRef, new_key: K) -> Result<(), ApqError> {
        let slot = self.slab.resolve(entry)?;
        self.slab.get_mut(slot).key = new_key;
        Ok(())
    }

    pub fn get_key(&self, entry: EntryRef) -> Result<&K, ApqError> {
        let slot = self.slab.resolve(entry)?;
        Ok(&self.slab.get(slot).key)
    }

    fn key_at(&self, pos: usize) -> &K {
        &self.slab.get(self.body[pos]).key
    }
}

impl<K: Ord, V> Default for ListApq<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Ord, V> AdaptablePriorityQueue<K, V> for ListApq<K, V> {
    fn add(&mut self, key: K, value: V) -> EntryRef {
        ListApq::add(self, key, value)
    }

    fn remove_min(&mut self) -> Option<(K, V)> {
        ListApq::remove_min(self)
    }

    fn update_key(&mut self, entry: EntryRef, new_key: K) -> Result<(), ApqError> {
        ListApq::update_key(self, entry, new_key)
    }

    fn get_key(&self, entry: EntryRef) -> Result<&K, ApqError> {
        ListApq::get_key(self, entry)
    }

    fn len(&self) -> usize {
        ListApq::len(self)
    }
}
