//! Arena-backed doubly linked list used as a recency order.
//!
//! Nodes live in a dense `Vec` of slots and link to each other by [`SlotId`]
//! rather than by pointer, so the list has no cyclic references and every
//! handle stays valid until its node is removed. Vacant slots are threaded
//! into a free list and reused by later pushes.
//!
//! ## Architecture
//!
//! ```text
//!   slots: Vec<Slot<T>>
//!   ┌──────┬──────────────────────────────────────────────┐
//!   │ idx  │ slot                                         │
//!   ├──────┼──────────────────────────────────────────────┤
//!   │ 0    │ Occupied { value: B, prev: Some(2), next: 1 }│
//!   │ 1    │ Occupied { value: A, prev: Some(0), next: - }│
//!   │ 2    │ Occupied { value: C, prev: -, next: Some(0) }│
//!   │ 3    │ Vacant { next_free: None }                   │
//!   └──────┴──────────────────────────────────────────────┘
//!
//!   head (MRU) ─► [2:C] ◄──► [0:B] ◄──► [1:A] ◄── tail (LRU)
//!   free ─► [3]
//! ```
//!
//! ## Operations
//! - `push_front(value)`: O(1), reuses a vacant slot when one exists
//! - `move_to_front(id)`: O(1) detach + attach at head
//! - `pop_back()` / `remove(id)`: O(1), slot goes back on the free list
//! - `iter()`: O(n) from head (most recent) to tail (least recent)
//!
//! `debug_validate_invariants()` is available in debug/test builds.

/// Stable handle to a node in a [`RecencyList`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SlotId(usize);

impl SlotId {
    /// Returns the slot index backing this handle.
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug)]
struct Node<T> {
    value: T,
    prev: Option<SlotId>,
    next: Option<SlotId>,
}

#[derive(Debug)]
enum Slot<T> {
    Occupied(Node<T>),
    Vacant { next_free: Option<SlotId> },
}

/// Doubly linked list whose nodes are stored in a slot arena.
///
/// The front of the list is the most recently used position and the back is
/// the least recently used one.
#[derive(Debug)]
pub struct RecencyList<T> {
    slots: Vec<Slot<T>>,
    free: Option<SlotId>,
    head: Option<SlotId>,
    tail: Option<SlotId>,
    len: usize,
}

impl<T> RecencyList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty list with room for `capacity` nodes.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            free: None,
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Returns the number of linked nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the list holds no nodes.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns `true` if `id` refers to a live node.
    pub fn contains(&self, id: SlotId) -> bool {
        self.node(id).is_some()
    }

    /// Returns the handle of the most recently used node.
    pub fn front_id(&self) -> Option<SlotId> {
        self.head
    }

    /// Returns the handle of the least recently used node.
    pub fn back_id(&self) -> Option<SlotId> {
        self.tail
    }

    /// Returns the value at the back (least recently used) of the list.
    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|id| self.get(id))
    }

    /// Returns the value of node `id`, if live.
    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.node(id).map(|node| &node.value)
    }

    /// Returns a mutable reference to the value of node `id`, if live.
    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.node_mut(id).map(|node| &mut node.value)
    }

    /// Links `value` at the front and returns its handle.
    pub fn push_front(&mut self, value: T) -> SlotId {
        let node = Node {
            value,
            prev: None,
            next: self.head,
        };
        let id = match self.free {
            Some(id) => {
                let slot = &mut self.slots[id.index()];
                if let Slot::Vacant { next_free } = slot {
                    self.free = *next_free;
                }
                *slot = Slot::Occupied(node);
                id
            },
            None => {
                let id = SlotId(self.slots.len());
                self.slots.push(Slot::Occupied(node));
                id
            },
        };

        match self.head {
            Some(old_head) => {
                if let Some(head) = self.node_mut(old_head) {
                    head.prev = Some(id);
                }
            },
            None => self.tail = Some(id),
        }
        self.head = Some(id);
        self.len += 1;
        id
    }

    /// Unlinks and returns the back (least recently used) value.
    pub fn pop_back(&mut self) -> Option<T> {
        let id = self.tail?;
        self.remove(id)
    }

    /// Unlinks node `id` and returns its value; its slot is recycled.
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.detach(id)?;
        let slot = std::mem::replace(
            &mut self.slots[id.index()],
            Slot::Vacant {
                next_free: self.free,
            },
        );
        self.free = Some(id);
        self.len -= 1;
        match slot {
            Slot::Occupied(node) => Some(node.value),
            Slot::Vacant { .. } => None,
        }
    }

    /// Moves node `id` to the front; returns `false` if `id` is not live.
    pub fn move_to_front(&mut self, id: SlotId) -> bool {
        if !self.contains(id) {
            return false;
        }
        if self.head == Some(id) {
            return true;
        }
        self.detach(id);
        self.attach_front(id);
        true
    }

    /// Drops every node and releases the free list.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free = None;
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterates values from front (most recent) to back (least recent).
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            current: self.head,
            remaining: self.len,
        }
    }

    fn node(&self, id: SlotId) -> Option<&Node<T>> {
        match self.slots.get(id.index())? {
            Slot::Occupied(node) => Some(node),
            Slot::Vacant { .. } => None,
        }
    }

    fn node_mut(&mut self, id: SlotId) -> Option<&mut Node<T>> {
        match self.slots.get_mut(id.index())? {
            Slot::Occupied(node) => Some(node),
            Slot::Vacant { .. } => None,
        }
    }

    fn detach(&mut self, id: SlotId) -> Option<()> {
        let (prev, next) = {
            let node = self.node_mut(id)?;
            (node.prev.take(), node.next.take())
        };

        match prev {
            Some(prev_id) => {
                if let Some(prev_node) = self.node_mut(prev_id) {
                    prev_node.next = next;
                }
            },
            None => self.head = next,
        }

        match next {
            Some(next_id) => {
                if let Some(next_node) = self.node_mut(next_id) {
                    next_node.prev = prev;
                }
            },
            None => self.tail = prev,
        }

        Some(())
    }

    fn attach_front(&mut self, id: SlotId) {
        let old_head = self.head;
        if let Some(node) = self.node_mut(id) {
            node.prev = None;
            node.next = old_head;
        } else {
            return;
        }
        match old_head {
            Some(old_head) => {
                if let Some(head) = self.node_mut(old_head) {
                    head.prev = Some(id);
                }
            },
            None => self.tail = Some(id),
        }
        self.head = Some(id);
    }

    #[cfg(any(test, debug_assertions))]
    /// Returns node handles from head to tail.
    pub fn debug_snapshot_ids(&self) -> Vec<SlotId> {
        let mut ids = Vec::with_capacity(self.len);
        let mut current = self.head;
        while let Some(id) = current {
            ids.push(id);
            current = self.node(id).and_then(|node| node.next);
        }
        ids
    }

    #[cfg(any(test, debug_assertions))]
    pub fn debug_validate_invariants(&self) {
        if self.head.is_none() || self.tail.is_none() {
            assert!(self.head.is_none());
            assert!(self.tail.is_none());
            assert_eq!(self.len, 0);
        }

        let mut seen = std::collections::HashSet::new();
        let mut prev = None;
        let mut current = self.head;
        while let Some(id) = current {
            assert!(seen.insert(id), "cycle at slot {}", id.index());
            let node = self.node(id).expect("linked slot is vacant");
            assert_eq!(node.prev, prev);
            if node.next.is_none() {
                assert_eq!(self.tail, Some(id));
            }
            prev = Some(id);
            current = node.next;
        }
        assert_eq!(seen.len(), self.len);

        let occupied = self
            .slots
            .iter()
            .filter(|slot| matches!(slot, Slot::Occupied(_)))
            .count();
        assert_eq!(occupied, self.len);

        let mut free_count = 0usize;
        let mut free = self.free;
        while let Some(id) = free {
            free_count += 1;
            assert!(free_count <= self.slots.len(), "free list cycle");
            free = match self.slots[id.index()] {
                Slot::Vacant { next_free } => next_free,
                Slot::Occupied(_) => panic!("free list points at occupied slot"),
            };
        }
        assert_eq!(free_count + self.len, self.slots.len());
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Iterator over list values from front to back.
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    current: Option<SlotId>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        let node = self.list.node(id)?;
        self.current = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}
