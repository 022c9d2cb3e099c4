//! Recency list backing the LRU cache
//!
//! Doubly-linked list stored in a slab so that handles stay valid while
//! entries are spliced around. The head is the most recently used entry,
//! the tail the least recently used one.

/// Stable position of an entry inside a [`RecencyList`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Handle(usize);

/// Node in the slab-backed doubly-linked list
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Ordered sequence with O(1) push-to-front, move-to-front and removal
pub struct RecencyList<T> {
    nodes: Vec<Option<Node<T>>>,
    head: Option<usize>,
    tail: Option<usize>,
    free_list: Vec<usize>,
    len: usize,
}

impl<T> RecencyList<T> {
    /// Create an empty list
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Create an empty list with room for `capacity` entries
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            nodes: Vec::with_capacity(capacity),
            head: None,
            tail: None,
            free_list: Vec::new(),
            len: 0,
        }
    }

    /// Insert a value at the front and return its handle
    pub fn push_front(&mut self, value: T) -> Handle {
        let idx = self.alloc_node();
        self.nodes[idx] = Some(Node {
            value,
            prev: None,
            next: None,
        });
        self.link_front(idx);
        self.len += 1;
        Handle(idx)
    }

    /// Move the entry behind `handle` to the front
    ///
    /// Returns `false` if the handle does not point to a live entry.
    pub fn move_to_front(&mut self, handle: Handle) -> bool {
        let idx = handle.0;
        if !self.is_live(idx) {
            return false;
        }
        if self.head == Some(idx) {
            return true; // Already at front
        }

        self.unlink(idx);
        self.link_front(idx);
        true
    }

    /// Remove the entry behind `handle`
    pub fn remove(&mut self, handle: Handle) -> Option<T> {
        let idx = handle.0;
        if !self.is_live(idx) {
            return None;
        }

        self.unlink(idx);
        let node = self.nodes[idx].take()?;
        self.free_list.push(idx);
        self.len -= 1;
        Some(node.value)
    }

    /// Remove and return the least recently used entry
    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.remove(Handle(tail))
    }

    /// Peek at the least recently used entry
    pub fn back(&self) -> Option<&T> {
        self.tail.and_then(|idx| self.get(Handle(idx)))
    }

    /// Handle of the least recently used entry
    pub fn back_handle(&self) -> Option<Handle> {
        self.tail.map(Handle)
    }

    /// Borrow the entry behind `handle`
    pub fn get(&self, handle: Handle) -> Option<&T> {
        self.nodes
            .get(handle.0)
            .and_then(Option::as_ref)
            .map(|node| &node.value)
    }

    /// Mutably borrow the entry behind `handle`
    pub fn get_mut(&mut self, handle: Handle) -> Option<&mut T> {
        self.nodes
            .get_mut(handle.0)
            .and_then(Option::as_mut)
            .map(|node| &mut node.value)
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        self.len
    }

    /// Check if the list is empty
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Drop every entry and release all slots
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.free_list.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Iterate from most to least recently used
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            next: self.head,
        }
    }

    fn is_live(&self, idx: usize) -> bool {
        matches!(self.nodes.get(idx), Some(Some(_)))
    }

    fn link_front(&mut self, idx: usize) {
        let old_head = self.head;

        if let Some(node) = &mut self.nodes[idx] {
            node.prev = None;
            node.next = old_head;
        }

        match old_head {
            Some(head_idx) => {
                if let Some(head) = &mut self.nodes[head_idx] {
                    head.prev = Some(idx);
                }
            }
            None => {
                self.tail = Some(idx);
            }
        }

        self.head = Some(idx);
    }

    fn unlink(&mut self, idx: usize) {
        let (prev, next) = if let Some(node) = &self.nodes[idx] {
            (node.prev, node.next)
        } else {
            return;
        };

        match prev {
            Some(prev_idx) => {
                if let Some(prev_node) = &mut self.nodes[prev_idx] {
                    prev_node.next = next;
                }
            }
            None => {
                self.head = next;
            }
        }

        match next {
            Some(next_idx) => {
                if let Some(next_node) = &mut self.nodes[next_idx] {
                    next_node.prev = prev;
                }
            }
            None => {
                self.tail = prev;
            }
        }
    }

    fn alloc_node(&mut self) -> usize {
        if let Some(idx) = self.free_list.pop() {
            idx
        } else {
            let idx = self.nodes.len();
            self.nodes.push(None);
            idx
        }
    }
}

impl<T> Default for RecencyList<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Front-to-back iterator over a [`RecencyList`]
pub struct Iter<'a, T> {
    list: &'a RecencyList<T>,
    next: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<Self::Item> {
        let idx = self.next?;
        let node = self.list.nodes[idx].as_ref()?;
        self.next = node.next;
        Some(&node.value)
    }
}
