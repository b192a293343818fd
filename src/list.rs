//! Singly linked list with cursor-based in-place editing.
//!
//! Nodes live in an arena (`Vec` of slots plus a free list) and link to their
//! successor by index. The list itself only knows `head`, `tail` and `len`, so
//! `push_front`/`push_back` are O(1). Unlinking or relocating a node from the
//! middle of a singly linked chain needs the node's predecessor; only a
//! [`Cursor`] carries that, which is why [`Cursor::move_current_to_front`] and
//! [`Cursor::remove_current`] live on the cursor rather than on the list.
//!
//! # Examples
//!
//! ```
//! use refcounted_cache::list::List;
//!
//! let mut list: List<u32> = [1, 2, 3, 4].into_iter().collect();
//!
//! let mut cursor = list.cursor();
//! while cursor.move_next() {
//!     match cursor.current() {
//!         Some(&3) => cursor.move_current_to_front().unwrap(),
//!         Some(&2) => {
//!             cursor.remove_current().unwrap();
//!         }
//!         _ => {}
//!     }
//! }
//!
//! assert_eq!(list.iter().copied().collect::<Vec<_>>(), vec![3, 1, 4]);
//! ```

use crate::error::CursorError;
use core::fmt;
use core::iter::FusedIterator;

/// One arena slot: a value and the index of the next node.
#[derive(Debug)]
struct Node<T> {
    value: T,
    next: Option<usize>,
}

/// A singly linked list backed by an index arena.
///
/// Invariant: `len == 0` exactly when `head` and `tail` are both `None`, and
/// following `next` from `head` visits `len` nodes, the last being `tail`.
pub struct List<T> {
    slots: Vec<Option<Node<T>>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
}

impl<T> List<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        List {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Creates an empty list with room for `capacity` nodes before the arena
    /// has to grow.
    pub fn with_capacity(capacity: usize) -> Self {
        List {
            slots: Vec::with_capacity(capacity),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
        }
    }

    /// Returns the number of values in the list.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns true if the list contains no values.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the first value, if any.
    pub fn front(&self) -> Option<&T> {
        self.head.map(|idx| &self.node(idx).value)
    }

    /// Returns the last value, if any.
    pub fn back(&self) -> Option<&T> {
        self.tail.map(|idx| &self.node(idx).value)
    }

    /// Prepends `value`; it becomes the new front (and the back, if the list
    /// was empty).
    pub fn push_front(&mut self, value: T) {
        let idx = self.alloc(Node {
            value,
            next: self.head,
        });
        self.head = Some(idx);
        if self.tail.is_none() {
            self.tail = Some(idx);
        }
        self.len += 1;
    }

    /// Appends `value`; it becomes the new back (and the front, if the list
    /// was empty).
    pub fn push_back(&mut self, value: T) {
        let idx = self.alloc(Node { value, next: None });
        match self.tail {
            Some(tail) => self.node_mut(tail).next = Some(idx),
            None => self.head = Some(idx),
        }
        self.tail = Some(idx);
        self.len += 1;
    }

    /// Removes and returns the first value.
    pub fn pop_front(&mut self) -> Option<T> {
        let idx = self.head?;
        self.head = self.node(idx).next;
        if self.head.is_none() {
            self.tail = None;
        }
        Some(self.release(idx))
    }

    /// Removes every value, keeping the arena allocation.
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    /// Returns a front-to-back iterator over the values.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            next: self.head,
            remaining: self.len,
        }
    }

    /// Returns a cursor positioned before the first value.
    ///
    /// The cursor is single pass: once [`Cursor::move_next`] has returned
    /// `false` it stays exhausted. Take a fresh cursor to walk again.
    pub fn cursor(&mut self) -> Cursor<'_, T> {
        Cursor {
            list: self,
            prev: None,
            position: Position::Start,
        }
    }

    fn alloc(&mut self, node: Node<T>) -> usize {
        match self.free.pop() {
            Some(idx) => {
                self.slots[idx] = Some(node);
                idx
            }
            None => {
                self.slots.push(Some(node));
                self.slots.len() - 1
            }
        }
    }

    /// Frees the slot at `idx` and returns its value. The caller must already
    /// have unlinked it.
    fn release(&mut self, idx: usize) -> T {
        let node = match self.slots[idx].take() {
            Some(node) => node,
            None => unreachable!("list slot {idx} released twice"),
        };
        self.free.push(idx);
        self.len -= 1;
        node.value
    }

    fn node(&self, idx: usize) -> &Node<T> {
        match &self.slots[idx] {
            Some(node) => node,
            None => unreachable!("list link points at vacant slot {idx}"),
        }
    }

    fn node_mut(&mut self, idx: usize) -> &mut Node<T> {
        match &mut self.slots[idx] {
            Some(node) => node,
            None => unreachable!("list link points at vacant slot {idx}"),
        }
    }
}

impl<T> Default for List<T> {
    fn default() -> Self {
        List::new()
    }
}

impl<T> Extend<T> for List<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

impl<T> FromIterator<T> for List<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut list = List::new();
        list.extend(iter);
        list
    }
}

impl<'a, T> IntoIterator for &'a List<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

impl<T: fmt::Debug> fmt::Debug for List<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

/// Borrowing front-to-back iterator over a [`List`].
pub struct Iter<'a, T> {
    list: &'a List<T>,
    next: Option<usize>,
    remaining: usize,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let idx = self.next?;
        let node = self.list.node(idx);
        self.next = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

impl<T> fmt::Debug for Iter<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Iter")
            .field("remaining", &self.remaining)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    /// `move_next` has not been called yet.
    Start,
    /// On a node.
    At(usize),
    /// The node we were on was moved or removed; holds the node that followed it.
    Vacated(Option<usize>),
    /// Ran off the end.
    End,
}

/// Stateful, single-pass cursor over a [`List`].
///
/// Besides reading the current value, the cursor can splice the current node
/// to the front of the list or unlink it, both in O(1), because it remembers
/// the node before the current one. Either operation leaves the cursor with no
/// current value; the next [`move_next`](Cursor::move_next) continues with the
/// node that followed the vacated one.
pub struct Cursor<'a, T> {
    list: &'a mut List<T>,
    /// The node that precedes the current (or vacated) position.
    prev: Option<usize>,
    position: Position,
}

impl<T> Cursor<'_, T> {
    /// Advances to the next node, or to the first node on the first call.
    ///
    /// Returns `false` once the list is exhausted; the cursor then has no
    /// current value and further calls keep returning `false`.
    pub fn move_next(&mut self) -> bool {
        let next = match self.position {
            Position::Start => self.list.head,
            Position::At(idx) => {
                self.prev = Some(idx);
                self.list.node(idx).next
            }
            Position::Vacated(next) => next,
            Position::End => return false,
        };

        match next {
            Some(idx) => {
                self.position = Position::At(idx);
                true
            }
            None => {
                self.position = Position::End;
                false
            }
        }
    }

    /// Returns the current value, if the cursor is on a node.
    pub fn current(&self) -> Option<&T> {
        match self.position {
            Position::At(idx) => Some(&self.list.node(idx).value),
            _ => None,
        }
    }

    /// Returns the current value mutably, if the cursor is on a node.
    pub fn current_mut(&mut self) -> Option<&mut T> {
        match self.position {
            Position::At(idx) => Some(&mut self.list.node_mut(idx).value),
            _ => None,
        }
    }

    /// Unlinks the current node and relinks it as the front of the list.
    ///
    /// # Errors
    ///
    /// [`CursorError::NoCurrent`] if the cursor is not on a node.
    pub fn move_current_to_front(&mut self) -> Result<(), CursorError> {
        let idx = self.current_index()?;
        let next = self.list.node(idx).next;

        match self.prev {
            // Already the head; it stays put and now precedes `next`.
            None => self.prev = Some(idx),
            Some(prev) => {
                self.list.node_mut(prev).next = next;
                if self.list.tail == Some(idx) {
                    self.list.tail = Some(prev);
                }
                let head = self.list.head;
                self.list.node_mut(idx).next = head;
                self.list.head = Some(idx);
            }
        }

        self.position = Position::Vacated(next);
        Ok(())
    }

    /// Unlinks the current node and returns its value.
    ///
    /// # Errors
    ///
    /// [`CursorError::NoCurrent`] if the cursor is not on a node.
    pub fn remove_current(&mut self) -> Result<T, CursorError> {
        let idx = self.current_index()?;
        let next = self.list.node(idx).next;

        match self.prev {
            Some(prev) => self.list.node_mut(prev).next = next,
            None => self.list.head = next,
        }
        if self.list.tail == Some(idx) {
            self.list.tail = self.prev;
        }

        self.position = Position::Vacated(next);
        Ok(self.list.release(idx))
    }

    fn current_index(&self) -> Result<usize, CursorError> {
        match self.position {
            Position::At(idx) => Ok(idx),
            _ => Err(CursorError::NoCurrent),
        }
    }
}

impl<T> fmt::Debug for Cursor<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cursor")
            .field("position", &self.position)
            .field("prev", &self.prev)
            .field("len", &self.list.len)
            .finish()
    }
}
