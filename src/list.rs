//! Append-only singly-linked list that owns its elements until teardown.
//!
//! Nodes live in one arena and link to each other by index, which keeps the
//! list singly linked with O(1) back insertion. A list always holds at least
//! one element: "no list" is `None` in an `Option<OwnershipList<T>>` slot,
//! and [`ListSlot`] gives those slots the tolerant operations.

#[derive(Debug)]
struct Node<T> {
    value: T,
    next: Option<usize>,
}

/// Singly-linked sequence with `first`/`last` links.
///
/// Elements are released only through [`OwnershipList::destroy`], which hands
/// each one to a caller-supplied destructor in insertion order.
#[derive(Debug)]
pub struct OwnershipList<T> {
    nodes: Vec<Node<T>>,
    first: Option<usize>,
    last: Option<usize>,
}

impl<T> OwnershipList<T> {
    /// Create a list holding exactly `initial`.
    pub fn new(initial: T) -> Self {
        Self {
            nodes: vec![Node {
                value: initial,
                next: None,
            }],
            first: Some(0),
            last: Some(0),
        }
    }

    /// Create a list from an optional first element; zero-element lists do not exist.
    pub fn try_new(initial: Option<T>) -> Option<Self> {
        initial.map(Self::new)
    }

    /// Append a trailing node.
    pub fn push_back(&mut self, value: T) {
        let index = self.nodes.len();
        self.nodes.push(Node { value, next: None });
        match self.last.and_then(|last| self.nodes.get_mut(last)) {
            Some(tail) => tail.next = Some(index),
            // Dangling tail: restart the chain at the new node.
            None => self.first = Some(index),
        }
        self.last = Some(index);
    }

    /// Visit every element in insertion order.
    pub fn for_each(&self, mut visitor: impl FnMut(&T)) {
        for value in self.iter() {
            visitor(value);
        }
    }

    /// Append `value` unless an element already satisfies `equals(existing, value)`.
    ///
    /// Returns `true` when the value was added. A rejected value is dropped.
    pub fn add_unique(&mut self, value: T, equals: impl Fn(&T, &T) -> bool) -> bool {
        if self.iter().any(|existing| equals(existing, &value)) {
            return false;
        }
        self.push_back(value);
        true
    }

    /// Hand every element to `destructor` in insertion order, then free the nodes.
    pub fn destroy(self, mut destructor: impl FnMut(T)) {
        let OwnershipList { nodes, first, .. } = self;
        let mut slots: Vec<Option<Node<T>>> = nodes.into_iter().map(Some).collect();
        let mut cursor = first;
        while let Some(index) = cursor {
            let Some(node) = slots.get_mut(index).and_then(Option::take) else {
                break;
            };
            cursor = node.next;
            destructor(node.value);
        }
    }

    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            list: self,
            cursor: self.first,
        }
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    /// Always `false` for a list built through the public API.
    pub fn is_empty(&self) -> bool {
        self.first.is_none()
    }

    pub fn first(&self) -> Option<&T> {
        self.first
            .and_then(|index| self.nodes.get(index))
            .map(|node| &node.value)
    }

    pub fn last(&self) -> Option<&T> {
        self.last
            .and_then(|index| self.nodes.get(index))
            .map(|node| &node.value)
    }

    pub fn last_mut(&mut self) -> Option<&mut T> {
        self.last
            .and_then(|index| self.nodes.get_mut(index))
            .map(|node| &mut node.value)
    }
}

/// Borrowing iterator in link order.
pub struct Iter<'a, T> {
    list: &'a OwnershipList<T>,
    cursor: Option<usize>,
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        let node = self.list.nodes.get(self.cursor?)?;
        self.cursor = node.next;
        Some(&node.value)
    }
}

impl<'a, T> IntoIterator for &'a OwnershipList<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        self.iter()
    }
}

/// Operations on an optional list, where `None` means "no list yet".
pub trait ListSlot<T> {
    /// Append, creating the list on first use.
    fn push_or_create(&mut self, value: T);

    /// Append to an existing list; `false` (and the value dropped) when there is none.
    fn append_back(&mut self, value: T) -> bool;

    /// Unique insertion into an existing list; `false` when there is none.
    fn add_unique(&mut self, value: T, equals: impl Fn(&T, &T) -> bool) -> bool;

    /// Destroy the list if present and leave the slot empty.
    fn destroy_with(&mut self, destructor: impl FnMut(T));
}

impl<T> ListSlot<T> for Option<OwnershipList<T>> {
    fn push_or_create(&mut self, value: T) {
        match self {
            Some(list) => list.push_back(value),
            None => *self = Some(OwnershipList::new(value)),
        }
    }

    fn append_back(&mut self, value: T) -> bool {
        match self {
            Some(list) => {
                list.push_back(value);
                true
            }
            None => false,
        }
    }

    fn add_unique(&mut self, value: T, equals: impl Fn(&T, &T) -> bool) -> bool {
        match self {
            Some(list) => list.add_unique(value, equals),
            None => false,
        }
    }

    fn destroy_with(&mut self, destructor: impl FnMut(T)) {
        if let Some(list) = self.take() {
            list.destroy(destructor);
        }
    }
}
