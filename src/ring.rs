mod iter;


use {
    crate::{hash::Token, node::VirtualNode},
    std::{cmp::Ordering, fmt},
};

pub use iter::Iter;

type Link = Option<Box<Entry>>;

struct Entry {
    node: VirtualNode,
    left: Link,
    right: Link,
}

impl Entry {
    fn new(node: VirtualNode) -> Self {
        Self {
            node,
            left: None,
            right: None,
        }
    }
}

/// Hash ring.
///
/// Virtual nodes are kept in a binary search tree ordered by token: every
/// token in the left subtree of a node is strictly less than the node's token,
/// every token in the right subtree is greater or equal (equal tokens always
/// go right).
///
/// The tree is not rebalanced. Tokens are expected to be uniformly
/// distributed, so the expected depth is logarithmic, but a pathological
/// insertion order degrades it to a list. All operations are iterative, so
/// depth only affects latency, never the stack.
#[derive(Default)]
pub struct Ring {
    root: Link,
    len: usize,
}

impl Ring {
    /// Creates a new empty ring.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of virtual nodes on the ring.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if there are no virtual nodes on the ring.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Places a virtual node on the ring.
    ///
    /// Duplicates are not detected: inserting a node with an already present
    /// token puts one more node with that token on the ring.
    pub fn insert(&mut self, node: VirtualNode) {
        let mut slot = &mut self.root;
        while let Some(entry) = slot {
            slot = if entry.node.token() > node.token() {
                &mut entry.left
            } else {
                &mut entry.right
            };
        }
        *slot = Some(Box::new(Entry::new(node)));
        self.len += 1;
    }

    /// Removes a virtual node with the given token.
    ///
    /// If several nodes share the token, exactly one of them is removed.
    /// Returns the removed node, `None` if no node has the token.
    pub fn remove(&mut self, token: Token) -> Option<VirtualNode> {
        let mut slot = &mut self.root;
        loop {
            match slot.as_deref().map(|entry| token.cmp(&entry.node.token())) {
                None | Some(Ordering::Equal) => break,
                Some(Ordering::Less) => slot = &mut slot.as_mut()?.left,
                Some(Ordering::Greater) => slot = &mut slot.as_mut()?.right,
            }
        }

        let removed = Self::unlink(slot)?;
        self.len -= 1;
        Some(removed)
    }

    /// Returns the node owning the given token.
    ///
    /// That is the node with the smallest token greater or equal to `token`,
    /// or, when `token` is past every node, the node with the smallest token
    /// on the ring (the ring wraps around).
    ///
    /// Returns `None` only if the ring is empty.
    pub fn successor(&self, token: Token) -> Option<&VirtualNode> {
        // The best candidate is not necessarily the last ancestor on the
        // search path, so every qualifying node seen on the way down is kept.
        let mut best = None;
        let mut cursor = self.root.as_deref();
        while let Some(entry) = cursor {
            if entry.node.token() >= token {
                best = Some(&entry.node);
                cursor = entry.left.as_deref();
            } else {
                cursor = entry.right.as_deref();
            }
        }

        best.or_else(|| self.min())
    }

    /// Returns the node with the smallest token.
    pub fn min(&self) -> Option<&VirtualNode> {
        let mut entry = self.root.as_deref()?;
        while let Some(left) = entry.left.as_deref() {
            entry = left;
        }
        Some(&entry.node)
    }

    /// Iterator over the nodes in ascending token order.
    ///
    /// Walks the whole tree, meant for diagnostics only.
    pub fn iter(&self) -> Iter<'_> {
        Iter::new(self.root.as_deref(), self.len)
    }

    /// Detaches the entry in `slot`, splicing its subtrees back in.
    ///
    /// An entry with two children is replaced by its in-order successor,
    /// which is removed from the right subtree.
    fn unlink(slot: &mut Link) -> Option<VirtualNode> {
        let Entry { node, left, right } = *slot.take()?;
        *slot = match (left, right) {
            (None, right) => right,
            (left, None) => left,
            (left, mut right) => match Self::pop_min(&mut right) {
                Some(successor) => Some(Box::new(Entry {
                    node: successor,
                    left,
                    right,
                })),
                None => left,
            },
        };
        Some(node)
    }

    /// Removes the leftmost entry of the subtree in `slot`.
    fn pop_min(slot: &mut Link) -> Option<VirtualNode> {
        let mut slot = slot;
        while slot.as_ref().is_some_and(|entry| entry.left.is_some()) {
            slot = &mut slot.as_mut()?.left;
        }

        let Entry { node, right, .. } = *slot.take()?;
        *slot = right;
        Some(node)
    }
}

impl Drop for Ring {
    fn drop(&mut self) {
        // Default drop recurses once per level, which a degenerate tree can
        // turn into a stack overflow.
        let mut pending: Vec<Box<Entry>> = self.root.take().into_iter().collect();
        while let Some(mut entry) = pending.pop() {
            pending.extend(entry.left.take());
            pending.extend(entry.right.take());
        }
    }
}

impl fmt::Debug for Ring {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<'a> IntoIterator for &'a Ring {
    type Item = &'a VirtualNode;
    type IntoIter = Iter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Extend<VirtualNode> for Ring {
    fn extend<I: IntoIterator<Item = VirtualNode>>(&mut self, iter: I) {
        iter.into_iter().for_each(|node| self.insert(node));
    }
}

impl FromIterator<VirtualNode> for Ring {
    fn from_iter<I: IntoIterator<Item = VirtualNode>>(iter: I) -> Self {
        let mut ring = Ring::new();
        ring.extend(iter);
        ring
    }
}
