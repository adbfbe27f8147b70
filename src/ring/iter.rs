use {
    super::Entry,
    crate::node::VirtualNode,
    std::iter::FusedIterator,
};

/// In-order iterator over the ring.
///
/// Yields virtual nodes in ascending token order, i.e. clockwise starting from
/// the smallest token. Created with [`Ring::iter()`](super::Ring::iter).
pub struct Iter<'a> {
    /// Entries whose left subtree is already visited, top is the next one.
    stack: Vec<&'a Entry>,
    remaining: usize,
}

impl<'a> Iter<'a> {
    pub(super) fn new(root: Option<&'a Entry>, len: usize) -> Self {
        let mut iter = Self {
            stack: Vec::new(),
            remaining: len,
        };
        iter.push_left_spine(root);
        iter
    }

    fn push_left_spine(&mut self, mut cursor: Option<&'a Entry>) {
        while let Some(entry) = cursor {
            self.stack.push(entry);
            cursor = entry.left.as_deref();
        }
    }
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a VirtualNode;

    fn next(&mut self) -> Option<Self::Item> {
        let entry = self.stack.pop()?;
        self.push_left_spine(entry.right.as_deref());
        self.remaining = self.remaining.saturating_sub(1);
        Some(&entry.node)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl ExactSizeIterator for Iter<'_> {}

impl FusedIterator for Iter<'_> {}
