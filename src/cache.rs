use {rapidhash_v1::RapidBuildHasher, std::collections::HashMap};

/// Memo of resolved key assignments.
///
/// Maps a key to the server it was routed to the first time it was looked
/// up. Entries are sticky: they are never refreshed when servers join, and
/// they are only dropped in bulk when the server they point to leaves.
#[derive(Debug, Default)]
pub(crate) struct AssignmentCache {
    assignments: HashMap<String, String, RapidBuildHasher>,
}

impl AssignmentCache {
    /// Creates an empty cache with room for at least `capacity` keys.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            assignments: HashMap::with_capacity_and_hasher(capacity, RapidBuildHasher::default()),
        }
    }

    /// Server previously assigned to the key, if any.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.assignments.get(key).map(String::as_str)
    }

    /// Records the assignment of a key to a server.
    pub fn insert(&mut self, key: &str, server: &str) {
        self.assignments.insert(key.to_owned(), server.to_owned());
    }

    /// Drops every assignment pointing at the given server.
    ///
    /// This is a full scan. Returns the number of evicted keys.
    pub fn evict_server(&mut self, server: &str) -> usize {
        let before = self.assignments.len();
        self.assignments.retain(|_, assigned| assigned.as_str() != server);
        before - self.assignments.len()
    }

    /// Number of cached assignments.
    pub fn len(&self) -> usize {
        self.assignments.len()
    }
}
