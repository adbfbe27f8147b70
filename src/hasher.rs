
use {
    crate::{
        HasherError,
        HasherResult,
        cache::AssignmentCache,
        hash::{self, DefaultBuildHasher, Token},
        node::VirtualNode,
        ring::Ring,
    },
    parking_lot::{RwLock, RwLockUpgradableReadGuard},
    std::hash::BuildHasher,
    tracing::{debug, trace},
};

/// Ring membership and the assignments derived from it.
///
/// Kept behind a single lock: a cached assignment must never outlive the
/// membership of the server it points to.
#[derive(Debug)]
struct State {
    ring: Ring,
    cache: AssignmentCache,
    node_count: usize,
}

/// Consistent hasher.
///
/// Routes keys to servers: each server is placed on the ring at the token of
/// its id, and a key belongs to the first server found clockwise from the
/// key's own token. Adding or removing a server therefore only moves the keys
/// in the arc that server owns.
///
/// Resolved assignments are memoized. A cached assignment is sticky: it is
/// returned as is even if a server added later would own the key now. It is
/// dropped only when the server it points to is removed, and the key is then
/// resolved again against the remaining servers.
///
/// All operations take `&self`, the hasher can be shared between threads.
#[derive(Debug)]
pub struct ConsistentHasher<H: BuildHasher = DefaultBuildHasher> {
    state: RwLock<State>,
    build_hasher: H,
}

impl Default for ConsistentHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsistentHasher {
    /// Creates a new hasher with an empty ring.
    pub fn new() -> Self {
        Self::with_build_hasher(DefaultBuildHasher::default())
    }
}

impl<H: BuildHasher> ConsistentHasher<H> {
    /// Creates a new hasher with an empty ring and a custom hash function.
    ///
    /// Any hash function is acceptable, as long as it is deterministic and
    /// spreads ids evenly over the `u64` space.
    pub fn with_build_hasher(build_hasher: H) -> Self {
        Self::with_cache_capacity(build_hasher, 0)
    }

    pub(crate) fn with_cache_capacity(build_hasher: H, cache_capacity: usize) -> Self {
        Self {
            state: RwLock::new(State {
                ring: Ring::new(),
                cache: AssignmentCache::with_capacity(cache_capacity),
                node_count: 0,
            }),
            build_hasher,
        }
    }

    /// Adds a server to the ring.
    ///
    /// Already cached assignments are kept, even those that the new server
    /// would own now.
    ///
    /// Adding the same id twice places two nodes at the same token; both are
    /// counted by [`node_count()`](Self::node_count).
    pub fn add_node(&self, id: &str) {
        let token = self.position(id);

        let mut state = self.state.write();
        state.ring.insert(VirtualNode::new(id, token));
        state.node_count += 1;
        debug!(id, token, nodes = state.node_count, "added node to ring");
    }

    /// Removes a server from the ring.
    ///
    /// Every key assigned to the server is forgotten and will be resolved
    /// again on the next lookup. If the server was added more than once, only
    /// one of its nodes is removed.
    ///
    /// Removing an unknown server changes nothing.
    pub fn remove_node(&self, id: &str) {
        let token = self.position(id);

        let mut state = self.state.write();
        match state.ring.remove(token) {
            Some(node) => {
                state.node_count -= 1;
                debug!(%node, nodes = state.node_count, "removed node from ring");
            }
            None => debug!(id, token, "node is not on the ring"),
        }

        let evicted = state.cache.evict_server(id);
        if evicted > 0 {
            debug!(id, evicted, "evicted cached assignments");
        }
    }

    /// Returns the server responsible for the given key.
    ///
    /// The first lookup of a key resolves it on the ring and caches the
    /// result; later lookups return the cached server for as long as that
    /// server stays on the ring.
    ///
    /// Fails with [`HasherError::RingEmpty`] if no server has been added.
    pub fn find_key(&self, key: &str) -> HasherResult<String> {
        if let Some(server) = self.state.read().cache.get(key) {
            trace!(key, server, "found key in cache");
            return Ok(server.to_owned());
        }

        // Upgradable read excludes writers until the assignment is cached,
        // so the resolved server cannot be removed in between.
        let state = self.state.upgradable_read();
        if let Some(server) = state.cache.get(key) {
            return Ok(server.to_owned());
        }

        let token = self.position(key);
        let server = state
            .ring
            .successor(token)
            .map(|node| node.id().to_owned())
            .ok_or(HasherError::RingEmpty)?;
        trace!(key, token, %server, "resolved key on ring");

        let mut state = RwLockUpgradableReadGuard::upgrade(state);
        state.cache.insert(key, &server);
        Ok(server)
    }

    /// Number of nodes on the ring.
    ///
    /// Nodes are not deduplicated by id.
    pub fn node_count(&self) -> usize {
        self.state.read().node_count
    }

    /// Returns `true` if no server is on the ring.
    pub fn is_empty(&self) -> bool {
        self.state.read().ring.is_empty()
    }

    /// Ring position of the given key or server id.
    pub fn position(&self, key: &str) -> Token {
        hash::token(&self.build_hasher, key.as_bytes())
    }

    /// Snapshot of the ring, in ascending token order.
    pub fn nodes(&self) -> Vec<VirtualNode> {
        self.state.read().ring.iter().cloned().collect()
    }

    /// Number of memoized key assignments.
    pub fn cached_keys(&self) -> usize {
        self.state.read().cache.len()
    }
}
