use {
    crate::{ConsistentHasher, HasherResult},
    auto_impl::auto_impl,
    std::hash::BuildHasher,
};

/// Key router.
///
/// The surface a request-handling front end needs: register and deregister
/// servers, and find the server a key should be sent to. Implemented for
/// references and smart pointers too, so a front end can hold an
/// `Arc<ConsistentHasher>` and still be generic over the router.
#[auto_impl(&, Box, Arc)]
pub trait KeyRouter {
    /// Registers a server.
    fn add_node(&self, id: &str);

    /// Deregisters a server.
    fn remove_node(&self, id: &str);

    /// Returns the server the key is routed to.
    ///
    /// Fails with [`HasherError::RingEmpty`](crate::HasherError::RingEmpty)
    /// when there is no server to route to.
    fn find_key(&self, key: &str) -> HasherResult<String>;

    /// Number of registered servers.
    fn node_count(&self) -> usize;
}

impl<H: BuildHasher> KeyRouter for ConsistentHasher<H> {
    fn add_node(&self, id: &str) {
        ConsistentHasher::add_node(self, id)
    }

    fn remove_node(&self, id: &str) {
        ConsistentHasher::remove_node(self, id)
    }

    fn find_key(&self, key: &str) -> HasherResult<String> {
        ConsistentHasher::find_key(self, key)
    }

    fn node_count(&self) -> usize {
        ConsistentHasher::node_count(self)
    }
}
