use {
    super::{ConsistentHasher, hash::DefaultBuildHasher},
    std::hash::BuildHasher,
    tracing::debug,
};

/// Consistent hasher builder.
///
/// Seeds the ring with an initial list of servers.
pub struct HasherBuilder<H: BuildHasher = DefaultBuildHasher> {
    servers: Vec<String>,
    build_hasher: H,
    cache_capacity: usize,
}

impl HasherBuilder {
    /// Create new hasher builder.
    pub fn new<I, S>(servers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            servers: servers.into_iter().map(Into::into).collect(),
            build_hasher: DefaultBuildHasher::default(),
            cache_capacity: 0,
        }
    }
}

impl<H: BuildHasher> HasherBuilder<H> {
    /// Transform the builder into one with a different hash function.
    pub fn with_build_hasher<CustomH: BuildHasher>(
        self,
        build_hasher: CustomH,
    ) -> HasherBuilder<CustomH> {
        HasherBuilder {
            servers: self.servers,
            build_hasher,
            cache_capacity: self.cache_capacity,
        }
    }

    /// Pre-allocate the assignment cache for the expected number of keys.
    pub fn with_cache_capacity(mut self, cache_capacity: usize) -> Self {
        self.cache_capacity = cache_capacity;
        self
    }

    /// Build the hasher.
    ///
    /// Servers are added in the order given; duplicates are added twice.
    pub fn build(self) -> ConsistentHasher<H> {
        let hasher = ConsistentHasher::with_cache_capacity(self.build_hasher, self.cache_capacity);
        for id in &self.servers {
            hasher.add_node(id);
        }
        debug!(servers = self.servers.len(), "seeded hash ring");

        hasher
    }
}
