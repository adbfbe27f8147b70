use {crate::hash::Token, std::fmt};

/// Server ring placement.
///
/// Each server owns exactly one virtual node; its position on the ring is the
/// token of the server id. Keys whose token falls between the previous
/// virtual node (exclusive) and this one (inclusive) are routed to the server.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VirtualNode {
    id: String,
    token: Token,
}

impl VirtualNode {
    /// Creates a new virtual node for the given server id and ring token.
    pub fn new(id: impl Into<String>, token: Token) -> Self {
        Self {
            id: id.into(),
            token,
        }
    }

    /// Server id.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Position on the ring.
    pub fn token(&self) -> Token {
        self.token
    }

    /// Consumes the node, returning the server id.
    pub fn into_id(self) -> String {
        self.id
    }
}

impl fmt::Display for VirtualNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Node(id: {}, token: {:#018x})", self.id, self.token)
    }
}
