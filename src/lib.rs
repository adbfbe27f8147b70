//! Consistent hashing of request keys onto a dynamic set of servers.
//!
//! Every server id is hashed to a token on a `u64` ring. A key is routed to
//! the server whose token is the first one at or after the key's token,
//! wrapping around past the end of the ring. When a server joins or leaves,
//! only the keys in the arc it owns change hands.
//!
//! Resolved assignments are cached and stay put until the server they point
//! to leaves the ring.
//!
//! ```
//! use hashring::{HasherBuilder, HasherError};
//!
//! let hasher = HasherBuilder::new(["Spongebob", "Patrick", "Sandy"]).build();
//! assert_eq!(hasher.node_count(), 3);
//!
//! let server = hasher.find_key("1134").unwrap();
//! assert_eq!(hasher.find_key("1134").unwrap(), server);
//!
//! hasher.remove_node(&server);
//! assert_ne!(hasher.find_key("1134").unwrap(), server);
//!
//! let empty = HasherBuilder::new(Vec::<String>::new()).build();
//! assert_eq!(empty.find_key("1134"), Err(HasherError::RingEmpty));
//! ```

mod builder;
mod cache;
mod error;
mod hash;
mod hasher;
mod node;
mod ring;
mod router;

pub use {
    builder::HasherBuilder,
    error::{HasherError, HasherResult},
    hash::{DefaultBuildHasher, DefaultHasher, Token},
    hasher::ConsistentHasher,
    node::VirtualNode,
    ring::{Iter, Ring},
    router::KeyRouter,
};
