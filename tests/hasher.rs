use {
    hashring::{ConsistentHasher, HasherBuilder, HasherError, KeyRouter},
    std::{
        collections::HashMap,
        hash::{BuildHasherDefault, Hasher},
        sync::Arc,
        thread,
    },
    tracing_subscriber::EnvFilter,
};

const SERVERS: [&str; 5] = ["Spongebob", "Patrick", "Squidward", "Mr.Krabs", "Sandy"];

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn keys(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("request-{i}")).collect()
}

/// Resolves every key on a freshly built hasher (no cached assignments).
fn assignments<'a>(servers: &[&str], keys: &'a [String]) -> HashMap<&'a str, String> {
    let hasher = HasherBuilder::new(servers.iter().copied()).build();
    keys.iter()
        .map(|key| (key.as_str(), hasher.find_key(key).unwrap()))
        .collect()
}

/// Places decimal ids at their numeric value.
#[derive(Default)]
struct NumericHasher(Vec<u8>);

impl Hasher for NumericHasher {
    fn write(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }

    fn finish(&self) -> u64 {
        std::str::from_utf8(&self.0)
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or(0)
    }
}

#[test]
fn hasher_builder() {
    init_tracing();

    let hasher = HasherBuilder::new(SERVERS).build();
    assert_eq!(hasher.node_count(), SERVERS.len());

    // Nodes are laid out in token order.
    let nodes = hasher.nodes();
    assert_eq!(nodes.len(), SERVERS.len());
    assert!(nodes.windows(2).all(|w| w[0].token() <= w[1].token()));
    for server in SERVERS {
        assert!(nodes.iter().any(|node| node.id() == server));
    }

    let server = hasher.find_key("1134").unwrap();
    assert!(SERVERS.contains(&server.as_str()));

    // Empty seed list.
    let hasher = HasherBuilder::new(Vec::<String>::new())
        .with_cache_capacity(1024)
        .build();
    assert_eq!(hasher.node_count(), 0);
    assert_eq!(hasher.find_key("1134"), Err(HasherError::RingEmpty));

    // Custom hash function.
    let hasher = HasherBuilder::new(["100", "200"])
        .with_cache_capacity(16)
        .with_build_hasher(BuildHasherDefault::<NumericHasher>::default())
        .build();
    assert_eq!(hasher.find_key("150").unwrap(), "200");
    assert_eq!(hasher.find_key("250").unwrap(), "100");
}

#[test]
fn independent_hashers() {
    let first = HasherBuilder::new(SERVERS).build();
    let second = ConsistentHasher::new();

    assert!(first.find_key("1134").is_ok());
    assert_eq!(second.find_key("1134"), Err(HasherError::RingEmpty));

    second.add_node("Plankton");
    assert_eq!(second.find_key("1134").unwrap(), "Plankton");
    assert_eq!(first.node_count(), SERVERS.len());
}

#[test]
fn same_servers_same_assignments() {
    let keys = keys(1_000);
    let mut reversed = SERVERS;
    reversed.reverse();

    // Placement depends on ids only, not on insertion order.
    assert_eq!(assignments(&SERVERS, &keys), assignments(&reversed, &keys));
}

#[test]
fn joining_server_only_takes_keys() {
    let keys = keys(10_000);
    let before = assignments(&SERVERS, &keys);

    let mut servers = SERVERS.to_vec();
    servers.push("Plankton");
    let after = assignments(&servers, &keys);

    // Keys either stay where they were or move to the new server.
    for key in &keys {
        let (old, new) = (&before[key.as_str()], &after[key.as_str()]);
        assert!(old == new || new == "Plankton", "{key}: {old} -> {new}");
    }
}

#[test]
fn leaving_server_only_gives_keys() {
    let keys = keys(10_000);
    let before = assignments(&SERVERS, &keys);

    let servers: Vec<&str> = SERVERS.into_iter().filter(|s| *s != "Squidward").collect();
    let after = assignments(&servers, &keys);

    // Only keys owned by the departed server move.
    for key in &keys {
        let (old, new) = (&before[key.as_str()], &after[key.as_str()]);
        assert!(old == new || old == "Squidward", "{key}: {old} -> {new}");
        assert_ne!(new, "Squidward");
    }
}

#[test]
fn removal_reassigns_cached_keys() {
    let hasher = HasherBuilder::new(SERVERS).build();
    let keys = keys(2_000);
    let before: Vec<String> = keys.iter().map(|k| hasher.find_key(k).unwrap()).collect();
    assert_eq!(hasher.cached_keys(), keys.len());

    let departed = before[0].clone();
    hasher.remove_node(&departed);
    assert_eq!(hasher.node_count(), SERVERS.len() - 1);

    // Fresh hasher without the departed server resolves the same way.
    let remaining: Vec<&str> = SERVERS.into_iter().filter(|s| *s != departed).collect();
    let expected = assignments(&remaining, &keys);
    for (key, old) in keys.iter().zip(&before) {
        let new = hasher.find_key(key).unwrap();
        assert_ne!(new, departed);
        if *old != departed {
            assert_eq!(&new, old, "{key} should not move");
        }
        assert_eq!(new, expected[key.as_str()]);
    }

    // Once re-added, the server is eligible again for new keys only.
    hasher.add_node(&departed);
    for (key, old) in keys.iter().zip(&before) {
        let now = hasher.find_key(key).unwrap();
        if *old == departed {
            assert_ne!(now, departed, "{key} is sticky to its reassignment");
        }
    }
}

#[test]
fn key_router() {
    fn route<R: KeyRouter>(router: R, key: &str) -> Result<String, HasherError> {
        router.find_key(key)
    }

    let hasher = Arc::new(ConsistentHasher::new());
    assert_eq!(route(hasher.clone(), "1134"), Err(HasherError::RingEmpty));

    let router: &dyn KeyRouter = &*hasher;
    SERVERS.iter().for_each(|id| router.add_node(id));
    assert_eq!(router.node_count(), SERVERS.len());

    let server = route(&*hasher, "1134").unwrap();
    assert_eq!(route(hasher.clone(), "1134").unwrap(), server);

    let boxed: Box<dyn KeyRouter> = Box::new(HasherBuilder::new(SERVERS).build());
    assert_eq!(route(boxed, "1134").unwrap(), server);

    router.remove_node(&server);
    assert_eq!(hasher.node_count(), SERVERS.len() - 1);
    assert_ne!(route(hasher, "1134").unwrap(), server);
}

#[test]
fn concurrent_lookups_and_removals() {
    init_tracing();

    let servers: Vec<String> = (0..10).map(|i| format!("server{i}")).collect();
    let departing: Vec<String> = servers[..5].to_vec();
    let hasher = Arc::new(HasherBuilder::new(servers.clone()).build());
    let keys = keys(2_000);

    thread::scope(|s| {
        for _ in 0..4 {
            let hasher = hasher.clone();
            let keys = &keys;
            s.spawn(move || {
                for _ in 0..5 {
                    for key in keys {
                        assert!(hasher.find_key(key).is_ok());
                    }
                }
            });
        }

        let hasher = hasher.clone();
        let departing = &departing;
        s.spawn(move || {
            for id in departing {
                hasher.remove_node(id);
                thread::yield_now();
            }
        });
    });

    assert_eq!(hasher.node_count(), servers.len() - departing.len());

    // No assignment to a departed server survived the sweeps.
    for key in &keys {
        let server = hasher.find_key(key).unwrap();
        assert!(!departing.contains(&server), "{key} routed to {server}");
    }
}
