use {
    rapidhash::v3::rapidhash_v3,
    std::hash::{BuildHasher, BuildHasherDefault, Hasher},
};

/// Point on the ring.
///
/// The ring is the circular space `[0, 2^64)`, tokens are compared as plain
/// unsigned integers and the successor of `u64::MAX` wraps to the smallest
/// token present.
pub type Token = u64;

/// Default hasher for ring placement.
///
/// This uses the rapidhash V3 algorithm over the accumulated bytes.
/// For C++ compatibility, relies on the default seed and secrets.
///
/// The output is portable across platforms and major releases.
#[derive(Default)]
pub struct DefaultHasher(Vec<u8>);

impl Hasher for DefaultHasher {
    fn write(&mut self, bytes: &[u8]) {
        self.0.extend_from_slice(bytes);
    }

    fn finish(&self) -> u64 {
        rapidhash_v3(&self.0)
    }
}

/// Builder of [`DefaultHasher`] instances.
pub type DefaultBuildHasher = BuildHasherDefault<DefaultHasher>;

/// Maps raw bytes to a ring token.
///
/// Unlike [`BuildHasher::hash_one`], no length prefix or terminator is mixed
/// in: the token depends on the bytes of the id only, so the same string always
/// lands on the same point regardless of how it is borrowed.
pub(crate) fn token<H: BuildHasher>(build_hasher: &H, bytes: &[u8]) -> Token {
    let mut hasher = build_hasher.build_hasher();
    hasher.write(bytes);
    hasher.finish()
}
