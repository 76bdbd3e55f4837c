use xxhash_rust::xxh3::xxh3_64;

/// Stable 64-bit content hash, rendered as 16 lower-case hex digits.
#[must_use]
pub fn content_hash(bytes: &[u8]) -> String {
    format!("{:016x}", xxh3_64(bytes))
}

///
/// TESTS
///
