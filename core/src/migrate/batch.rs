/// Identifiers patched per bulk call.
pub const BATCH_SIZE: usize = 100;

/// Split `identifiers` into consecutive batches of at most `size`, keeping
/// order. A zero size is treated as one.
pub fn split_batches(identifiers: &[String], size: usize) -> Vec<&[String]> {
    identifiers.chunks(size.max(1)).collect()
}

/// Number of batches `count` identifiers need at `size` per batch.
pub fn batch_count(count: usize, size: usize) -> usize {
    count.div_ceil(size.max(1))
}
