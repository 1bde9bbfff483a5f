
use core::hash::{BuildHasher, Hasher};

/// Sends every key to bucket zero so tests can build long collision chains.
#[derive(Clone, Copy, Default)]
pub(super) struct CollidingState;

pub(super) struct CollidingHasher;

impl Hasher for CollidingHasher {
    fn finish(&self) -> u64 {
        0
    }

    fn write(&mut self, _bytes: &[u8]) {}
}

impl BuildHasher for CollidingState {
    type Hasher = CollidingHasher;

    fn build_hasher(&self) -> Self::Hasher {
        CollidingHasher
    }
}
