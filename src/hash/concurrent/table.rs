use alloc::boxed::Box;
use core::fmt;
use core::hash::{BuildHasher, Hash};
use core::sync::atomic::{AtomicUsize, Ordering};

use crossbeam_utils::CachePadded;
use hashbrown::Equivalent;
use tracing::{debug, trace};

use super::bucket::{Bucket, Insertion};

/// The chained table shared by [`Map`](super::Map) and [`Set`](super::Set).
///
/// A set is this table with a `()` payload, so the locking protocol lives in
/// exactly one place.
pub(crate) struct ChainedTable<K, V, S> {
    buckets: Box<[Bucket<K, V>]>,
    /// Number of reachable nodes across all buckets
    count: CachePadded<AtomicUsize>,
    hash_builder: S,
}

#[inline]
fn bucket_index(hash: u64, buckets: usize) -> usize {
    (hash % buckets as u64) as usize
}

impl<K, V, S> ChainedTable<K, V, S> {
    /// # Panics
    /// Panics if `buckets` is zero
    pub(crate) fn with_buckets_and_hasher(buckets: usize, hash_builder: S) -> Self {
        assert!(buckets > 0, "Number of buckets must be non-zero");
        debug!(buckets, "creating chained table");
        Self {
            buckets: Self::allocate(buckets),
            count: CachePadded::new(AtomicUsize::new(0)),
            hash_builder,
        }
    }

    fn allocate(buckets: usize) -> Box<[Bucket<K, V>]> {
        trace!(buckets, "allocating bucket array");
        (0..buckets).map(|_| Bucket::default()).collect()
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        self.count.load(Ordering::Acquire)
    }

    #[inline]
    pub(crate) fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    pub(crate) fn hasher(&self) -> &S {
        &self.hash_builder
    }
}

impl<K, V, S> ChainedTable<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    #[inline]
    fn bucket_for<Q: ?Sized + Hash>(&self, key: &Q) -> &Bucket<K, V> {
        let hash = self.hash_builder.hash_one(key);
        &self.buckets[bucket_index(hash, self.buckets.len())]
    }

    pub(crate) fn find<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        Q: ?Sized + Hash + Equivalent<K>,
        F: FnOnce(&K, &V) -> R,
    {
        self.bucket_for(key).find(key, f)
    }

    pub(crate) fn update<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        Q: ?Sized + Hash + Equivalent<K>,
        F: FnOnce(&mut V) -> R,
    {
        self.bucket_for(key).update(key, f)
    }

    pub(crate) fn insert(&self, key: K, value: V, replace: bool) -> Insertion {
        self.bucket_for(&key).insert(key, value, replace, &self.count)
    }

    pub(crate) fn remove<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.bucket_for(key).remove(key, &self.count)
    }

    /// Rehashes every entry into a fresh array of `buckets` buckets.
    ///
    /// `&mut self` guarantees no other operation is in flight, so the drain
    /// and the reinsertion take no locks. A zero bucket count is ignored.
    pub(crate) fn resize(&mut self, buckets: usize) {
        if buckets == 0 {
            return;
        }

        let Self {
            buckets: current,
            count,
            hash_builder,
        } = self;
        let mut previous = core::mem::replace(current, Self::allocate(buckets));
        let mut live = 0;
        for bucket in previous.iter_mut() {
            bucket.drain(|key, value| {
                let index = bucket_index(hash_builder.hash_one(&key), current.len());
                if current[index].insert_exclusive(key, value) {
                    live += 1;
                }
            });
        }
        *count.get_mut() = live;

        debug!(
            from = previous.len(),
            to = buckets,
            entries = live,
            "rehashed chained table"
        );
    }

    pub(crate) fn grow(&mut self) {
        self.resize(self.buckets.len().saturating_mul(2));
    }
}

impl<K, V, S> fmt::Debug for ChainedTable<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChainedTable")
            .field("len", &self.len())
            .field("buckets", &self.bucket_count())
            .finish_non_exhaustive()
    }
}
