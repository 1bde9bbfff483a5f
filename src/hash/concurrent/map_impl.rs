use core::fmt;
use core::hash::{BuildHasher, Hash};

use hashbrown::{DefaultHashBuilder, Equivalent};

use super::DEFAULT_BUCKETS;
use super::error::TableError;
use super::table::ChainedTable;
use super::traits::{ConcurrentTable, MutableInPlaceMap, ReadableInPlaceMap, ReadableMap, Rehash};

/// A concurrent hash map with a lock per bucket head and per chain node.
///
/// Readers walk a chain with shared locks and writers with exclusive locks,
/// always taking the next node's lock before letting go of the current one.
/// The bucket count is fixed until [`Rehash::resize`] is called.
///
/// Every operation is also available as an inherent method, so a map whose
/// keys or values are not `Send + Sync` (and which therefore does not
/// implement the table traits) stays fully usable from one thread.
pub struct Map<K, V, S = DefaultHashBuilder> {
    table: ChainedTable<K, V, S>,
}

impl<K, V> Map<K, V, DefaultHashBuilder> {
    /// Create a map with [`DEFAULT_BUCKETS`] buckets.
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }

    /// Create a map with a fixed number of buckets.
    ///
    /// # Panics
    /// Panics if `buckets` is zero
    pub fn with_buckets(buckets: usize) -> Self {
        Self::with_buckets_and_hasher(buckets, DefaultHashBuilder::default())
    }
}

impl<K, V, S> Map<K, V, S> {
    /// Create a map with a fixed number of buckets and a custom hasher.
    ///
    /// # Panics
    /// Panics if `buckets` is zero
    pub fn with_buckets_and_hasher(buckets: usize, hash_builder: S) -> Self {
        Self {
            table: ChainedTable::with_buckets_and_hasher(buckets, hash_builder),
        }
    }

    /// Get the hash builder used to pick buckets.
    pub fn hasher(&self) -> &S {
        self.table.hasher()
    }

    /// Get the number of entries.
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.len() == 0
    }

    /// Get the length of the bucket array.
    pub fn bucket_count(&self) -> usize {
        self.table.bucket_count()
    }
}

impl<K, V, S> Map<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    /// Insert a key-value pair unless the key is already present.
    ///
    /// # Returns
    /// True if a new entry was created, false if the key existed (its value
    /// is left untouched)
    pub fn insert(&self, key: K, value: V) -> bool {
        self.table.insert(key, value, false).changed()
    }

    /// Insert a key-value pair, overwriting the value of an existing entry.
    ///
    /// # Returns
    /// True if an entry was created or overwritten
    pub fn insert_or_replace(&self, key: K, value: V) -> bool {
        self.table.insert(key, value, true).changed()
    }

    /// Get a clone of the value stored for a key.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
        V: Clone,
    {
        self.table.find(key, |_, v| v.clone())
    }

    /// Run `f` on an entry while its node is share-locked.
    pub fn view<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        Q: ?Sized + Hash + Equivalent<K>,
        F: FnOnce(&K, &V) -> R,
    {
        self.table.find(key, f)
    }

    /// Run `f` on a value while its node is exclusively locked.
    pub fn alter<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        Q: ?Sized + Hash + Equivalent<K>,
        F: FnOnce(&mut V) -> R,
    {
        self.table.update(key, f)
    }

    pub fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.table.find(key, |_, _| ()).is_some()
    }

    /// Remove the entry for a key.
    ///
    /// # Returns
    /// True if an entry was unlinked, false if the key was absent
    pub fn remove<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        self.table.remove(key)
    }
}

impl<K, V, S> Default for Map<K, V, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_buckets_and_hasher(DEFAULT_BUCKETS, S::default())
    }
}

impl<K, V, S> fmt::Debug for Map<K, V, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Map").field(&self.table).finish()
    }
}

impl<K, V, S> ConcurrentTable<K> for Map<K, V, S>
where
    K: Hash + Eq + Send + Sync,
    V: Send + Sync,
    S: BuildHasher + Send + Sync,
{
    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        Map::contains_key(self, key)
    }

    fn remove<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>,
    {
        Map::remove(self, key)
    }

    fn len(&self) -> usize {
        Map::len(self)
    }

    fn bucket_count(&self) -> usize {
        Map::bucket_count(self)
    }
}

impl<K, V, S> ReadableMap<K, V> for Map<K, V, S>
where
    K: Hash + Eq + Send + Sync,
    V: Send + Sync,
    S: BuildHasher + Send + Sync,
{
    fn get<Q>(&self, key: &Q) -> Option<V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
        V: Clone,
    {
        Map::get(self, key)
    }
}

impl<K, V, S> ReadableInPlaceMap<K, V> for Map<K, V, S>
where
    K: Hash + Eq + Send + Sync,
    V: Send + Sync,
    S: BuildHasher + Send + Sync,
{
    fn view<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        Q: ?Sized + Hash + Equivalent<K>,
        F: FnOnce(&K, &V) -> R,
    {
        Map::view(self, key, f)
    }
}

impl<K, V, S> MutableInPlaceMap<K, V> for Map<K, V, S>
where
    K: Hash + Eq + Send + Sync,
    V: Send + Sync,
    S: BuildHasher + Send + Sync,
{
    fn alter<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        Q: ?Sized + Hash + Equivalent<K>,
        F: FnOnce(&mut V) -> R,
    {
        Map::alter(self, key, f)
    }
}

impl<K, V, S> Rehash for Map<K, V, S>
where
    K: Hash + Eq,
    S: BuildHasher,
{
    fn resize(&mut self, buckets: usize) {
        self.table.resize(buckets);
    }

    fn grow(&mut self) {
        self.table.grow();
    }
}

/// Builder for [`Map`].
pub struct MapBuilder<S = DefaultHashBuilder> {
    buckets: usize,
    hash_builder: Option<S>,
}

impl<S> Default for MapBuilder<S>
where
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> MapBuilder<S>
where
    S: BuildHasher + Default,
{
    /// Create a builder for a map with [`DEFAULT_BUCKETS`] buckets.
    pub fn new() -> Self {
        Self {
            buckets: DEFAULT_BUCKETS,
            hash_builder: None,
        }
    }

    /// Set the number of buckets. Zero is rejected by [`build`](Self::build).
    pub fn with_buckets(mut self, buckets: usize) -> Self {
        self.buckets = buckets;
        self
    }

    /// Set a custom hasher for the map.
    pub fn with_hasher(mut self, hasher: S) -> Self {
        self.hash_builder = Some(hasher);
        self
    }

    /// Build the map.
    ///
    /// # Errors
    /// [`TableError::ZeroBuckets`] if the bucket count is zero
    pub fn build<K, V>(self) -> Result<Map<K, V, S>, TableError> {
        if self.buckets == 0 {
            return Err(TableError::ZeroBuckets);
        }
        Ok(Map::with_buckets_and_hasher(
            self.buckets,
            self.hash_builder.unwrap_or_default(),
        ))
    }
}
