use core::fmt;
use core::hash::{BuildHasher, Hash};

use hashbrown::{DefaultHashBuilder, Equivalent};

use super::DEFAULT_BUCKETS;
use super::error::TableError;
use super::table::ChainedTable;
use super::traits::{ConcurrentTable, Rehash};

/// A concurrent hash set: the chained table with no payload.
///
/// Like [`Map`](super::Map), every operation is also an inherent method and
/// does not require `T: Send + Sync`.
pub struct Set<T, S = DefaultHashBuilder> {
    table: ChainedTable<T, (), S>,
}

impl<T> Set<T, DefaultHashBuilder> {
    /// Create a set with [`DEFAULT_BUCKETS`] buckets.
    pub fn new() -> Self {
        Self::with_buckets(DEFAULT_BUCKETS)
    }

    /// Create a set with a fixed number of buckets.
    ///
    /// # Panics
    /// Panics if `buckets` is zero
    pub fn with_buckets(buckets: usize) -> Self {
        Self::with_buckets_and_hasher(buckets, DefaultHashBuilder::default())
    }
}

impl<T, S> Set<T, S> {
    /// Create a set with a fixed number of buckets and a custom hasher.
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

    /// Get the number of values.
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

impl<T, S> Set<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    /// Add a value. Inserting a value that is already present is a no-op.
    ///
    /// # Returns
    /// True if the value was not present before
    pub fn insert(&self, value: T) -> bool {
        self.table.insert(value, (), false).changed()
    }

    /// Check if the set holds a value.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        self.table.find(value, |_, _| ()).is_some()
    }

    /// Remove a value.
    ///
    /// # Returns
    /// True if the value was present
    pub fn remove<Q>(&self, value: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        self.table.remove(value)
    }
}

impl<T, S> Default for Set<T, S>
where
    S: Default,
{
    fn default() -> Self {
        Self::with_buckets_and_hasher(DEFAULT_BUCKETS, S::default())
    }
}

impl<T, S> fmt::Debug for Set<T, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Set").field(&self.table).finish()
    }
}

impl<T, S> ConcurrentTable<T> for Set<T, S>
where
    T: Hash + Eq + Send + Sync,
    S: BuildHasher + Send + Sync,
{
    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        self.contains(key)
    }

    fn remove<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<T>,
    {
        Set::remove(self, key)
    }

    fn len(&self) -> usize {
        Set::len(self)
    }

    fn bucket_count(&self) -> usize {
        Set::bucket_count(self)
    }
}

impl<T, S> Rehash for Set<T, S>
where
    T: Hash + Eq,
    S: BuildHasher,
{
    fn resize(&mut self, buckets: usize) {
        self.table.resize(buckets);
    }

    fn grow(&mut self) {
        self.table.grow();
    }
}

/// Builder for [`Set`].
pub struct SetBuilder<S = DefaultHashBuilder> {
    buckets: usize,
    hash_builder: Option<S>,
}

impl<S> Default for SetBuilder<S>
where
    S: BuildHasher + Default,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> SetBuilder<S>
where
    S: BuildHasher + Default,
{
    /// Create a builder for a set with [`DEFAULT_BUCKETS`] buckets.
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

    /// Set a custom hasher for the set.
    pub fn with_hasher(mut self, hasher: S) -> Self {
        self.hash_builder = Some(hasher);
        self
    }

    /// Build the set.
    ///
    /// # Errors
    /// [`TableError::ZeroBuckets`] if the bucket count is zero
    pub fn build<T>(self) -> Result<Set<T, S>, TableError> {
        if self.buckets == 0 {
            return Err(TableError::ZeroBuckets);
        }
        Ok(Set::with_buckets_and_hasher(
            self.buckets,
            self.hash_builder.unwrap_or_default(),
        ))
    }
}
