use core::hash::Hash;

use hashbrown::Equivalent;

/// Operations shared by every chained table, keyed or keyed-with-payload.
///
/// All methods except those of [`Rehash`] are safe to call from any number of
/// threads at once.
pub trait ConcurrentTable<K>: Send + Sync {
    /// Check if a key exists in the table.
    ///
    /// # Arguments
    /// * `key` - The key to check for
    ///
    /// # Returns
    /// True if the key exists, false otherwise
    fn contains_key<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>;

    /// Remove the entry for a key.
    ///
    /// # Arguments
    /// * `key` - The key to remove
    ///
    /// # Returns
    /// True if an entry was unlinked, false if the key was absent
    fn remove<Q>(&self, key: &Q) -> bool
    where
        Q: ?Sized + Hash + Equivalent<K>;

    /// Get the number of entries, read from the live counter.
    fn len(&self) -> usize;

    /// Check if the table holds no entries.
    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Get the length of the bucket array.
    fn bucket_count(&self) -> usize;
}

/// Copy-out lookups on tables carrying a payload.
pub trait ReadableMap<K, V>: ConcurrentTable<K> {
    /// Get a clone of the value stored for a key.
    ///
    /// # Arguments
    /// * `key` - The key to look up
    ///
    /// # Returns
    /// The value, if the key exists
    fn get<Q>(&self, key: &Q) -> Option<V>
    where
        Q: ?Sized + Hash + Equivalent<K>,
        V: Clone;
}

/// Read-only access to an entry without copying it out.
pub trait ReadableInPlaceMap<K, V>: ConcurrentTable<K> {
    /// Perform a read-only view operation on a key-value pair.
    ///
    /// The closure runs while the entry's node is share-locked; writers on
    /// the same chain wait for it, so keep it short.
    ///
    /// # Returns
    /// The result of the closure if the key exists, None otherwise
    fn view<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        Q: ?Sized + Hash + Equivalent<K>,
        F: FnOnce(&K, &V) -> R;
}

/// In-place mutation of a stored payload.
pub trait MutableInPlaceMap<K, V>: ConcurrentTable<K> {
    /// Modify an existing entry in place under the node's exclusive lock.
    ///
    /// # Returns
    /// The result of the closure if the key exists, None otherwise
    fn alter<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        Q: ?Sized + Hash + Equivalent<K>,
        F: FnOnce(&mut V) -> R;
}

/// Rebuilding the bucket array.
///
/// Both methods take `&mut self`: no lookup, insert or removal can run while
/// the entries are being moved.
pub trait Rehash {
    /// Move every entry into a new array of `buckets` buckets. Zero is a no-op.
    fn resize(&mut self, buckets: usize);

    /// Double the bucket count.
    fn grow(&mut self);
}
