//! Concurrent chained hash tables.
//!
//! [`Map`] and [`Set`] share one table: a fixed array of buckets, each the
//! head of a singly linked chain whose nodes carry their own reader/writer
//! lock. Operations hash the key to pick a bucket and then walk the chain
//! with lock coupling. Only [`Rehash`](prelude::Rehash) touches the whole
//! array, and it requires `&mut` access.

mod bucket;
mod error;
mod map_impl;
mod set_impl;
mod table;
mod traits;

#[cfg(test)]
mod tests;

pub mod map {
    pub use super::map_impl::*;
}

pub mod set {
    pub use super::set_impl::*;
}

pub mod prelude {
    pub use super::error::TableError;
    pub use super::traits::*;
}

pub use error::TableError;
pub use map_impl::{Map, MapBuilder};
pub use set_impl::{Set, SetBuilder};

/// Bucket count used when none is given. A prime spreads keys evenly under
/// `hash % buckets`.
pub const DEFAULT_BUCKETS: usize = 55_001;
