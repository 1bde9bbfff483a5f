//! Thread-safe collections built on fine-grained blocking locks.
//!
//! - [`hash::concurrent`]: a chained hash map and hash set where every bucket
//!   head and every chain node carries its own reader/writer lock. Lookups,
//!   inserts and removals walk a chain hand-over-hand, so unrelated buckets
//!   (and unrelated stretches of the same chain) never contend.
//! - [`queue`]: an unbounded FIFO queue with separate head and tail locks.
//!
//! # Examples
//!
//! ```
//! use chained_collections::hash::concurrent::{prelude::*, Map};
//!
//! let map: Map<String, u32> = Map::with_buckets(2);
//! assert!(map.insert("aboba".to_string(), 10));
//! assert!(!map.insert("aboba".to_string(), 5));
//! assert!(map.insert_or_replace("aboba".to_string(), 5));
//! assert_eq!(map.get("aboba"), Some(5));
//! assert!(map.remove("aboba"));
//! assert!(map.is_empty());
//! ```
extern crate alloc;

pub mod hash;
pub mod queue;
