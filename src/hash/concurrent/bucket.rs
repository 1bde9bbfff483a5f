//! Bucket chains and the lock-coupled walk over them.
//!
//! A bucket owns the first node of a singly linked chain behind a
//! `parking_lot` `RwLock`; every node owns its successor behind its own
//! `RwLock`. The head guard is held while waiting on the first node, so it
//! has to park rather than spin. Nodes are reference counted so that a
//! walker can hold an owned guard on the next node while it releases the
//! guard on the current one.
//! A node is never unlinked without holding the exclusive lock of its
//! predecessor (or of the bucket head), which is exactly the lock any walker
//! must own to step onto it.

use alloc::sync::Arc;
use core::sync::atomic::{AtomicUsize, Ordering};

use hashbrown::Equivalent;
use parking_lot::lock_api::ArcRwLockReadGuard;
use parking_lot::{RawRwLock, RwLock};

type NodeRef<K, V> = Arc<RwLock<Node<K, V>>>;
type Link<K, V> = Option<NodeRef<K, V>>;
type ReadGuard<K, V> = ArcRwLockReadGuard<RawRwLock, Node<K, V>>;

/// One entry of a chain. The lock around it guards `value` and `next`.
pub(crate) struct Node<K, V> {
    key: K,
    value: V,
    next: Link<K, V>,
}

impl<K, V> Node<K, V> {
    fn link(key: K, value: V) -> NodeRef<K, V> {
        Arc::new(RwLock::new(Node {
            key,
            value,
            next: None,
        }))
    }
}

/// Result of inserting into a chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Insertion {
    /// A new node was linked in.
    Inserted,
    /// The key was present and its value was overwritten.
    Replaced,
    /// The key was present and left untouched.
    Rejected,
}

impl Insertion {
    pub(crate) fn changed(self) -> bool {
        !matches!(self, Insertion::Rejected)
    }
}

pub(crate) struct Bucket<K, V> {
    head: RwLock<Link<K, V>>,
}

impl<K, V> Default for Bucket<K, V> {
    fn default() -> Self {
        Self {
            head: RwLock::new(None),
        }
    }
}

impl<K, V> Bucket<K, V> {
    /// Share-locks the first node. The head guard is released on return,
    /// after the node lock is held.
    fn read_first(&self) -> Option<ReadGuard<K, V>> {
        let head = self.head.read();
        head.as_ref().map(|node| node.read_arc())
    }

    /// Runs `f` on the entry matching `key` while its node is share-locked.
    pub(crate) fn find<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        Q: ?Sized + Equivalent<K>,
        F: FnOnce(&K, &V) -> R,
    {
        let mut current = self.read_first()?;
        loop {
            if key.equivalent(&current.key) {
                return Some(f(&current.key, &current.value));
            }
            let next = current.next.as_ref()?.read_arc();
            current = next;
        }
    }

    /// Runs `f` on the value matching `key` while its node is exclusively
    /// locked. The chain shape does not change, so the head is only share-locked.
    pub(crate) fn update<Q, F, R>(&self, key: &Q, f: F) -> Option<R>
    where
        Q: ?Sized + Equivalent<K>,
        F: FnOnce(&mut V) -> R,
    {
        let mut current = {
            let head = self.head.read();
            head.as_ref().map(|node| node.write_arc())?
        };
        loop {
            if key.equivalent(&current.key) {
                return Some(f(&mut current.value));
            }
            let next = current.next.as_ref()?.write_arc();
            current = next;
        }
    }

    /// Links `key` at the end of the chain unless it is already present, in
    /// which case the value is overwritten only when `replace` is set.
    ///
    /// `live` is bumped while the lock that publishes the new node is still
    /// held, so a racing removal of the same key can never decrement first.
    pub(crate) fn insert(&self, key: K, value: V, replace: bool, live: &AtomicUsize) -> Insertion
    where
        K: Eq,
    {
        let mut head = self.head.write();
        let Some(mut current) = head.as_ref().map(|node| node.write_arc()) else {
            *head = Some(Node::link(key, value));
            live.fetch_add(1, Ordering::AcqRel);
            return Insertion::Inserted;
        };
        drop(head);

        loop {
            if current.key == key {
                if !replace {
                    return Insertion::Rejected;
                }
                current.value = value;
                return Insertion::Replaced;
            }
            match current.next.as_ref().map(|node| node.write_arc()) {
                Some(next) => current = next,
                None => {
                    current.next = Some(Node::link(key, value));
                    live.fetch_add(1, Ordering::AcqRel);
                    return Insertion::Inserted;
                }
            }
        }
    }

    /// Unlinks the node matching `key`. The predecessor (or the head) stays
    /// exclusively locked until the successor has been spliced in.
    pub(crate) fn remove<Q>(&self, key: &Q, live: &AtomicUsize) -> bool
    where
        Q: ?Sized + Equivalent<K>,
    {
        let mut head = self.head.write();
        let Some(mut first) = head.as_ref().map(|node| node.write_arc()) else {
            return false;
        };
        if key.equivalent(&first.key) {
            *head = first.next.take();
            live.fetch_sub(1, Ordering::AcqRel);
            return true;
        }
        drop(head);

        let mut prev = first;
        loop {
            let Some(mut current) = prev.next.as_ref().map(|node| node.write_arc()) else {
                return false;
            };
            if key.equivalent(&current.key) {
                prev.next = current.next.take();
                live.fetch_sub(1, Ordering::AcqRel);
                return true;
            }
            prev = current;
        }
    }

    /// Lock-free insert for callers holding the bucket exclusively. Returns
    /// whether a new node was linked; a duplicate key overwrites the value.
    pub(crate) fn insert_exclusive(&mut self, key: K, value: V) -> bool
    where
        K: Eq,
    {
        let mut link = self.head.get_mut();
        while let Some(node) = link {
            let node = exclusive(node);
            if node.key == key {
                node.value = value;
                return false;
            }
            link = &mut node.next;
        }
        *link = Some(Node::link(key, value));
        true
    }

    /// Detaches the whole chain and hands every entry to `f` in chain order.
    pub(crate) fn drain<F>(&mut self, mut f: F)
    where
        F: FnMut(K, V),
    {
        let mut link = self.head.get_mut().take();
        while let Some(node) = link {
            let Node { key, value, next } = into_node(node);
            link = next;
            f(key, value);
        }
    }
}

impl<K, V> Drop for Bucket<K, V> {
    fn drop(&mut self) {
        // Unlink one node at a time; dropping the head directly would recurse
        // once per node.
        let mut link = self.head.get_mut().take();
        while let Some(node) = link {
            link = Arc::into_inner(node).and_then(|lock| lock.into_inner().next);
        }
    }
}

// Guards never outlive the operation that took them, so with `&mut` access to
// the bucket every node has exactly one owner.
fn exclusive<K, V>(node: &mut NodeRef<K, V>) -> &mut Node<K, V> {
    match Arc::get_mut(node) {
        Some(lock) => lock.get_mut(),
        None => unreachable!("chain node shared while the bucket is held exclusively"),
    }
}

fn into_node<K, V>(node: NodeRef<K, V>) -> Node<K, V> {
    match Arc::into_inner(node) {
        Some(lock) => lock.into_inner(),
        None => unreachable!("chain node shared while the bucket is held exclusively"),
    }
}
