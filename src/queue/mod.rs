//! # Two-lock queue
//!
//! An unbounded FIFO queue with one lock for the head and another for the
//! tail, so producers and consumers only meet on the emptiness check.
//!
//! The list always ends in an empty sentinel node. `push` writes its value
//! into the current sentinel and links a fresh one behind it; `pop` consumes
//! the head node as long as it is not the sentinel. Producers therefore only
//! touch the tail node and consumers only touch nodes strictly before it.
//!
//! ## Safety
//!
//! Nodes are heap allocations reached through raw pointers. The invariants
//! the `unsafe` blocks rely on:
//!
//! - Every node was created by `Box::leak` and is freed exactly once, either
//!   by the consumer that advances past it or by `Drop`.
//! - The tail node is only read or written while the tail lock is held.
//! - A node before the tail is only read or freed while the head lock is held,
//!   and its `value` and `next` were published under the tail lock.
//! - Locks are taken head first, then tail.

use core::marker::PhantomData;
use core::ptr::NonNull;

use alloc::boxed::Box;
use parking_lot::{Condvar, Mutex};

#[cfg(test)]
mod tests;

struct Node<T> {
    value: Option<T>,
    next: Option<NonNull<Node<T>>>,
}

impl<T> Node<T> {
    fn sentinel() -> NonNull<Node<T>> {
        NonNull::from(Box::leak(Box::new(Node {
            value: None,
            next: None,
        })))
    }
}

struct NodePtr<T>(NonNull<Node<T>>);

impl<T> Clone for NodePtr<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for NodePtr<T> {}

impl<T> PartialEq for NodePtr<T> {
    fn eq(&self, other: &Self) -> bool {
        self.0 == other.0
    }
}

/// An unbounded multi-producer multi-consumer FIFO queue.
pub struct Queue<T> {
    head: Mutex<NodePtr<T>>,
    tail: Mutex<NodePtr<T>>,
    available: Condvar,
    _marker: PhantomData<T>,
}

// Safety: node pointers are only dereferenced under the queue's locks, and the
// values they lead to move between threads, hence `T: Send`.
unsafe impl<T: Send> Send for Queue<T> {}

// Safety: shared access never hands out references to stored values, only
// moves them in and out under the locks.
unsafe impl<T: Send> Sync for Queue<T> {}

impl<T> Queue<T> {
    /// Create an empty queue.
    pub fn new() -> Self {
        let sentinel = NodePtr(Node::sentinel());
        Self {
            head: Mutex::new(sentinel),
            tail: Mutex::new(sentinel),
            available: Condvar::new(),
            _marker: PhantomData,
        }
    }

    /// Append a value and wake one waiting consumer.
    pub fn push(&self, value: T) {
        let sentinel = Node::sentinel();
        {
            let mut tail = self.tail.lock();
            // Safety: the tail node is only accessed under the tail lock.
            unsafe {
                let node = tail.0.as_ptr();
                (*node).value = Some(value);
                (*node).next = Some(sentinel);
            }
            *tail = NodePtr(sentinel);
        }
        // A consumer between its emptiness check and `wait` still holds the
        // head lock; taking it here orders the notification after the wait.
        drop(self.head.lock());
        self.available.notify_one();
    }

    /// Remove the front value if there is one.
    pub fn try_pop(&self) -> Option<T> {
        let mut head = self.head.lock();
        self.take_front(&mut head)
    }

    /// Remove the front value, blocking until a producer pushes one.
    pub fn wait_and_pop(&self) -> T {
        let mut head = self.head.lock();
        loop {
            if let Some(value) = self.take_front(&mut head) {
                return value;
            }
            self.available.wait(&mut head);
        }
    }

    /// Check if the queue holds no values.
    pub fn is_empty(&self) -> bool {
        let head = self.head.lock();
        let tail = self.tail.lock();
        *head == *tail
    }

    /// Unlink and free the head node. The caller holds the head lock.
    fn take_front(&self, head: &mut NodePtr<T>) -> Option<T> {
        if *head == *self.tail.lock() {
            return None;
        }
        // Safety: the head is not the tail, so its fields were written by a
        // producer under the tail lock we just acquired and released, no
        // producer touches it again, and the head lock makes us its only
        // consumer.
        let node = unsafe { Box::from_raw(head.0.as_ptr()) };
        let Node { value, next } = *node;
        match next {
            Some(next) => *head = NodePtr(next),
            None => unreachable!("queue node before the tail has no successor"),
        }
        value
    }
}

impl<T> Default for Queue<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Drop for Queue<T> {
    fn drop(&mut self) {
        let mut cursor = Some(self.head.get_mut().0);
        while let Some(node) = cursor {
            // Safety: `&mut self` rules out concurrent access and every node
            // from head to tail is still owned by the queue.
            let node = unsafe { Box::from_raw(node.as_ptr()) };
            cursor = node.next;
        }
    }
}
