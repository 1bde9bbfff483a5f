use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;
use std::time::Duration;

use crossbeam_utils::thread as scoped_thread;

use super::Queue;

#[test]
fn test_fifo_order() {
    let queue = Queue::new();
    assert!(queue.is_empty());

    for i in 0..10 {
        queue.push(i);
    }
    assert!(!queue.is_empty());

    for i in 0..10 {
        assert_eq!(queue.try_pop(), Some(i));
    }
    assert!(queue.is_empty());
    assert_eq!(queue.try_pop(), None);
}

#[test]
fn test_interleaved_push_and_pop() {
    let queue = Queue::new();
    queue.push("a");
    queue.push("b");
    assert_eq!(queue.try_pop(), Some("a"));
    queue.push("c");
    assert_eq!(queue.wait_and_pop(), "b");
    assert_eq!(queue.wait_and_pop(), "c");
    assert_eq!(queue.try_pop(), None);
}

#[test]
fn test_wait_and_pop_blocks_until_push() {
    let queue = Arc::new(Queue::new());

    let consumer = {
        let queue = Arc::clone(&queue);
        thread::spawn(move || queue.wait_and_pop())
    };

    thread::sleep(Duration::from_millis(50));
    assert!(!consumer.is_finished());

    queue.push(String::from("ready"));
    assert_eq!(consumer.join().unwrap(), "ready");
    assert!(queue.is_empty());
}

#[test]
fn test_multi_producer_multi_consumer() {
    let queue = Queue::new();
    let producers = 4;
    let per_producer = 2_500;
    let total = producers * per_producer;
    let consumed = AtomicUsize::new(0);
    let sum = AtomicUsize::new(0);

    scoped_thread::scope(|s| {
        for p in 0..producers {
            let queue = &queue;
            s.spawn(move |_| {
                for i in 0..per_producer {
                    queue.push(p * per_producer + i);
                }
            });
        }
        for _ in 0..4 {
            let (queue, consumed, sum) = (&queue, &consumed, &sum);
            s.spawn(move |_| {
                while consumed.load(Ordering::Acquire) < total {
                    if let Some(value) = queue.try_pop() {
                        sum.fetch_add(value, Ordering::AcqRel);
                        consumed.fetch_add(1, Ordering::AcqRel);
                    } else {
                        thread::yield_now();
                    }
                }
            });
        }
    })
    .unwrap();

    assert_eq!(consumed.load(Ordering::Acquire), total);
    assert_eq!(sum.load(Ordering::Acquire), (0..total).sum::<usize>());
    assert!(queue.is_empty());
}

#[test]
fn test_per_producer_order_is_preserved() {
    let queue = Queue::new();

    scoped_thread::scope(|s| {
        for p in 0..3usize {
            let queue = &queue;
            s.spawn(move |_| {
                for i in 0..1_000usize {
                    queue.push((p, i));
                }
            });
        }
    })
    .unwrap();

    let mut last = [None::<usize>; 3];
    while let Some((p, i)) = queue.try_pop() {
        if let Some(prev) = last[p] {
            assert!(i > prev);
        }
        last[p] = Some(i);
    }
    assert_eq!(last, [Some(999); 3]);
}

#[test]
fn test_drop_releases_pending_values() {
    let tracker = Arc::new(());
    {
        let queue = Queue::new();
        for _ in 0..16 {
            queue.push(Arc::clone(&tracker));
        }
        drop(queue.try_pop());
        assert_eq!(Arc::strong_count(&tracker), 16);
    }
    assert_eq!(Arc::strong_count(&tracker), 1);
}
