use std::collections::VecDeque;
use std::sync::{Condvar, Mutex};

// ── UnboundedQueue ──

/// Thread-safe FIFO with blocking `take` and non-blocking `put`.
/// Safe for multiple producers and multiple consumers.
pub struct UnboundedQueue<T> {
    items: Mutex<VecDeque<T>>,
    ready: Condvar,
}

impl<T> UnboundedQueue<T> {
    pub fn new() -> Self {
        Self {
            items: Mutex::new(VecDeque::new()),
            ready: Condvar::new(),
        }
    }

    /// Append a value and wake one waiting consumer. Never blocks.
    pub fn put(&self, value: T) {
        let mut items = self.items.lock().expect("queue lock poisoned");
        items.push_back(value);
        self.ready.notify_one();
    }

    /// Remove and return the head, blocking until the queue is non-empty.
    pub fn take(&self) -> T {
        let mut items = self.items.lock().expect("queue lock poisoned");
        loop {
            if let Some(value) = items.pop_front() {
                return value;
            }
            items = self.ready.wait(items).expect("queue lock poisoned");
        }
    }

    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.items.lock().expect("queue lock poisoned").len()
    }

    #[allow(dead_code)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<T> Default for UnboundedQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

// ── LockstepQueue ──

struct LockstepInner<T> {
    items: VecDeque<T>,
    /// True while the consumer holds a taken value it has not yet advanced past.
    in_flight: bool,
}

/// Single-slot rendezvous queue: `put` returns only after the consumer has
/// taken the value *and* called `advance`. This is what keeps the foreground
/// painting exactly once per event — no producer can race ahead of the
/// consumer's acknowledge.
pub struct LockstepQueue<T> {
    inner: Mutex<LockstepInner<T>>,
    read_ready: Condvar,
    write_ready: Condvar,
}

impl<T> LockstepQueue<T> {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(LockstepInner {
                items: VecDeque::new(),
                in_flight: false,
            }),
            read_ready: Condvar::new(),
            write_ready: Condvar::new(),
        }
    }

    /// Enqueue a value, then block until the consumer has drained the queue
    /// and acknowledged. Concurrent producers serialize through the lock;
    /// ordering between them is whoever wins it.
    pub fn put(&self, value: T) {
        let mut inner = self.inner.lock().expect("queue lock poisoned");
        inner.items.push_back(value);
        self.read_ready.notify_one();
        while !inner.items.is_empty() || inner.in_flight {
            inner = self.write_ready.wait(inner).expect("queue lock poisoned");
        }
    }

    /// Remove and return the head, blocking until one exists. The value is
    /// marked in flight until `advance` is called.
    pub fn take(&self) -> T {
        let mut inner = self.inner.lock().expect("queue lock poisoned");
        loop {
            if let Some(value) = inner.items.pop_front() {
                inner.in_flight = true;
                return value;
            }
            inner = self.read_ready.wait(inner).expect("queue lock poisoned");
        }
    }

    /// Acknowledge the value most recently taken, releasing blocked producers
    /// once the queue is drained.
    pub fn advance(&self) {
        let mut inner = self.inner.lock().expect("queue lock poisoned");
        inner.in_flight = false;
        if inner.items.is_empty() {
            self.write_ready.notify_all();
        }
    }
}

impl<T> Default for LockstepQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::Arc;
    use std::thread;
    use std::time::Duration;

    // ── UnboundedQueue ──

    #[test]
    fn unbounded_put_take_fifo_order() {
        let q = UnboundedQueue::new();
        q.put(1);
        q.put(2);
        q.put(3);
        assert_eq!(q.take(), 1);
        assert_eq!(q.take(), 2);
        assert_eq!(q.take(), 3);
    }

    #[test]
    fn unbounded_take_blocks_until_put() {
        let q = Arc::new(UnboundedQueue::new());
        let producer = {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                q.put(42);
            })
        };
        assert_eq!(q.take(), 42);
        producer.join().unwrap();
    }

    #[test]
    fn unbounded_len_tracks_depth() {
        let q = UnboundedQueue::new();
        assert!(q.is_empty());
        q.put("a");
        q.put("b");
        assert_eq!(q.len(), 2);
        q.take();
        assert_eq!(q.len(), 1);
    }

    #[test]
    fn unbounded_many_producers_deliver_everything() {
        let q = Arc::new(UnboundedQueue::new());
        let handles: Vec<_> = (0..4)
            .map(|i| {
                let q = Arc::clone(&q);
                thread::spawn(move || {
                    for j in 0..25 {
                        q.put(i * 100 + j);
                    }
                })
            })
            .collect();
        for h in handles {
            h.join().unwrap();
        }
        let mut seen: Vec<i32> = (0..100).map(|_| q.take()).collect();
        seen.sort_unstable();
        seen.dedup();
        assert_eq!(seen.len(), 100);
    }

    // ── LockstepQueue ──

    #[test]
    fn lockstep_put_blocks_until_advance() {
        let q = Arc::new(LockstepQueue::new());
        let returned = Arc::new(AtomicBool::new(false));
        let producer = {
            let q = Arc::clone(&q);
            let returned = Arc::clone(&returned);
            thread::spawn(move || {
                q.put(7);
                returned.store(true, Ordering::SeqCst);
            })
        };

        assert_eq!(q.take(), 7);
        // The producer must still be suspended: taken but not yet advanced.
        thread::sleep(Duration::from_millis(50));
        assert!(!returned.load(Ordering::SeqCst));

        q.advance();
        producer.join().unwrap();
        assert!(returned.load(Ordering::SeqCst));
    }

    #[test]
    fn lockstep_take_blocks_until_put() {
        let q = Arc::new(LockstepQueue::new());
        let producer = {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                thread::sleep(Duration::from_millis(50));
                q.put("hello");
            })
        };
        assert_eq!(q.take(), "hello");
        q.advance();
        producer.join().unwrap();
    }

    #[test]
    fn lockstep_two_producers_both_delivered() {
        let q = Arc::new(LockstepQueue::new());
        let a = {
            let q = Arc::clone(&q);
            thread::spawn(move || q.put(1))
        };
        let b = {
            let q = Arc::clone(&q);
            thread::spawn(move || q.put(2))
        };

        let first = q.take();
        q.advance();
        let second = q.take();
        q.advance();

        a.join().unwrap();
        b.join().unwrap();
        let mut both = [first, second];
        both.sort_unstable();
        assert_eq!(both, [1, 2]);
    }

    #[test]
    fn lockstep_no_event_lost_under_sequential_load() {
        let q = Arc::new(LockstepQueue::new());
        let producer = {
            let q = Arc::clone(&q);
            thread::spawn(move || {
                for i in 0..50 {
                    q.put(i);
                }
            })
        };
        for expected in 0..50 {
            assert_eq!(q.take(), expected);
            q.advance();
        }
        producer.join().unwrap();
    }
}
