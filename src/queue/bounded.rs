/*!
 * Bounded Queue
 * Fixed-capacity blocking FIFO for handing work between threads
 */

use super::types::{PushError, QueueStats, MAX_QUEUE_CAPACITY};
use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use tracing::debug;

/// A bounded, blocking, FIFO work queue.
///
/// `BoundedQueue<T>` hands elements from producer threads to consumer threads
/// through a fixed-capacity circular buffer. Producers block while the buffer
/// is full; consumers block while it is empty. A cooperative
/// [`shutdown`](BoundedQueue::shutdown) makes the queue permanently
/// drain-only: elements already buffered remain poppable, new pushes are
/// rejected, and once the buffer is drained every `pop` returns `None`.
///
/// # Semantics
///
/// - **push**: blocks when full, fails only after `shutdown`
/// - **pop**: blocks when empty, returns `None` only after `shutdown` once
///   the buffer is drained
/// - **shutdown**: idempotent; wakes every blocked producer and consumer
/// - **clear**: discards buffered elements and wakes blocked producers, but
///   never resets the shutdown flag
///
/// # Thread Safety
///
/// The queue is a cheap cloneable handle over shared state; clones refer to
/// the same buffer. All operations take `&self` and may be called from any
/// number of producer and consumer threads. Delivery is strict FIFO and each
/// pushed element is received by exactly one consumer. No fairness order is
/// guaranteed among multiple threads blocked on the same side; the runtime's
/// wake order governs.
///
/// # Example
///
/// ```
/// use handoff::BoundedQueue;
/// use std::thread;
///
/// let queue = BoundedQueue::new(4);
///
/// let producer = {
///     let q = queue.clone();
///     thread::spawn(move || {
///         for i in 0..10 {
///             q.push(i).unwrap();
///         }
///         q.shutdown();
///     })
/// };
///
/// let mut items = Vec::new();
/// while let Some(item) = queue.pop() {
///     items.push(item);
/// }
///
/// producer.join().unwrap();
/// assert_eq!(items, (0..10).collect::<Vec<_>>());
/// ```
pub struct BoundedQueue<T> {
    inner: Arc<Inner<T>>,
}

struct Inner<T> {
    state: Mutex<State<T>>,
    not_empty: Condvar,
    not_full: Condvar,
}

struct State<T> {
    slots: Vec<Option<T>>,
    // Virtual cursors counting total pops (head) and pushes (tail). They only
    // grow; wrapping arithmetic keeps the difference correct if they ever
    // overflow. The physical slot for a logical index is `index % capacity`,
    // and a slot holds `Some` exactly while its index is in `head..tail`.
    head: usize,
    tail: usize,
    done: bool,
}

impl<T> State<T> {
    #[inline]
    fn len(&self) -> usize {
        self.tail.wrapping_sub(self.head)
    }

    #[inline]
    fn is_full(&self) -> bool {
        self.len() == self.slots.len()
    }

    #[inline]
    fn is_empty(&self) -> bool {
        self.head == self.tail
    }
}

impl<T> Clone for BoundedQueue<T> {
    fn clone(&self) -> Self {
        BoundedQueue {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T> BoundedQueue<T> {
    /// Creates a new queue with the specified capacity.
    ///
    /// Capacities above `MAX_QUEUE_CAPACITY` are clamped; the effective
    /// capacity is observable via [`capacity`](BoundedQueue::capacity).
    ///
    /// # Panics
    ///
    /// Panics if `capacity` is zero.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "capacity must be greater than 0");
        let capacity = capacity.min(MAX_QUEUE_CAPACITY);
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);
        debug!(capacity, "bounded queue created");

        BoundedQueue {
            inner: Arc::new(Inner {
                state: Mutex::new(State {
                    slots,
                    head: 0,
                    tail: 0,
                    done: false,
                }),
                not_empty: Condvar::new(),
                not_full: Condvar::new(),
            }),
        }
    }

    /// Pushes an element into the queue.
    ///
    /// Blocks while the buffer is full until space becomes available. Returns
    /// `Err` carrying the element back once the queue has been shut down;
    /// shutdown takes precedence over available space, so a push never
    /// succeeds after [`shutdown`](BoundedQueue::shutdown) even on a
    /// non-full queue.
    ///
    /// There is no timeout: a push on a full queue that is never drained and
    /// never shut down blocks indefinitely.
    pub fn push(&self, item: T) -> Result<(), PushError<T>> {
        let mut state = self.inner.state.lock();
        loop {
            if state.done {
                return Err(PushError(item));
            }
            if !state.is_full() {
                break;
            }
            self.inner.not_full.wait(&mut state);
        }

        let slot = state.tail % state.slots.len();
        state.slots[slot] = Some(item);
        state.tail = state.tail.wrapping_add(1);

        drop(state);
        self.inner.not_empty.notify_one();
        Ok(())
    }

    /// Pops the oldest element from the queue.
    ///
    /// Blocks while the buffer is empty until an element arrives. Returns
    /// `None` only once the queue has been shut down and fully drained; that
    /// is the end-of-stream signal, and every later call returns `None` too.
    pub fn pop(&self) -> Option<T> {
        let mut state = self.inner.state.lock();
        while state.is_empty() {
            if state.done {
                return None;
            }
            self.inner.not_empty.wait(&mut state);
        }

        let slot = state.head % state.slots.len();
        let item = state.slots[slot].take().expect("live slot holds an element");
        state.head = state.head.wrapping_add(1);

        drop(state);
        self.inner.not_full.notify_one();
        Some(item)
    }

    /// Returns true if the buffer is currently empty.
    ///
    /// Advisory only: a concurrent push or pop can invalidate the answer
    /// immediately. Never use this to decide whether `pop` will block.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.inner.state.lock().is_empty()
    }

    /// Returns true if the buffer is currently full. Advisory only.
    #[inline]
    pub fn is_full(&self) -> bool {
        self.inner.state.lock().is_full()
    }

    /// Returns the number of buffered elements. Advisory only.
    #[inline]
    pub fn len(&self) -> usize {
        self.inner.state.lock().len()
    }

    /// Returns the queue capacity.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.inner.state.lock().slots.len()
    }

    /// Returns true if the queue has been shut down.
    ///
    /// Advisory only; callers must not spin on this as a substitute for the
    /// blocking `push`/`pop` protocol.
    #[inline]
    pub fn is_shutdown(&self) -> bool {
        self.inner.state.lock().done
    }

    /// Shuts the queue down.
    ///
    /// After shutdown the queue is drain-only: buffered elements remain
    /// poppable, new pushes fail, and `pop` returns `None` once the buffer is
    /// empty. The flag is sticky for the life of the queue and the call is
    /// idempotent.
    pub fn shutdown(&self) {
        let mut state = self.inner.state.lock();
        if state.done {
            return;
        }
        state.done = true;
        let buffered = state.len();
        drop(state);

        // Wake both sides: blocked consumers re-check the flag and exit,
        // blocked producers fail fast.
        self.inner.not_empty.notify_all();
        self.inner.not_full.notify_all();
        debug!(buffered, "queue shut down");
    }

    /// Discards all buffered elements and resets the cursors.
    ///
    /// Blocked producers are woken since the buffer is guaranteed non-full
    /// afterwards; on a shut-down queue they will re-check the shutdown flag
    /// and fail. The shutdown flag and the capacity are left untouched.
    pub fn clear(&self) {
        let mut state = self.inner.state.lock();
        let discarded = state.len();
        for slot in state.slots.iter_mut() {
            *slot = None;
        }
        state.head = 0;
        state.tail = 0;
        drop(state);

        self.inner.not_full.notify_all();
        debug!(discarded, "queue cleared");
    }

    /// Returns a snapshot of the queue state taken under a single lock.
    pub fn stats(&self) -> QueueStats {
        let state = self.inner.state.lock();
        QueueStats {
            capacity: state.slots.len(),
            length: state.len(),
            shutdown: state.done,
        }
    }
}
