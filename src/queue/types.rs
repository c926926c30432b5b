/*!
 * Queue Types
 * Public error and stats types for the bounded queue
 */

use thiserror::Error;

/// Hard ceiling on queue capacity.
///
/// Requested capacities above this limit are clamped at construction; the
/// effective capacity is observable via `capacity()`.
pub const MAX_QUEUE_CAPACITY: usize = 10_000;

/// Error returned by a push on a queue that has been shut down.
///
/// Carries the rejected element back to the caller so an owned value is
/// never silently dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("queue is shut down")]
pub struct PushError<T>(pub T);

impl<T> PushError<T> {
    /// Returns the element that failed to be enqueued.
    #[inline]
    pub fn into_inner(self) -> T {
        self.0
    }
}

/// Point-in-time queue statistics.
///
/// The snapshot is taken under the queue lock, but concurrent operations may
/// make it stale immediately after it is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct QueueStats {
    pub capacity: usize,
    pub length: usize,
    pub shutdown: bool,
}
