/*!
 * Queue Module
 * Blocking bounded FIFO with cooperative shutdown
 */

pub mod bounded;
pub mod types;

// Re-export public API
pub use bounded::BoundedQueue;
pub use types::{PushError, QueueStats, MAX_QUEUE_CAPACITY};
