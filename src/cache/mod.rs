//! Short-lived response memoization
//!
//! Keys combine the operation, the level or length tag, and a content hash of
//! a normalized text prefix. Entries expire on a fixed TTL independent of
//! access and are evicted in insertion order (FIFO, not recency) once the
//! capacity bound is reached — a hot entry can be evicted before a cold one.

mod response_cache;
mod types;

pub use response_cache::ResponseCache;
pub use types::CacheKey;

use std::time::Duration;

/// Default time-to-live for cached responses
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Default entry capacity
pub const DEFAULT_CAPACITY: usize = 100;
