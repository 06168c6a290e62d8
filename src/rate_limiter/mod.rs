//! Per-backend admission control with persisted state
//!
//! Implements an exact sliding-window counter: every admission decision
//! prunes timestamps older than the window, so capacity is enforced over a
//! rolling interval rather than refilled from a bucket. State is written to
//! the key-value store after every decision and reloaded at construction,
//! which lets limits survive process restarts.

mod types;
mod window;

#[cfg(test)]
mod tests;

pub use types::{RateLimitStatus, RateLimiterConfig};
pub use window::SlidingWindowLimiter;
