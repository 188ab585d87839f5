//! Infrastructure shared by connection helpers.

pub mod retry;

pub use retry::{retry, retry_with_backoff, RetryConfig};
