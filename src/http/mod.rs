//! HTTP transport for the REST store client
//!
//! A thin request executor: API-key header auth, token bucket rate
//! limiting, timeouts, and mapping of HTTP failures into the store error
//! taxonomy. Deliberately retry-free — retry belongs to the navigator's
//! policy, not the transport.

mod client;
mod rate_limit;

pub use client::{HttpClientConfig, HttpClientConfigBuilder, StoreHttpClient};
pub use rate_limit::{RateLimiter, RateLimiterConfig};
