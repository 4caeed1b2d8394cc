//! Look-aside cache adapters.
//!
//! - [`RedisLookasideCache`] talks to Redis through a `bb8-redis` pool.
//! - [`MemoryLookasideCache`] keeps entries in process with lazy expiry.
//! - [`DisabledLookasideCache`] always misses and discards writes.

mod disabled;
mod memory;
mod redis_cache;

pub use disabled::DisabledLookasideCache;
pub use memory::MemoryLookasideCache;
pub use redis_cache::{RedisCacheConfig, RedisLookasideCache};
