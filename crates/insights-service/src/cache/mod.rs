//! Caching infrastructure for the service layer.
//!
//! Read paths go through [`CacheExt::lookup`] and [`CacheExt::store`], which
//! treat every cache failure as a miss so an unavailable Redis never fails a
//! request.

mod cache_interface;
pub mod cache_keys;
mod health;
#[cfg(test)]
pub(crate) mod memory;
mod redis_cache;

pub use cache_interface::{CacheExt, CacheInterface};
pub use health::CacheHealth;
pub use redis_cache::{RedisCacheService, RedisCacheServiceParameters, DEFAULT_KEY_PREFIX};
