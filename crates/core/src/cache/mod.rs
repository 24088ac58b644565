//! Tag-based cache invalidation.
//!
//! Views register a callback per tag; after a mutation the caller invalidates
//! the affected tags and every subscriber of those tags is told to refetch.
//! The registry is an owned value shared by `Arc`, never a global.

mod cache_tag;
mod tag_cache;

pub use cache_tag::{CacheTag, Mutation};
pub use tag_cache::{InvalidationCallback, SubscriptionId, TagCache};
