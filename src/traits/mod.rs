//! Trait definitions for swappable cache backends
//!
//! Consumers depend on [`cache::CacheStore`] so a Redis-backed facade and an
//! in-memory store can be substituted for one another.

pub mod cache;
