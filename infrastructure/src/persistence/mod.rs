//! Persistence adapters
//!
//! [`InMemoryForumStore`] implements the
//! [`ForumRepository`](forum_application::ForumRepository) port; agent
//! profiles go through its [`TtlCache`].

mod memory;
mod ttl_cache;

pub use memory::InMemoryForumStore;
pub use ttl_cache::TtlCache;
