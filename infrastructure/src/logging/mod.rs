//! Logging infrastructure - structured forum event logging.
//!
//! Provides [`JsonlForumEventLogger`], a JSONL file writer that implements
//! the [`ForumEventLogger`](forum_application::ForumEventLogger) port.

mod jsonl_logger;

pub use jsonl_logger::JsonlForumEventLogger;
