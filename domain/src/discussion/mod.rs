//! Forum discussion: the message log and the per-agent speaking gate.

pub mod message;
pub mod scheduler;

pub use message::{DiscussionMessage, MessageKind, MessageOrigin};
pub use scheduler::{DiscussionPolicy, SpeakDecision, SpeakReason, should_speak};
