//! Forums and their participating agents.

pub mod agent;
pub mod entities;

pub use agent::AgentProfile;
pub use entities::{Forum, ForumStatus};
