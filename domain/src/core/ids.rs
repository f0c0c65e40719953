//! Identifier value objects.
//!
//! Every record in the forum is keyed by a string identifier. Agents are keyed
//! by a stable, ENS-style name (e.g. `"alice.agents.eth"`); the core never
//! validates identity, it only relies on equality.

use serde::{Deserialize, Serialize};

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Creates an identifier from an existing string.
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            /// Generates a new random identifier (UUID v4).
            pub fn generate() -> Self {
                Self(uuid::Uuid::new_v4().to_string())
            }

            /// Returns the ID as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl<T: Into<String>> From<T> for $name {
            fn from(s: T) -> Self {
                Self::new(s)
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

string_id!(
    /// Unique identifier for a forum.
    ForumId
);

string_id!(
    /// Unique identifier for a proposal.
    ProposalId
);

string_id!(
    /// Stable identifier for an agent (ENS-style name).
    AgentId
);

string_id!(
    /// Unique identifier for a vote record.
    VoteId
);

string_id!(
    /// Unique identifier for an execution record.
    ExecutionId
);

string_id!(
    /// Unique identifier for a discussion message.
    MessageId
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_agent_id_display() {
        let id = AgentId::new("alice.agents.eth");
        assert_eq!(id.to_string(), "alice.agents.eth");
        assert_eq!(id.as_str(), "alice.agents.eth");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(VoteId::generate(), VoteId::generate());
    }

    #[test]
    fn test_serializes_transparently() {
        let id = ProposalId::new("p-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"p-1\"");
    }
}
