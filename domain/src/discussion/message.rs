//! Discussion messages posted in a forum.

use crate::core::ids::{AgentId, ForumId, MessageId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of forum message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Discussion,
    Proposal,
    Vote,
    Result,
    System,
}

/// Where a message came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageOrigin {
    /// Generated by an agent's autonomous loop
    Autonomous,
    /// Posted from outside (a human, the API, a webhook)
    #[default]
    External,
}

/// A message in a forum's discussion log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscussionMessage {
    pub id: MessageId,
    pub forum_id: ForumId,
    /// `None` for system messages
    pub agent_id: Option<AgentId>,
    pub content: String,
    #[serde(default)]
    pub kind: MessageKind,
    #[serde(default)]
    pub origin: MessageOrigin,
    pub created_at: DateTime<Utc>,
}

impl DiscussionMessage {
    pub fn new(
        forum_id: impl Into<ForumId>,
        agent_id: Option<AgentId>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: MessageId::generate(),
            forum_id: forum_id.into(),
            agent_id,
            content: content.into(),
            kind: MessageKind::Discussion,
            origin: MessageOrigin::External,
            created_at,
        }
    }

    /// A message an agent produced on its own
    pub fn autonomous(
        forum_id: impl Into<ForumId>,
        agent_id: impl Into<AgentId>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut message = Self::new(forum_id, Some(agent_id.into()), content, created_at);
        message.origin = MessageOrigin::Autonomous;
        message
    }

    pub fn system(
        forum_id: impl Into<ForumId>,
        content: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Self {
        let mut message = Self::new(forum_id, None, content, created_at);
        message.kind = MessageKind::System;
        message
    }

    pub fn with_kind(mut self, kind: MessageKind) -> Self {
        self.kind = kind;
        self
    }

    /// Whether `agent` produced this message autonomously
    pub fn is_autonomous_from(&self, agent: &AgentId) -> bool {
        self.origin == MessageOrigin::Autonomous && self.agent_id.as_ref() == Some(agent)
    }
}
