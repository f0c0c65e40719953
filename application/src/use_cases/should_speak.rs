//! Should Speak use case
//!
//! Loads what the discussion scheduler needs (agent profile, forum, recent
//! message window) and asks it whether an agent may post now.

use crate::ports::clock::Clock;
use crate::ports::repository::{ForumRepository, RepositoryError};
use forum_domain::{
    AgentId, DiscussionPolicy, ForumId, ForumStatus, SpeakDecision, should_speak,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::debug;

/// Number of recent messages the scheduler looks at by default
pub const DEFAULT_MESSAGE_WINDOW: usize = 20;

/// Errors that can occur while scheduling discussion turns
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("Agent {agent} is not a participant of forum {forum}")]
    NotParticipant { forum: ForumId, agent: AgentId },

    #[error("Forum {forum} is {status}, discussion is closed")]
    ForumClosed { forum: ForumId, status: ForumStatus },

    #[error("Repository error: {0}")]
    Repository(#[from] RepositoryError),
}

/// Use case for gating autonomous discussion
pub struct ShouldSpeakUseCase<R: ForumRepository + 'static> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    policy: DiscussionPolicy,
    message_window: usize,
}

impl<R: ForumRepository + 'static> ShouldSpeakUseCase<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            policy: DiscussionPolicy::default(),
            message_window: DEFAULT_MESSAGE_WINDOW,
        }
    }

    pub fn with_policy(mut self, policy: DiscussionPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_message_window(mut self, window: usize) -> Self {
        self.message_window = window;
        self
    }

    /// Decide whether `agent_id` may post in `forum_id` now
    pub async fn execute(
        &self,
        forum_id: &ForumId,
        agent_id: &AgentId,
    ) -> Result<SpeakDecision, ScheduleError> {
        let forum = self.repository.get_forum(forum_id).await?;
        if forum.status != ForumStatus::Active {
            return Err(ScheduleError::ForumClosed {
                forum: forum.id,
                status: forum.status,
            });
        }
        if !forum.is_participant(agent_id) {
            return Err(ScheduleError::NotParticipant {
                forum: forum.id,
                agent: agent_id.clone(),
            });
        }

        let agent = self.repository.get_agent(agent_id).await?;
        let recent = self
            .repository
            .list_recent_messages(forum_id, self.message_window)
            .await?;

        let decision = should_speak(&agent, &forum, &recent, &self.policy, self.clock.now());
        debug!(
            "Agent {} in forum {}: speak={} ({})",
            agent_id, forum_id, decision.should, decision.reason
        );
        Ok(decision)
    }

    /// Every participant allowed to speak now, best candidates first.
    ///
    /// Ties keep join order.
    pub async fn next_speakers(
        &self,
        forum_id: &ForumId,
    ) -> Result<Vec<(AgentId, SpeakDecision)>, ScheduleError> {
        let forum = self.repository.get_forum(forum_id).await?;
        let mut speakers = Vec::new();
        for agent_id in forum.participants() {
            let decision = self.execute(forum_id, agent_id).await?;
            if decision.should {
                speakers.push((agent_id.clone(), decision));
            }
        }
        speakers.sort_by_key(|(_, d)| d.reason.priority());
        Ok(speakers)
    }
}
