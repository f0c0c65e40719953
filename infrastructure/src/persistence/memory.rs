//! In-memory forum store.
//!
//! Reference implementation of the [`ForumRepository`] port. Forums,
//! proposals, votes, messages and executions live in process memory; agent
//! profiles are served through an explicit [`TtlCache`].

use super::ttl_cache::TtlCache;
use async_trait::async_trait;
use chrono::Duration;
use forum_application::ports::clock::{Clock, SystemClock};
use forum_application::ports::repository::{ForumRepository, RepositoryError};
use forum_domain::{
    AgentId, AgentProfile, DiscussionMessage, Execution, Forum, ForumId, Proposal, ProposalId,
    Vote,
};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

#[derive(Default)]
struct Tables {
    forums: HashMap<ForumId, Forum>,
    agents: HashMap<AgentId, AgentProfile>,
    proposals: HashMap<ProposalId, Proposal>,
    votes: Vec<Vote>,
    messages: Vec<DiscussionMessage>,
    executions: Vec<Execution>,
}

/// Process-local store for forums and everything in them
pub struct InMemoryForumStore {
    tables: Mutex<Tables>,
    agent_cache: TtlCache<AgentId, AgentProfile>,
    clock: Arc<dyn Clock>,
}

impl InMemoryForumStore {
    /// Create a store caching agent profiles for `agent_ttl`
    pub fn new(agent_ttl: Duration) -> Self {
        Self::with_cache(TtlCache::new(agent_ttl), Arc::new(SystemClock))
    }

    pub fn with_cache(
        agent_cache: TtlCache<AgentId, AgentProfile>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            tables: Mutex::new(Tables::default()),
            agent_cache,
            clock,
        }
    }

    fn tables(&self) -> Result<MutexGuard<'_, Tables>, RepositoryError> {
        self.tables
            .lock()
            .map_err(|_| RepositoryError::Storage("store lock poisoned".to_string()))
    }

    // ==================== Creation (API layer) ====================

    pub fn insert_forum(&self, forum: Forum) -> Result<(), RepositoryError> {
        self.tables()?.forums.insert(forum.id.clone(), forum);
        Ok(())
    }

    /// Insert or replace an agent profile, dropping any cached copy
    pub fn upsert_agent(&self, agent: AgentProfile) -> Result<(), RepositoryError> {
        self.agent_cache.invalidate(&agent.id);
        self.tables()?.agents.insert(agent.id.clone(), agent);
        Ok(())
    }

    pub fn insert_proposal(&self, proposal: Proposal) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        if !tables.forums.contains_key(&proposal.forum_id) {
            return Err(RepositoryError::ForumNotFound(proposal.forum_id.clone()));
        }
        tables.proposals.insert(proposal.id.clone(), proposal);
        Ok(())
    }

    pub fn post_message(&self, message: DiscussionMessage) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        if !tables.forums.contains_key(&message.forum_id) {
            return Err(RepositoryError::ForumNotFound(message.forum_id.clone()));
        }
        tables.messages.push(message);
        Ok(())
    }

    /// Proposals of a forum, oldest first
    pub fn list_proposals(&self, forum: &ForumId) -> Result<Vec<Proposal>, RepositoryError> {
        let tables = self.tables()?;
        let mut proposals: Vec<Proposal> = tables
            .proposals
            .values()
            .filter(|p| &p.forum_id == forum)
            .cloned()
            .collect();
        proposals.sort_by_key(|p| p.created_at);
        Ok(proposals)
    }
}

#[async_trait]
impl ForumRepository for InMemoryForumStore {
    async fn get_forum(&self, id: &ForumId) -> Result<Forum, RepositoryError> {
        self.tables()?
            .forums
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::ForumNotFound(id.clone()))
    }

    async fn update_forum(&self, forum: &Forum) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        match tables.forums.get_mut(&forum.id) {
            Some(stored) => {
                *stored = forum.clone();
                Ok(())
            }
            None => Err(RepositoryError::ForumNotFound(forum.id.clone())),
        }
    }

    async fn get_agent(&self, id: &AgentId) -> Result<AgentProfile, RepositoryError> {
        let now = self.clock.now();
        if let Some(agent) = self.agent_cache.get(id, now) {
            return Ok(agent);
        }

        let agent = self
            .tables()?
            .agents
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::AgentNotFound(id.clone()))?;
        let purged = self.agent_cache.purge_expired(now);
        debug!("Agent cache miss for {} ({} stale entries purged)", id, purged);
        self.agent_cache.insert(id.clone(), agent.clone(), now);
        Ok(agent)
    }

    async fn get_proposal(&self, id: &ProposalId) -> Result<Proposal, RepositoryError> {
        self.tables()?
            .proposals
            .get(id)
            .cloned()
            .ok_or_else(|| RepositoryError::ProposalNotFound(id.clone()))
    }

    async fn update_proposal(&self, proposal: &Proposal) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        match tables.proposals.get_mut(&proposal.id) {
            Some(stored) => {
                *stored = proposal.clone();
                Ok(())
            }
            None => Err(RepositoryError::ProposalNotFound(proposal.id.clone())),
        }
    }

    async fn has_voted(
        &self,
        proposal: &ProposalId,
        agent: &AgentId,
    ) -> Result<bool, RepositoryError> {
        Ok(self
            .tables()?
            .votes
            .iter()
            .any(|v| &v.proposal_id == proposal && &v.agent_id == agent))
    }

    async fn append_vote(&self, vote: &Vote) -> Result<(), RepositoryError> {
        let mut tables = self.tables()?;
        if !tables.proposals.contains_key(&vote.proposal_id) {
            return Err(RepositoryError::ProposalNotFound(vote.proposal_id.clone()));
        }
        if tables
            .votes
            .iter()
            .any(|v| v.proposal_id == vote.proposal_id && v.agent_id == vote.agent_id)
        {
            return Err(RepositoryError::DuplicateVote {
                proposal: vote.proposal_id.clone(),
                agent: vote.agent_id.clone(),
            });
        }
        tables.votes.push(vote.clone());
        Ok(())
    }

    async fn list_votes(&self, proposal: &ProposalId) -> Result<Vec<Vote>, RepositoryError> {
        Ok(self
            .tables()?
            .votes
            .iter()
            .filter(|v| &v.proposal_id == proposal)
            .cloned()
            .collect())
    }

    async fn list_recent_messages(
        &self,
        forum: &ForumId,
        limit: usize,
    ) -> Result<Vec<DiscussionMessage>, RepositoryError> {
        let tables = self.tables()?;
        let mut messages: Vec<DiscussionMessage> = tables
            .messages
            .iter()
            .filter(|m| &m.forum_id == forum)
            .cloned()
            .collect();
        messages.sort_by_key(|m| m.created_at);
        let skip = messages.len().saturating_sub(limit);
        Ok(messages.split_off(skip))
    }

    async fn record_execution(&self, execution: &Execution) -> Result<(), RepositoryError> {
        self.tables()?.executions.push(execution.clone());
        Ok(())
    }

    async fn list_executions(
        &self,
        proposal: &ProposalId,
    ) -> Result<Vec<Execution>, RepositoryError> {
        Ok(self
            .tables()?
            .executions
            .iter()
            .filter(|e| &e.proposal_id == proposal)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, TimeZone, Utc};
    use forum_domain::{ExecutionResult, ProposalAction, QuorumConfig, SwapParams};

    struct StepClock(Mutex<DateTime<Utc>>);

    impl Clock for StepClock {
        fn now(&self) -> DateTime<Utc> {
            *self.0.lock().unwrap()
        }
    }

    fn t0() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap()
    }

    fn store() -> InMemoryForumStore {
        let store = InMemoryForumStore::new(Duration::minutes(5));
        store
            .insert_forum(
                Forum::new("Earn fees", QuorumConfig::default(), 60, t0()).with_id("f-1"),
            )
            .unwrap();
        store
    }

    fn swap() -> ProposalAction {
        ProposalAction::Swap(SwapParams {
            token_in: "USDC".to_string(),
            token_out: "WETH".to_string(),
            amount_in: "10".to_string(),
            min_amount_out: None,
            fee: None,
            slippage_bps: None,
        })
    }

    #[tokio::test]
    async fn test_append_vote_rejects_duplicates() {
        let store = store();
        store
            .insert_proposal(
                Proposal::new("f-1", "alice.eth", swap(), t0(), Duration::minutes(60))
                    .with_id("p-1"),
            )
            .unwrap();

        store.append_vote(&Vote::agree("p-1", "bob.eth")).await.unwrap();
        let err = store
            .append_vote(&Vote::disagree("p-1", "bob.eth"))
            .await
            .unwrap_err();

        assert!(matches!(err, RepositoryError::DuplicateVote { .. }));
        assert!(
            store
                .has_voted(&ProposalId::new("p-1"), &AgentId::new("bob.eth"))
                .await
                .unwrap()
        );
        assert_eq!(
            store
                .list_votes(&ProposalId::new("p-1"))
                .await
                .unwrap()
                .len(),
            1
        );
    }

    #[tokio::test]
    async fn test_vote_on_unknown_proposal() {
        let err = store()
            .append_vote(&Vote::agree("p-404", "bob.eth"))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            RepositoryError::ProposalNotFound(ProposalId::new("p-404"))
        );
    }

    #[tokio::test]
    async fn test_recent_messages_are_newest_window_in_time_order() {
        let store = store();
        for (i, minute) in [3, 1, 2].into_iter().enumerate() {
            store
                .post_message(DiscussionMessage::new(
                    "f-1",
                    None,
                    format!("m{i}"),
                    t0() + Duration::minutes(minute),
                ))
                .unwrap();
        }

        let recent = store
            .list_recent_messages(&ForumId::new("f-1"), 2)
            .await
            .unwrap();
        let contents: Vec<&str> = recent.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m2", "m0"]);
    }

    #[tokio::test]
    async fn test_agent_profiles_are_cached_with_ttl() {
        let clock = Arc::new(StepClock(Mutex::new(t0())));
        let store =
            InMemoryForumStore::with_cache(TtlCache::new(Duration::minutes(5)), clock.clone());
        store.upsert_agent(AgentProfile::new("alice.eth")).unwrap();

        let first = store.get_agent(&AgentId::new("alice.eth")).await.unwrap();
        assert!(first.preferred_pools.is_empty());

        // Bypass upsert so the cached copy goes stale
        store
            .tables
            .lock()
            .unwrap()
            .agents
            .insert(
                AgentId::new("alice.eth"),
                AgentProfile::new("alice.eth").with_preferred_pool("USDC/WETH"),
            );

        let cached = store.get_agent(&AgentId::new("alice.eth")).await.unwrap();
        assert!(cached.preferred_pools.is_empty());

        *clock.0.lock().unwrap() = t0() + Duration::minutes(6);
        let refreshed = store.get_agent(&AgentId::new("alice.eth")).await.unwrap();
        assert_eq!(refreshed.preferred_pools, vec!["USDC/WETH".to_string()]);
    }

    #[tokio::test]
    async fn test_cache_miss_purges_stale_profiles() {
        let clock = Arc::new(StepClock(Mutex::new(t0())));
        let store =
            InMemoryForumStore::with_cache(TtlCache::new(Duration::minutes(5)), clock.clone());
        for agent in ["alice.eth", "bob.eth", "carol.eth"] {
            store.upsert_agent(AgentProfile::new(agent)).unwrap();
        }
        store.get_agent(&AgentId::new("alice.eth")).await.unwrap();
        store.get_agent(&AgentId::new("bob.eth")).await.unwrap();
        assert_eq!(store.agent_cache.len(), 2);

        *clock.0.lock().unwrap() = t0() + Duration::minutes(6);
        store.get_agent(&AgentId::new("carol.eth")).await.unwrap();
        assert_eq!(store.agent_cache.len(), 1);
    }

    #[tokio::test]
    async fn test_upsert_invalidates_cache() {
        let store = store();
        store.upsert_agent(AgentProfile::new("bob.eth")).unwrap();
        store.get_agent(&AgentId::new("bob.eth")).await.unwrap();

        store
            .upsert_agent(AgentProfile::new("bob.eth").with_preferred_pool("WBTC"))
            .unwrap();
        let agent = store.get_agent(&AgentId::new("bob.eth")).await.unwrap();
        assert_eq!(agent.preferred_pools, vec!["WBTC".to_string()]);
    }

    #[tokio::test]
    async fn test_executions_by_proposal() {
        let store = store();
        let ok = ExecutionResult::success("alice.eth", "0x01");
        let failed = ExecutionResult::failure("bob.eth", "reverted");
        store
            .record_execution(&Execution::from_result("p-1", &ok, t0()))
            .await
            .unwrap();
        store
            .record_execution(&Execution::from_result("p-2", &failed, t0()))
            .await
            .unwrap();

        let executions = store
            .list_executions(&ProposalId::new("p-1"))
            .await
            .unwrap();
        assert_eq!(executions.len(), 1);
        assert_eq!(executions[0].tx_hash.as_deref(), Some("0x01"));
    }

    #[tokio::test]
    async fn test_proposal_requires_forum() {
        let store = store();
        let err = store
            .insert_proposal(Proposal::new(
                "f-404",
                "alice.eth",
                swap(),
                t0(),
                Duration::minutes(1),
            ))
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ForumNotFound(_)));
    }
}
