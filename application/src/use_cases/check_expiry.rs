//! Check Expiry use case
//!
//! Pull-based expiry. Nothing in the core runs on a timer; an external
//! sweeper calls this for proposals and forums it wants re-checked.

use crate::ports::clock::Clock;
use crate::ports::event_logger::{ForumEvent, ForumEventLogger, NoForumEventLogger};
use crate::ports::repository::{ForumRepository, RepositoryError};
use crate::use_cases::shared::ProposalLocks;
use forum_domain::{ForumId, ForumStatus, ProposalId, ProposalStatus};
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

/// Use case for expiring proposals and forums past their horizon
pub struct CheckExpiryUseCase<R: ForumRepository + 'static> {
    repository: Arc<R>,
    clock: Arc<dyn Clock>,
    locks: Arc<ProposalLocks>,
    logger: Arc<dyn ForumEventLogger>,
}

impl<R: ForumRepository + 'static> CheckExpiryUseCase<R> {
    pub fn new(repository: Arc<R>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            clock,
            locks: Arc::new(ProposalLocks::new()),
            logger: Arc::new(NoForumEventLogger),
        }
    }

    pub fn with_locks(mut self, locks: Arc<ProposalLocks>) -> Self {
        self.locks = locks;
        self
    }

    pub fn with_logger(mut self, logger: Arc<dyn ForumEventLogger>) -> Self {
        self.logger = logger;
        self
    }

    /// Expire one proposal if it is still voting past its deadline.
    ///
    /// Returns the proposal's status after the check.
    pub async fn execute(
        &self,
        proposal_id: &ProposalId,
    ) -> Result<ProposalStatus, RepositoryError> {
        let _guard = self.locks.acquire(proposal_id).await;

        let mut proposal = self.repository.get_proposal(proposal_id).await?;
        if proposal.check_expiry(self.clock.now()) {
            info!(
                "Proposal {} expired with {}",
                proposal.id,
                proposal.tally().vote_summary()
            );
            self.repository.update_proposal(&proposal).await?;
            self.logger.log(ForumEvent::new(
                "proposal_expired",
                json!({
                    "forum_id": proposal.forum_id,
                    "proposal_id": proposal.id,
                    "expires_at": proposal.expires_at.to_rfc3339(),
                    "agree": proposal.agree_count(),
                    "disagree": proposal.disagree_count(),
                }),
            ));
        }

        Ok(proposal.status())
    }

    /// Check many proposals, returning the ones this sweep expired.
    ///
    /// A failing lookup is logged and skipped so one bad id does not stop
    /// the sweep.
    pub async fn sweep(&self, proposal_ids: &[ProposalId]) -> Vec<ProposalId> {
        let mut expired = Vec::new();
        for id in proposal_ids {
            let before = match self.repository.get_proposal(id).await {
                Ok(p) => p.status(),
                Err(e) => {
                    warn!("Skipping proposal {} in expiry sweep: {}", id, e);
                    continue;
                }
            };
            match self.execute(id).await {
                Ok(ProposalStatus::Expired) if before == ProposalStatus::Voting => {
                    expired.push(id.clone())
                }
                Ok(_) => {}
                Err(e) => warn!("Expiry check failed for proposal {}: {}", id, e),
            }
        }
        expired
    }

    /// Expire an active forum past its horizon.
    pub async fn check_forum(&self, forum_id: &ForumId) -> Result<ForumStatus, RepositoryError> {
        let mut forum = self.repository.get_forum(forum_id).await?;
        if forum.check_expiry(self.clock.now()) {
            info!("Forum {} expired", forum.id);
            self.repository.update_forum(&forum).await?;
            self.logger.log(ForumEvent::new(
                "forum_expired",
                json!({
                    "forum_id": forum.id,
                    "expires_at": forum.expires_at.to_rfc3339(),
                }),
            ));
        }
        Ok(forum.status)
    }
}
