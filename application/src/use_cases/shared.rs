//! Shared utilities for use cases.
//!
//! Contains the per-proposal lock that serializes every read-modify-write of
//! a proposal (votes, expiry checks, execution transitions).

use forum_domain::ProposalId;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::sync::OwnedMutexGuard;

/// Async locks keyed by proposal id
///
/// Share one instance (behind an `Arc`) between the use cases that touch the
/// same proposals.
#[derive(Default)]
pub struct ProposalLocks {
    locks: Mutex<HashMap<ProposalId, Arc<tokio::sync::Mutex<()>>>>,
}

impl ProposalLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to a proposal.
    pub async fn acquire(&self, id: &ProposalId) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(id.clone()).or_default())
        };
        lock.lock_owned().await
    }

    /// Drop the lock entry of a proposal nobody holds or waits on.
    ///
    /// Call after the guard is released, once the proposal is terminal.
    pub fn prune(&self, id: &ProposalId) {
        let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
        if locks
            .get(id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(id);
        }
    }

    pub fn len(&self) -> usize {
        self.locks.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_proposal_is_serialized() {
        let locks = Arc::new(ProposalLocks::new());
        let id = ProposalId::new("p-1");

        let guard = locks.acquire(&id).await;

        let waiter = {
            let locks = Arc::clone(&locks);
            let id = id.clone();
            tokio::spawn(async move {
                let _guard = locks.acquire(&id).await;
            })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn test_different_proposals_do_not_block() {
        let locks = ProposalLocks::new();
        let _a = locks.acquire(&ProposalId::new("p-1")).await;
        let _b = locks.acquire(&ProposalId::new("p-2")).await;
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_prune_only_released_entries() {
        let locks = ProposalLocks::new();
        let id = ProposalId::new("p-1");

        let guard = locks.acquire(&id).await;
        locks.prune(&id);
        assert_eq!(locks.len(), 1);

        drop(guard);
        locks.prune(&id);
        assert!(locks.is_empty());
    }
}
