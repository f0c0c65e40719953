//! Quorum consensus domain
//!
//! "Consensus" in a forum is a weighted-vote threshold over a bounded set of
//! known participants. There is no cross-process agreement protocol here.
//!
//! ```text
//! votes ──► VoteTally ──► evaluate(tally, QuorumConfig) ──► Verdict
//!                                                        ├─ Approved
//!                                                        ├─ Rejected (consensus_impossible)
//!                                                        └─ Pending  (insufficient_participation
//!                                                                     | voting_in_progress)
//! ```

pub mod consensus;
pub mod rule;
pub mod vote;

// Re-export main types
pub use consensus::{ConsensusOutcome, Verdict, VerdictReason, evaluate};
pub use rule::QuorumConfig;
pub use vote::{Vote, VoteChoice, VoteTally};
