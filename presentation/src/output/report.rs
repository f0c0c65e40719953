//! Everything one forum round produced, ready for formatting.

use forum_application::{CastVoteOutput, ExecuteProposalOutput};
use forum_domain::{AgentId, Forum, Proposal, SpeakReason};
use serde::Serialize;

/// An agent the scheduler let speak, with why
#[derive(Debug, Clone, Serialize)]
pub struct SpeakerTurn {
    pub agent_id: AgentId,
    pub reason: SpeakReason,
}

/// A vote the forum refused, typically because a verdict was already reached
#[derive(Debug, Clone, Serialize)]
pub struct SkippedVote {
    pub agent_id: AgentId,
    pub error: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct RoundReport {
    /// Forum state at the end of the round
    pub forum: Forum,
    pub speakers: Vec<SpeakerTurn>,
    /// Proposal state at the end of the round
    pub proposal: Proposal,
    pub votes: Vec<CastVoteOutput>,
    pub skipped_votes: Vec<SkippedVote>,
    /// Present only when the proposal was approved and executed
    pub execution: Option<ExecuteProposalOutput>,
}
