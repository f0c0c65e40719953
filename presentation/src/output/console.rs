//! Console output formatter for forum rounds

use super::report::RoundReport;
use colored::Colorize;
use forum_application::{CastVoteOutput, ExecuteProposalOutput};
use forum_domain::{ConsensusOutcome, ProposalStatus, VoteChoice};

const ERROR_WIDTH: usize = 72;

/// Formats round reports for console display
pub struct ConsoleFormatter;

impl ConsoleFormatter {
    /// Format the complete round report
    pub fn format(report: &RoundReport) -> String {
        let mut output = String::new();

        output.push_str(&Self::header("Agent Forum Round"));
        output.push('\n');

        output.push_str(&format!("{} {}\n", "Goal:".cyan().bold(), report.forum.goal));
        output.push_str(&format!(
            "{} {} ({})\n",
            "Forum:".cyan().bold(),
            report.forum.id,
            report.forum.status
        ));
        if let Some(pool) = &report.forum.pool_focus {
            output.push_str(&format!("{} {}\n", "Pool:".cyan().bold(), pool));
        }
        output.push_str(&format!(
            "{} {}\n",
            "Quorum:".cyan().bold(),
            report.forum.quorum().description()
        ));

        output.push_str(&Self::section_header("Discussion"));
        if report.speakers.is_empty() {
            output.push_str(&format!("  {}\n", "nobody may speak right now".dimmed()));
        }
        for turn in &report.speakers {
            output.push_str(&format!(
                "  {} {}\n",
                turn.agent_id.to_string().yellow(),
                format!("({})", turn.reason).dimmed()
            ));
        }

        output.push_str(&Self::section_header("Proposal"));
        let proposal = &report.proposal;
        output.push_str(&format!(
            "  {} {} by {}\n",
            proposal.id.to_string().bold(),
            proposal.action.describe(),
            proposal.proposer
        ));
        if let Some(hooks) = &proposal.hooks {
            output.push_str(&format!("  hooks: {:?}\n", hooks.flags));
        }
        output.push_str(&format!(
            "  status: {}\n",
            Self::status_label(proposal.status())
        ));

        output.push_str(&Self::section_header("Votes"));
        for vote in &report.votes {
            output.push_str(&Self::vote_line(vote));
        }
        for skipped in &report.skipped_votes {
            output.push_str(&format!(
                "  {} {} {}\n",
                "-".dimmed(),
                skipped.agent_id,
                clip(&skipped.error, ERROR_WIDTH).dimmed()
            ));
        }

        if let Some(execution) = &report.execution {
            output.push_str(&Self::section_header("Execution"));
            output.push_str(&Self::execution_block(execution));
        }

        output.push_str(&Self::footer());
        output
    }

    fn vote_line(output: &CastVoteOutput) -> String {
        let mark = match output.vote.choice {
            VoteChoice::Agree => "v".green(),
            VoteChoice::Disagree => "x".red(),
        };
        let verdict = match output.verdict.outcome {
            ConsensusOutcome::Approved => "approved".green().bold(),
            ConsensusOutcome::Rejected => "rejected".red().bold(),
            ConsensusOutcome::Pending => match output.verdict.reason {
                Some(reason) => reason.as_str().dimmed(),
                None => "pending".dimmed(),
            },
        };
        let ratio = output
            .verdict
            .percentage
            .map(|p| format!(" {:.0}%", p * 100.0))
            .unwrap_or_default();

        format!(
            "  {} {} {} [{}/{}{}] {}\n",
            mark,
            output.vote.agent_id,
            output.vote.choice,
            output.tally.agree,
            output.tally.total(),
            ratio,
            verdict
        )
    }

    fn execution_block(execution: &ExecuteProposalOutput) -> String {
        let mut output = String::new();
        for result in &execution.results {
            if result.is_success() {
                output.push_str(&format!(
                    "  {} {} {}{}\n",
                    "v".green(),
                    result.agent_id,
                    result.tx_hash.as_deref().unwrap_or("-"),
                    result
                        .gas_used
                        .map(|g| format!(" (gas {})", g))
                        .unwrap_or_default()
                ));
            } else {
                output.push_str(&format!(
                    "  {} {} {}\n",
                    "x".red(),
                    result.agent_id,
                    clip(result.error.as_deref().unwrap_or("unknown error"), ERROR_WIDTH)
                        .red()
                ));
            }
            if result.attempts > 1 {
                output.push_str(&format!(
                    "    {}\n",
                    format!("after {} attempts", result.attempts).dimmed()
                ));
            }
        }

        let summary = &execution.summary;
        output.push_str(&format!(
            "\n{} {}/{} succeeded, proposal {}\n",
            "Summary:".cyan().bold(),
            summary.successful,
            summary.total,
            Self::status_label(execution.status)
        ));
        output
    }

    fn status_label(status: ProposalStatus) -> String {
        match status {
            ProposalStatus::Approved | ProposalStatus::Executed => {
                status.as_str().green().bold().to_string()
            }
            ProposalStatus::Rejected | ProposalStatus::Expired | ProposalStatus::Failed => {
                status.as_str().red().bold().to_string()
            }
            ProposalStatus::Voting | ProposalStatus::Executing => {
                status.as_str().yellow().to_string()
            }
        }
    }

    fn header(title: &str) -> String {
        let line = "=".repeat(60);
        format!("{}\n{:^60}\n{}", line.cyan(), title.bold(), line.cyan())
    }

    fn section_header(title: &str) -> String {
        format!("\n{}\n{}\n", title.cyan().bold(), "-".repeat(40))
    }

    fn footer() -> String {
        format!("\n{}\n", "=".repeat(60).cyan())
    }
}

/// Cut `s` to at most `max_chars` characters, marking the cut with `...`
fn clip(s: &str, max_chars: usize) -> String {
    match s.char_indices().nth(max_chars) {
        None => s.to_string(),
        Some(_) => {
            let keep = max_chars.saturating_sub(3);
            let end = s.char_indices().nth(keep).map_or(s.len(), |(i, _)| i);
            format!("{}...", &s[..end])
        }
    }
}
