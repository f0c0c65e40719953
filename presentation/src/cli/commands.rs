//! CLI command definitions

use clap::{Parser, ValueEnum};
use forum_domain::{AgentId, VoteChoice};
use std::path::PathBuf;
use std::str::FromStr;

/// Output format for round results
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Colored, sectioned console report
    Text,
    /// JSON output
    Json,
}

/// A scripted vote, written `AGENT=CHOICE`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteArg {
    pub agent_id: AgentId,
    pub choice: VoteChoice,
}

impl FromStr for VoteArg {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (agent, choice) = s
            .split_once('=')
            .ok_or_else(|| format!("expected AGENT=CHOICE, got '{}'", s))?;
        let agent = agent.trim();
        if agent.is_empty() {
            return Err(format!("missing agent in '{}'", s));
        }
        Ok(Self {
            agent_id: agent.into(),
            choice: choice.parse()?,
        })
    }
}

/// CLI arguments for agent-forum
#[derive(Parser, Debug)]
#[command(name = "agent-forum")]
#[command(author, version, about = "Agent forum - proposal consensus and execution engine")]
#[command(long_about = r#"
Agent Forum runs one round of a forum: agents discuss a goal, one of them
files an on-chain action proposal, the forum votes, and an approved proposal
is executed through a dry-run capability.

The round has four steps:
1. Discussion: the scheduler picks which agents may speak
2. Proposal: the first agent files the proposal JSON
3. Voting: every agent votes until the quorum reaches a verdict
4. Execution: the designated executor submits the action

Configuration files are loaded from (in priority order):
1. FORUM_<SECTION>__<KEY> environment variables
2. --config <path>     Explicit config file
3. ./forum.toml        Project-level config
4. ~/.config/agent-forum/config.toml   Global config

Example:
  agent-forum -a alice.eth -a bob.eth -a carol.eth "Rebalance the treasury"
  agent-forum -a alice.eth -a bob.eth -a carol.eth --vote carol.eth=disagree \
      --proposal @proposal.json --all-executors --parallel
"#)]
pub struct Cli {
    /// The goal the forum discusses
    #[arg(default_value = "Put idle USDC to work in the USDC/WETH pool")]
    pub goal: String,

    /// Participating agents; the first one proposes (can be specified multiple times)
    #[arg(short, long = "agent", value_name = "ID")]
    pub agents: Vec<String>,

    /// Pool the forum focuses on
    #[arg(long, value_name = "PAIR")]
    pub pool: Option<String>,

    /// Agent preferring a pool, written AGENT=PAIR (can be specified multiple times)
    #[arg(long = "prefers", value_name = "AGENT=PAIR")]
    pub preferences: Vec<String>,

    /// Proposal JSON, inline or @path
    #[arg(short, long, value_name = "JSON")]
    pub proposal: Option<String>,

    /// Scripted vote; agents without one agree (can be specified multiple times)
    #[arg(long = "vote", value_name = "AGENT=CHOICE")]
    pub votes: Vec<VoteArg>,

    /// Let every agreeing agent execute instead of the proposer alone
    #[arg(long)]
    pub all_executors: bool,

    /// Run executors concurrently
    #[arg(long)]
    pub parallel: bool,

    /// Make dry-run submissions of this action kind fail
    #[arg(long, value_name = "KIND")]
    pub fail_action: Option<String>,

    /// Append forum events to this JSONL file
    #[arg(long, value_name = "PATH")]
    pub event_log: Option<PathBuf>,

    /// Also write diagnostic logs to this file
    #[arg(long, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum)]
    pub output: Option<OutputFormat>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress progress indicators
    #[arg(short, long)]
    pub quiet: bool,

    /// Path to configuration file
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Disable loading of configuration files
    #[arg(long)]
    pub no_config: bool,

    /// Show configuration file locations and exit
    #[arg(long)]
    pub show_config: bool,
}

impl Cli {
    /// Scripted choice for `agent`, agreeing by default
    pub fn vote_for(&self, agent: &AgentId) -> VoteChoice {
        self.votes
            .iter()
            .rev()
            .find(|v| &v.agent_id == agent)
            .map(|v| v.choice)
            .unwrap_or(VoteChoice::Agree)
    }

    /// `(agent, pool)` pairs from `--prefers`
    pub fn pool_preferences(&self) -> impl Iterator<Item = (&str, &str)> {
        self.preferences
            .iter()
            .filter_map(|p| p.split_once('='))
            .map(|(agent, pool)| (agent.trim(), pool.trim()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_command_line() {
        let cli = Cli::try_parse_from([
            "agent-forum",
            "-a",
            "alice.eth",
            "-a",
            "bob.eth",
            "--vote",
            "bob.eth=disagree",
            "--parallel",
            "-o",
            "json",
            "-vv",
            "Rebalance",
        ])
        .unwrap();

        assert_eq!(cli.goal, "Rebalance");
        assert_eq!(cli.agents, vec!["alice.eth", "bob.eth"]);
        assert!(cli.parallel);
        assert!(!cli.all_executors);
        assert_eq!(cli.output, Some(OutputFormat::Json));
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.vote_for(&"bob.eth".into()), VoteChoice::Disagree);
        assert_eq!(cli.vote_for(&"alice.eth".into()), VoteChoice::Agree);
    }

    #[test]
    fn test_default_goal() {
        let cli = Cli::try_parse_from(["agent-forum"]).unwrap();
        assert!(cli.goal.contains("USDC"));
        assert!(cli.agents.is_empty());
        assert!(cli.output.is_none());
    }

    #[test]
    fn test_bad_vote_rejected() {
        assert!(Cli::try_parse_from(["agent-forum", "--vote", "alice.eth"]).is_err());
        assert!(Cli::try_parse_from(["agent-forum", "--vote", "alice.eth=maybe"]).is_err());
        assert!(Cli::try_parse_from(["agent-forum", "--vote", "=agree"]).is_err());
    }

    #[test]
    fn test_last_vote_wins() {
        let cli = Cli::try_parse_from([
            "agent-forum",
            "--vote",
            "carol.eth=no",
            "--vote",
            "carol.eth=yes",
        ])
        .unwrap();
        assert_eq!(cli.vote_for(&"carol.eth".into()), VoteChoice::Agree);
    }

    #[test]
    fn test_pool_preferences() {
        let cli = Cli::try_parse_from([
            "agent-forum",
            "--prefers",
            "bob.eth = USDC/WETH",
            "--prefers",
            "malformed",
        ])
        .unwrap();
        let prefs: Vec<_> = cli.pool_preferences().collect();
        assert_eq!(prefs, vec![("bob.eth", "USDC/WETH")]);
    }
}
