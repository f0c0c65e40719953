//! CLI entrypoint for agent-forum
//!
//! This is the main binary that wires together all layers using
//! dependency injection.

mod round;

use anyhow::{Context, Result, anyhow, bail};
use clap::Parser;
use forum_application::{
    ExecutionProgressNotifier, ExecutorSelection, NoExecutionProgress, SystemClock,
};
use forum_domain::{ActionKind, AgentProfile};
use forum_infrastructure::{
    ConfigLoader, DryRunCapability, FileConfig, FileOutputFormat, InMemoryForumStore,
    JsonlForumEventLogger,
};
use forum_presentation::{
    Cli, ConsoleFormatter, ExecutionProgressReporter, JsonFormatter, OutputFormat,
    OutputFormatter, SimpleExecutionProgress,
};
use round::{DEFAULT_PROPOSAL, RoundRunner, RoundSettings};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

const DEFAULT_AGENTS: [&str; 3] = ["alice.eth", "bob.eth", "carol.eth"];

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.show_config {
        ConfigLoader::print_config_sources();
        return Ok(());
    }

    let config = if cli.no_config {
        ConfigLoader::load_defaults()
    } else {
        ConfigLoader::load(cli.config.as_ref())
            .map_err(|e| anyhow!("Failed to load configuration: {}", e))?
    };

    let _log_guard = init_logging(
        cli.verbose,
        cli.log_file.clone().or_else(|| config.logging.log_file_path()),
    )?;
    info!("Starting agent-forum");

    let issues = config.validate();
    if !issues.is_empty() {
        let lines: Vec<String> = issues.iter().map(|i| format!("  - {}", i)).collect();
        bail!("Invalid configuration:\n{}", lines.join("\n"));
    }

    if !config.output.color {
        colored::control::set_override(false);
    }
    let format = cli.output.unwrap_or(match config.output.format {
        Some(FileOutputFormat::Json) => OutputFormat::Json,
        Some(FileOutputFormat::Text) | None => OutputFormat::Text,
    });

    let settings = build_settings(&cli, &config)?;

    // === Dependency Injection ===
    let store = Arc::new(InMemoryForumStore::new(config.cache.agent_ttl()));
    let mut capability = DryRunCapability::new();
    if let Some(kind) = &cli.fail_action {
        let kind: ActionKind = kind.parse()?;
        capability = capability.with_failure(kind, "simulated revert");
    }

    let progress: Arc<dyn ExecutionProgressNotifier> =
        if cli.quiet || format == OutputFormat::Json {
            Arc::new(NoExecutionProgress)
        } else if config.output.show_progress {
            Arc::new(ExecutionProgressReporter::new())
        } else {
            Arc::new(SimpleExecutionProgress)
        };

    let mut runner = RoundRunner::new(store, Arc::new(capability), Arc::new(SystemClock))
        .with_progress(progress);

    if let Some(path) = cli
        .event_log
        .clone()
        .or_else(|| config.logging.event_log_path())
    {
        match JsonlForumEventLogger::new(&path) {
            Some(logger) => runner = runner.with_logger(Arc::new(logger)),
            None => warn!(
                "Could not open event log {}, continuing without it",
                path.display()
            ),
        }
    }

    let report = runner.run(settings).await?;

    let formatter: Box<dyn OutputFormatter> = match format {
        OutputFormat::Text => Box::new(ConsoleFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    };
    println!("{}", formatter.format(&report));

    Ok(())
}

/// Initialize tracing: stderr always, plus a plain-text file when asked
fn init_logging(verbose: u8, log_file: Option<PathBuf>) -> Result<Option<WorkerGuard>> {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace", // -vvv or more
    };
    let stderr = fmt::layer().with_target(false).with_writer(std::io::stderr);
    let registry = tracing_subscriber::registry()
        .with(EnvFilter::new(level))
        .with(stderr);

    let Some(path) = log_file else {
        registry.init();
        return Ok(None);
    };

    let file_name = path
        .file_name()
        .with_context(|| format!("log file path {} has no file name", path.display()))?;
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let (writer, guard) =
        tracing_appender::non_blocking(tracing_appender::rolling::never(dir, file_name));

    registry
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Ok(Some(guard))
}

fn build_settings(cli: &Cli, config: &FileConfig) -> Result<RoundSettings> {
    let ids: Vec<&str> = if cli.agents.is_empty() {
        DEFAULT_AGENTS.to_vec()
    } else {
        cli.agents.iter().map(String::as_str).collect()
    };
    let agents = ids
        .into_iter()
        .map(|id| {
            cli.pool_preferences()
                .filter(|(agent, _)| *agent == id)
                .fold(AgentProfile::new(id), |profile, (_, pool)| {
                    profile.with_preferred_pool(pool)
                })
        })
        .collect::<Vec<_>>();

    let mut settings = RoundSettings::new(cli.goal.clone(), agents);
    settings.pool = cli.pool.clone();
    settings.proposal_json = match cli.proposal.as_deref() {
        Some(arg) => match arg.strip_prefix('@') {
            Some(path) => std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read proposal file {}", path))?,
            None => arg.to_string(),
        },
        None => DEFAULT_PROPOSAL.to_string(),
    };
    settings.votes = settings
        .agents
        .iter()
        .map(|a| (a.id.clone(), cli.vote_for(&a.id)))
        .collect();
    settings.selection = if cli.all_executors {
        ExecutorSelection::All
    } else {
        ExecutorSelection::Sole
    };

    settings.quorum = config.quorum.to_quorum_config()?;
    settings.timeout_minutes = config.quorum.timeout_minutes;
    settings.policy = config.discussion.to_policy();
    settings.message_window = config.discussion.message_window;
    settings.options = config.execution.to_options();
    if cli.parallel {
        settings.options = settings.options.with_parallel(true);
    }

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use forum_domain::{AgentId, VoteChoice};
    use std::io::Write;

    fn cli(args: &[&str]) -> Cli {
        Cli::try_parse_from(std::iter::once("agent-forum").chain(args.iter().copied())).unwrap()
    }

    #[test]
    fn test_default_agents() {
        let settings = build_settings(&cli(&[]), &FileConfig::default()).unwrap();
        let ids: Vec<_> = settings.agents.iter().map(|a| a.id.as_str()).collect();
        assert_eq!(ids, DEFAULT_AGENTS);
        assert_eq!(settings.proposal_json, DEFAULT_PROPOSAL);
        assert_eq!(settings.selection, ExecutorSelection::Sole);
    }

    #[test]
    fn test_settings_follow_config_and_flags() {
        let mut config = FileConfig::default();
        config.quorum.min_participants = 2;
        config.quorum.timeout_minutes = 15;
        config.execution.chain_id = 8453;

        let settings = build_settings(
            &cli(&[
                "-a",
                "alice.eth",
                "-a",
                "bob.eth",
                "--prefers",
                "bob.eth=USDC/WETH",
                "--vote",
                "bob.eth=disagree",
                "--all-executors",
                "--parallel",
            ]),
            &config,
        )
        .unwrap();

        assert_eq!(settings.quorum.min_participants(), 2);
        assert_eq!(settings.timeout_minutes, 15);
        assert_eq!(settings.options.chain_id, 8453);
        assert!(settings.options.parallel);
        assert_eq!(settings.selection, ExecutorSelection::All);
        assert!(settings.agents[1].prefers_pool("USDC/WETH"));
        assert!(!settings.agents[0].prefers_pool("USDC/WETH"));
        assert_eq!(
            settings.votes.get(&AgentId::new("bob.eth")),
            Some(&VoteChoice::Disagree)
        );
        assert_eq!(
            settings.votes.get(&AgentId::new("alice.eth")),
            Some(&VoteChoice::Agree)
        );
    }

    #[test]
    fn test_proposal_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(br#"{"action": "limit_order", "params": {}}"#).unwrap();
        let arg = format!("@{}", file.path().display());

        let settings = build_settings(&cli(&["--proposal", &arg]), &FileConfig::default()).unwrap();
        assert!(settings.proposal_json.contains("limit_order"));
    }

    #[test]
    fn test_missing_proposal_file_is_error() {
        let result = build_settings(
            &cli(&["--proposal", "@/nonexistent/proposal.json"]),
            &FileConfig::default(),
        );
        assert!(result.is_err());
    }
}
