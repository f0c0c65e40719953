//! Progress reporting for proposal execution

use colored::Colorize;
use forum_application::ExecutionProgressNotifier;
use forum_domain::{ActionKind, AgentId, ExecutionResult};
use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::sync::Mutex;
use std::time::Duration;

/// Reports execution progress with a progress bar over the executors
pub struct ExecutionProgressReporter {
    multi: MultiProgress,
    run_bar: Mutex<Option<ProgressBar>>,
}

impl ExecutionProgressReporter {
    pub fn new() -> Self {
        Self {
            multi: MultiProgress::new(),
            run_bar: Mutex::new(None),
        }
    }

    fn run_style() -> ProgressStyle {
        ProgressStyle::default_bar()
            .template("{spinner:.green} {prefix:.bold.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-")
    }

    fn with_bar(&self, f: impl FnOnce(&ProgressBar)) {
        if let Ok(guard) = self.run_bar.lock()
            && let Some(pb) = guard.as_ref()
        {
            f(pb);
        }
    }
}

impl Default for ExecutionProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl ExecutionProgressNotifier for ExecutionProgressReporter {
    fn on_run_start(&self, action: ActionKind, executors: usize) {
        let pb = self.multi.add(ProgressBar::new(executors as u64));
        pb.set_style(Self::run_style());
        pb.set_prefix(format!("Executing {}", action));
        pb.set_message("Starting...");
        pb.enable_steady_tick(Duration::from_millis(120));

        if let Ok(mut slot) = self.run_bar.lock() {
            *slot = Some(pb);
        }
    }

    fn on_executor_start(&self, agent: &AgentId) {
        self.with_bar(|pb| pb.set_message(format!("{} submitting", agent)));
    }

    fn on_attempt_failed(&self, agent: &AgentId, attempt: u32, error: &str, retry_in: Duration) {
        self.with_bar(|pb| pb.println(retry_line(agent, attempt, error, retry_in)));
    }

    fn on_executor_complete(&self, result: &ExecutionResult) {
        let Ok(mut slot) = self.run_bar.lock() else {
            return;
        };
        let Some(pb) = slot.as_ref() else {
            return;
        };
        pb.set_message(result_line(result));
        pb.inc(1);
        if pb.length().is_some_and(|len| pb.position() >= len) {
            pb.finish_with_message(format!("{}", "done".green()));
            *slot = None;
        }
    }
}

/// Simple text-based progress (no fancy UI)
pub struct SimpleExecutionProgress;

impl ExecutionProgressNotifier for SimpleExecutionProgress {
    fn on_run_start(&self, action: ActionKind, executors: usize) {
        println!(
            "{} {} ({} executors)",
            "->".cyan(),
            format!("Executing {}", action).bold(),
            executors
        );
    }

    fn on_executor_start(&self, _agent: &AgentId) {}

    fn on_attempt_failed(&self, agent: &AgentId, attempt: u32, error: &str, retry_in: Duration) {
        println!("{}", retry_line(agent, attempt, error, retry_in));
    }

    fn on_executor_complete(&self, result: &ExecutionResult) {
        println!("  {}", result_line(result));
    }
}

fn retry_line(agent: &AgentId, attempt: u32, error: &str, retry_in: Duration) -> String {
    format!(
        "  {} {} attempt {} failed: {} (retry in {}ms)",
        "!".yellow(),
        agent,
        attempt,
        error,
        retry_in.as_millis()
    )
}

fn result_line(result: &ExecutionResult) -> String {
    if result.is_success() {
        format!(
            "{} {} {}",
            "v".green(),
            result.agent_id,
            result.tx_hash.as_deref().unwrap_or("-")
        )
    } else {
        format!(
            "{} {} (failed: {})",
            "x".red(),
            result.agent_id,
            result.error.as_deref().unwrap_or("unknown error")
        )
    }
}
