//! Presentation layer for agent-forum
//!
//! This crate contains CLI definitions, output formatters,
//! and execution progress reporters.

pub mod cli;
pub mod output;
pub mod progress;

// Re-export commonly used types
pub use cli::commands::{Cli, OutputFormat, VoteArg};
pub use output::console::ConsoleFormatter;
pub use output::formatter::{JsonFormatter, OutputFormatter};
pub use output::report::{RoundReport, SkippedVote, SpeakerTurn};
pub use progress::reporter::{ExecutionProgressReporter, SimpleExecutionProgress};
