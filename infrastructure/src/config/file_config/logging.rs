//! Logging configuration from TOML (`[logging]` section)
//!
//! ```toml
//! [logging]
//! event_log = "~/.local/share/agent-forum/events.jsonl"
//! log_file = "agent-forum.log"
//! ```

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Raw logging configuration from TOML
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileLoggingConfig {
    /// JSONL audit trail of votes, verdicts and executions
    pub event_log: Option<String>,
    /// Diagnostic log file, in addition to stderr
    pub log_file: Option<String>,
}

impl FileLoggingConfig {
    pub fn event_log_path(&self) -> Option<PathBuf> {
        self.event_log.as_deref().map(expand_home)
    }

    pub fn log_file_path(&self) -> Option<PathBuf> {
        self.log_file.as_deref().map(expand_home)
    }
}

fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/")
        && let Some(home) = dirs::home_dir()
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths() {
        let config = FileLoggingConfig {
            event_log: Some("events.jsonl".to_string()),
            log_file: None,
        };
        assert_eq!(config.event_log_path(), Some(PathBuf::from("events.jsonl")));
        assert!(config.log_file_path().is_none());
    }

    #[test]
    fn test_home_expansion() {
        let config = FileLoggingConfig {
            event_log: Some("~/forum/events.jsonl".to_string()),
            log_file: None,
        };
        let path = config.event_log_path().unwrap();
        assert!(path.ends_with("forum/events.jsonl"));
        if dirs::home_dir().is_some() {
            assert!(!path.starts_with("~"));
        }
    }
}
