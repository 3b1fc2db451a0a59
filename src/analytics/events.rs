//! Query event logger: one JSON line per analytics query.
//!
//! Records which command ran, for which user, and whether it succeeded.
//! Logging is best-effort; failures are silently ignored and never affect
//! the analytics result.
//!
//! Log file: `~/.carbonlens/events.jsonl` (see `[logging]` in the config).

use std::fs::{OpenOptions, create_dir_all};
use std::io::Write;
use std::path::Path;

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::expand_path;
use crate::config::schema::LoggingConfig;

// ---------------------------------------------------------------------------
// Event entry
// ---------------------------------------------------------------------------

/// A single query event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryEvent {
    pub timestamp: String,
    /// Subcommand name, e.g. `"user"`, `"energy"`.
    pub command: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub user_id: Option<String>,
    /// `"ok"` or `"error"`.
    pub outcome: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error: Option<String>,
}

impl QueryEvent {
    pub fn ok(command: &str, user_id: Option<&str>) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            command: command.to_string(),
            user_id: user_id.map(|s| s.to_string()),
            outcome: "ok".to_string(),
            error: None,
        }
    }

    pub fn failed(command: &str, user_id: Option<&str>, error: &str) -> Self {
        Self {
            outcome: "error".to_string(),
            error: Some(error.to_string()),
            ..Self::ok(command, user_id)
        }
    }
}

// ---------------------------------------------------------------------------
// Logging
// ---------------------------------------------------------------------------

/// Append `event` to the configured event log, if logging is enabled.
pub fn log_query(config: &LoggingConfig, event: &QueryEvent) {
    if !config.enabled {
        return;
    }
    if let Some(path) = expand_path(&config.path) {
        let _ = append_event(&path, event);
    }
}

/// Log the outcome of a query result.
pub fn log_outcome<T>(
    config: &LoggingConfig,
    command: &str,
    user_id: Option<&str>,
    result: &anyhow::Result<T>,
) {
    let event = match result {
        Ok(_) => QueryEvent::ok(command, user_id),
        Err(e) => QueryEvent::failed(command, user_id, &e.to_string()),
    };
    log_query(config, &event);
}

fn append_event(path: &Path, event: &QueryEvent) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        create_dir_all(parent)?;
    }

    let mut file = OpenOptions::new().create(true).append(true).open(path)?;
    let json = serde_json::to_string(event)?;
    writeln!(file, "{json}")?;

    Ok(())
}
