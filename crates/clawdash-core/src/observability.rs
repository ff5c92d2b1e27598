//! Observability: tracing init and security events.
//!
//! Uses config::ObservabilityConfig for CLAWDASH_QUIET, LOG_LEVEL, LOG_JSON and
//! SECURITY_EVENTS_LOG.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use chrono::Utc;
use serde_json::json;
use tracing_subscriber::{prelude::*, EnvFilter};

use crate::path_validation::PathRejection;

/// Initialize tracing. Call at process startup.
/// When CLAWDASH_QUIET=1, only WARN and above are logged.
pub fn init_tracing() {
    let cfg = crate::config::ObservabilityConfig::from_env();
    let level: String = if cfg.quiet {
        "clawdash=warn".to_string()
    } else {
        cfg.log_level.clone()
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&level));

    // Logs go to stderr; stdout carries command output.
    let _ = if cfg.log_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_thread_ids(false),
            )
            .try_init()
    };
}

fn get_security_events_path() -> Option<&'static Path> {
    static PATH: OnceLock<Option<PathBuf>> = OnceLock::new();
    PATH.get_or_init(|| {
        let path = crate::config::ObservabilityConfig::from_env()
            .security_events_log
            .clone()
            .map(PathBuf::from)?;
        // Ensure parent dir exists
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        Some(path)
    })
    .as_deref()
}

fn append_jsonl(path: &Path, record: &serde_json::Value) {
    if let Ok(mut f) = OpenOptions::new().create(true).append(true).open(path) {
        if let Ok(line) = serde_json::to_string(record) {
            let _ = writeln!(f, "{}", line);
        }
    }
}

fn path_rejected_record(
    agent: &str,
    operation: &str,
    requested: &str,
    rejection: PathRejection,
) -> serde_json::Value {
    json!({
        "ts": Utc::now().to_rfc3339_opts(chrono::SecondsFormat::Millis, true),
        "type": "security_blocked",
        "category": "workspace_path",
        "agent": agent,
        "details": {
            "operation": operation,
            "requested": requested,
            "kind": rejection.kind(),
            "reason": rejection.to_string()
        }
    })
}

/// Security event: a workspace path was refused before any I/O.
pub fn security_path_rejected(
    agent: &str,
    operation: &str,
    requested: &str,
    rejection: PathRejection,
) {
    tracing::warn!(
        agent = %agent,
        operation = %operation,
        kind = %rejection.kind(),
        "Security: blocked workspace path"
    );
    if let Some(path) = get_security_events_path() {
        append_jsonl(
            path,
            &path_rejected_record(agent, operation, requested, rejection),
        );
    }
}
