//! Command dispatch. Every command prints JSON to stdout and returns the
//! process exit code.

mod files;
mod validate;

use anyhow::{Context, Result};
use std::io::Write;

use clawdash_core::config::{FileLimits, WorkspaceConfig};
use clawdash_fs::WorkspaceFiles;

use crate::cli::{Cli, Commands};

/// Exit code when a path is refused or a file operation fails.
pub const EXIT_FAILURE: i32 = 1;
/// Exit code for `validate` when the path is invalid.
pub const EXIT_INVALID: i32 = 2;

pub fn dispatch(cli: Cli) -> Result<i32> {
    let mut config = WorkspaceConfig::from_env();
    if let Some(root) = cli.workspace_root {
        config = config.with_root(root);
    }
    let agent = cli.agent.unwrap_or_else(|| config.default_agent.clone());
    let validator = config.validator().context("Invalid workspace root")?;
    tracing::debug!(root = %validator.root().display(), agent = %agent, "Workspace configured");

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let code = match cli.command {
        Commands::Validate { path } => validate::run(&validator, &agent, &path, &mut out)?,
        Commands::Ls { path } => {
            let files = WorkspaceFiles::new(validator, FileLimits::from_env());
            files::list(&files, &agent, &path, &mut out)?
        }
        Commands::Cat { path } => {
            let files = WorkspaceFiles::new(validator, FileLimits::from_env());
            files::preview(&files, &agent, &path, &mut out)?
        }
        Commands::Download { path, output } => {
            let files = WorkspaceFiles::new(validator, FileLimits::from_env());
            files::download(&files, &agent, &path, output.as_deref(), &mut out)?
        }
    };
    out.flush()?;
    Ok(code)
}

pub(crate) fn print_json<W: Write>(out: &mut W, value: &impl serde::Serialize) -> Result<()> {
    let s = serde_json::to_string_pretty(value)?;
    writeln!(out, "{}", s)?;
    Ok(())
}
