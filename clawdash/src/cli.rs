use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// ClawDash - browse agent workspaces without leaving the sandbox
#[derive(Parser, Debug)]
#[command(name = "clawdash")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding every agent workspace (default: $CLAWDASH_WORKSPACE_ROOT or ~/.openclaw/workspaces)
    #[arg(long, global = true, value_name = "DIR")]
    pub workspace_root: Option<PathBuf>,

    /// Agent whose workspace to use (default: $CLAWDASH_DEFAULT_AGENT or "code")
    #[arg(long, short, global = true, value_name = "AGENT")]
    pub agent: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Check a path against the workspace sandbox and print the result
    Validate {
        /// Path relative to the workspace (a leading "/" is the workspace itself)
        #[arg(value_name = "PATH", default_value = "")]
        path: String,
    },

    /// List a workspace directory
    Ls {
        #[arg(value_name = "PATH", default_value = "")]
        path: String,
    },

    /// Preview a text file
    Cat {
        #[arg(value_name = "PATH")]
        path: String,
    },

    /// Download a file
    Download {
        #[arg(value_name = "PATH")]
        path: String,

        /// Write to this file instead of stdout
        #[arg(long, short, value_name = "FILE")]
        output: Option<PathBuf>,
    },
}
