mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::Cli;
use clawdash_core::{config, observability};

fn main() -> Result<()> {
    config::load_dotenv();
    observability::init_tracing();
    let cli = Cli::parse();

    let code = commands::dispatch(cli)?;
    if code != 0 {
        std::process::exit(code);
    }
    Ok(())
}
