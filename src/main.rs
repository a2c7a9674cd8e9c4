use anyhow::Context;
use clap::Parser;
use declutter::cli::{Cli, run_cli};
use declutter::logging;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    logging::init_logging().context("failed to initialize logging")?;

    // Failures are logged inside; the exit status stays successful.
    run_cli(&cli);
    Ok(())
}
