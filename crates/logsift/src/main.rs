use clap::Parser;

use logsift::cli::Cli;
use logsift::config::RunConfig;
use logsift::runtime::{boot, run};

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    boot::init_logging();

    let config = RunConfig::load(cli)?;
    let status = run::execute(&config)?;

    if config.strict && status.parse_errors > 0 {
        std::process::exit(2);
    }
    Ok(())
}
