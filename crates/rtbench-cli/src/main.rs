use anyhow::Result;
use clap::Parser;
use tracing_subscriber::filter::LevelFilter;

use rtbench_cli::{
    cli::{Cli, Commands, LogLevel},
    commands, config,
};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging; the report itself goes to stdout, diagnostics to
    // stderr so tables stay pipeable
    let level: LevelFilter = if cli.verbose {
        LogLevel::Debug.into()
    } else {
        cli.log_level.unwrap_or(LogLevel::Info).into()
    };
    let env_filter = format!("rtbench_cli={level},rtbench_core={level}");
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .with_writer(std::io::stderr)
        .init();

    let config = config::SweepConfig::load(cli.config)?;

    match cli.command {
        Commands::Compile { os } => commands::compile::execute(config, os.into())?,

        Commands::Render { os, model_dir, test_dir } => {
            commands::render::execute(config, os.into(), model_dir, test_dir)?
        }

        Commands::Extract { os, test_dir } => {
            commands::extract::execute(config, os.targets(), test_dir)?
        }
    }

    Ok(())
}
