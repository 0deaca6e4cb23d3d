//! Entry point and command dispatch: argument parsing, a tokio runtime
//! for the async foundry verbs, and exit-code mapping from a `run()
//! -> Result<(), ExitCode>` shape.

use clap::Parser;

use ailloy_core::error::{error_to_exit_code, AilloyError};

use super::args::{Cli, Commands};
use super::commands;

pub fn run() -> Result<(), i32> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => "ailloy=info",
        1 => "ailloy=debug",
        _ => "ailloy=trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| level.into()))
        .with_writer(std::io::stderr)
        .init();

    let runtime = tokio::runtime::Runtime::new().map_err(|e| {
        eprintln!("error: failed to start async runtime: {e}");
        2
    })?;

    let result: Result<(), AilloyError> = runtime.block_on(async {
        match &cli.command {
            Commands::Anneal { set, values, global, list, delete } => commands::anneal(set, values, *global, *list, delete.as_deref()),
            Commands::Cast { reference, values, set, with_workflows, global } => {
                commands::cast(reference.as_deref(), values, set, *with_workflows, *global)
            }
            Commands::Forge { reference, output, values, set } => commands::forge(reference.as_deref(), output.as_deref(), values, set),
            Commands::Temper { path } => commands::temper(path.as_deref()),
            Commands::New { name, output, no_agents } => commands::new_bundle(name, output.as_deref(), *no_agents),
            Commands::Smelt => commands::smelt(),
            Commands::Quench => commands::quench(),
            Commands::Recast { name, dry_run } => commands::recast(name.as_deref(), *dry_run),
            Commands::Foundry { command } => commands::foundry(command).await,
        }
    });

    match result {
        Ok(()) => Ok(()),
        Err(err) => {
            eprintln!("error: {err}");
            Err(error_to_exit_code(&err))
        }
    }
}
