//! WireGen CLI binary entrypoint.
//!
//! This is the main entry point for the `wiregen` command-line tool.

use std::io;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use wiregen_cli::cli::{Cli, Commands};
use wiregen_cli::commands::{ClientsCommand, GenkeyCommand, PairCommand};
use wiregen_cli::{key_service, ArtifactSink, CliError};

fn main() -> ExitCode {
    // RUST_LOG wins; otherwise info
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), CliError> {
    let keys = key_service(cli.keys);
    let sink = ArtifactSink::new(&cli.output);
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Genkey => {
            let cmd = GenkeyCommand::new(keys.as_ref());
            cmd.execute(&mut stdout)?;
        }
        Commands::Clients(args) => {
            let cmd = ClientsCommand::new(keys.as_ref(), sink);
            cmd.execute(&mut stdout, &args)?;
        }
        Commands::Pair(args) => {
            let cmd = PairCommand::new(keys.as_ref(), sink);
            cmd.execute(&mut stdout, &args)?;
        }
    }

    Ok(())
}
