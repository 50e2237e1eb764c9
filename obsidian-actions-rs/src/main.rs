//! obsidian-actions CLI entry point.

use clap::Parser;
use obsidian_actions::cli::args::{Cli, Commands};
use obsidian_actions::cli::output::Output;
use obsidian_actions::cli::{call, info, list, note, query};
use obsidian_actions::config::Config;
use obsidian_actions::error::{ExitCode as VaultExitCode, VaultError};
use obsidian_actions::vault::Vault;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(&cli) {
        Ok(code) => ExitCode::from(code.code() as u8),
        Err(e) => {
            if !cli.quiet {
                eprintln!("Error: {}", e);
            }
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// Log to stderr; `RUST_LOG` wins over `-v`.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("obsidian_actions={}", level)));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(cli: &Cli) -> Result<VaultExitCode, VaultError> {
    let output = Output::new(cli.output_format(), cli.quiet);

    // Rendering a query needs neither a vault nor xcall
    if let Commands::Query(args) = &cli.command {
        if args.dry_run {
            query::dry_run(args, &output)?;
            return Ok(VaultExitCode::Success);
        }
    }

    let config = Config::load()?;
    let vault_name = config.resolve_vault(cli.vault.as_deref())?;
    let vault = Vault::from_config(&vault_name, &config)?;

    match &cli.command {
        Commands::Call(args) => call::run(&vault, args, &output)?,
        Commands::Info => info::info(&vault, &output)?,
        Commands::Notes => list::notes(&vault, &output)?,
        Commands::Note(command) => note::run(&vault, command, &output)?,
        Commands::Tags => list::tags(&vault, &output)?,
        Commands::Commands => list::commands(&vault, &output)?,
        Commands::Exec(args) => list::exec(&vault, args, &output)?,
        Commands::Files => list::files(&vault, &output)?,
        Commands::Folders => list::folders(&vault, &output)?,
        Commands::Search(args) => list::search(&vault, args, &output)?,
        Commands::Periodic(args) => info::periodic(&vault, args, &output)?,
        Commands::Query(args) => query::run(&vault, args, &output)?,
    }

    Ok(VaultExitCode::Success)
}
