use std::io::{self, Write};

use anyhow::{Context, Result};
use chrono::{Local, Utc};
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

use pomo_cli::commands::{chart, complete, export, history, import, progress, stats, status, util};
use pomo_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .try_init();

    let Some(command) = &cli.command else {
        // No subcommand, show help
        Cli::command().print_help()?;
        println!();
        return Ok(());
    };

    let mut config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    if let Some(profile) = &cli.profile {
        config.profile.clone_from(profile);
    }
    tracing::debug!(?config, "loaded configuration");

    let engine = config.engine().context("invalid level_thresholds")?;
    let mut db = util::open_database(&config)?;
    let now = Local::now();

    let stdout = io::stdout();
    let mut out = stdout.lock();
    match command {
        Commands::Complete(args) => complete::run(&mut out, args, &mut db, &config, &engine, &now)?,
        Commands::Stats { json } => stats::run(&mut out, &db, &config, &engine, &now, *json)?,
        Commands::Progress { json } => progress::run(&mut out, &db, &config, &engine, *json)?,
        Commands::Chart(args) => chart::run(&mut out, args, &db, &config, &engine, &now)?,
        Commands::History(args) => history::run(&mut out, args, &db, &config, &engine, &Local)?,
        Commands::Export => export::run(&mut out, &db, &config, &engine)?,
        Commands::Import => {
            import::run(io::stdin().lock(), &mut out, &mut db, &config, &engine, Utc::now())?;
        }
        Commands::Status => status::run(&mut out, &db, &config)?,
    }
    out.flush()?;

    Ok(())
}
