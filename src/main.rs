mod cleanup;
mod cli;
mod clipboard;
mod commands;
mod engines;
mod mapping;
mod model;
mod quotes;
mod resolve;
mod segment;
mod session;
mod tokens;
mod util;

use anyhow::Result;
use clap::Parser;
use tracing::error;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Commands};

fn main() {
    init_tracing();

    if let Err(err) = run() {
        error!(error = %err, "command failed");
        for cause in err.chain().skip(1) {
            error!(cause = %cause, "caused by");
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Analyze(args) => commands::analyze::run(args),
        Commands::Click(args) => commands::click::run(args),
        Commands::Sentences(args) => commands::sentences::run(args),
        Commands::Text(args) => commands::text::run(args),
        Commands::Quotes(args) => commands::quotes::run(args),
        Commands::Clean(args) => commands::clean::run(args),
        Commands::Status(args) => commands::status::run(args),
        Commands::Clear(args) => commands::status::clear(args),
    }
}

fn init_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
