//! flagprobe CLI - compiler capability probing for C/C++

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.global.verbose {
        EnvFilter::new("flagprobe=debug")
    } else {
        EnvFilter::new("flagprobe=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let global = cli.global;

    // Execute command
    match cli.command {
        Commands::Check(args) => commands::check::execute(&global, args),
        Commands::Configure(args) => commands::configure::execute(&global, args),
        Commands::Flags(args) => commands::flags::execute(&global, args),
        Commands::Toolchain => commands::toolchain::execute(&global),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}
