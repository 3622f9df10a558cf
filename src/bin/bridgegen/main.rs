//! bridgegen CLI - exported bridge wrappers for C libraries

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use bridgegen::bindings::BridgeError;
use bridgegen::util::diagnostic;

mod cli;
mod commands;

use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    let color = !cli.no_color && std::env::var_os("NO_COLOR").is_none();

    if let Err(e) = run(cli) {
        match e.chain().find_map(|c| c.downcast_ref::<BridgeError>()) {
            Some(bridge_err) => {
                diagnostic::emit(&bridge_err.to_diagnostic(), color);
                eprintln!("\ncaused by: {:#}", e);
            }
            None => eprintln!("error: {:#}", e),
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("bridgegen=debug")
    } else {
        EnvFilter::new("bridgegen=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .without_time()
        .with_ansi(!cli.no_color)
        .with_writer(std::io::stderr)
        .init();

    // Execute command
    match cli.command {
        Some(Commands::Generate(args)) => commands::generate::execute(args),
        Some(Commands::List(args)) => commands::list::execute(args),
        None => commands::generate::execute(Default::default()),
    }
}
