mod cli;
mod cli_utils;
mod commands;

use anyhow::Result;
use clap::Parser;
use cli::{Args, Command};
use tracing::error;
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging (warn unless RUST_LOG says otherwise)
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("memsnap=warn,memsnap_cli=warn"));
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match args.command {
        Some(Command::Regions { pid, all, json }) => commands::regions::run(pid, all, json),
        Some(Command::Scan {
            pattern,
            module,
            base,
            size,
            pid,
            limit,
            json,
        }) => commands::scan::run(&pattern, module, base, size, pid, limit, json),
        None => commands::dump::run(args.pid.as_deref(), &args.output, args.ceiling),
    };

    // Failures are reported on stderr; the exit status stays zero.
    if let Err(e) = result {
        error!("{:#}", e);
    }
    Ok(())
}
