mod config;
mod error;

mod cmd;

use clap::Parser;
use config::{Cli, Commands};
use cribench_harness::alloc::CountingAlloc;

// Counting allocator for the sweep's per-request allocation metrics.
#[global_allocator]
static ALLOC: CountingAlloc = CountingAlloc;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Serve(args) => cmd::serve::run(args),
        Commands::Sweep(args) => cmd::sweep::run(args),
    };
    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
