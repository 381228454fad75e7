use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "cribench",
    about = "Unary vs streamed container-list RPC micro-benchmark"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the standalone benchmark server
    Serve(ServeArgs),
    /// Run the measurement sweep and print the metric table
    Sweep(SweepArgs),
}

#[derive(Args, Clone, Debug)]
pub struct ServeArgs {
    /// Unix socket path to listen on
    #[arg(long, default_value = "/tmp/cribench.sock", env = "CRIBENCH_SOCKET")]
    pub socket: PathBuf,

    /// Containers served per list/stream call
    #[arg(long, default_value_t = 1000)]
    pub containers: usize,

    /// Annotations per container
    #[arg(long, default_value_t = 8)]
    pub annotations: usize,

    /// Containers per streamed chunk
    #[arg(long, default_value_t = 64)]
    pub chunk_size: usize,
}

#[derive(Args, Clone, Debug)]
pub struct SweepArgs {
    /// Container counts to sweep
    #[arg(long, value_delimiter = ',', default_values_t = [4usize, 8, 16, 32, 64, 128, 256, 512, 1024])]
    pub containers: Vec<usize>,

    /// Annotation counts to sweep
    #[arg(long, value_delimiter = ',', default_values_t = [1usize, 2, 4, 8, 16, 32])]
    pub annotations: Vec<usize>,

    /// Chunk sizes to sweep (combinations exceeding the container count
    /// are skipped)
    #[arg(long, value_delimiter = ',', default_values_t = [1usize, 16, 64, 256])]
    pub chunk_sizes: Vec<usize>,

    /// Timed requests per mode per scenario
    #[arg(long, default_value_t = 100)]
    pub tries: usize,

    /// Outer repetitions of the timed loop
    #[arg(long, default_value_t = 1)]
    pub repeat: usize,

    /// Also run the handler-only sweep (no transport)
    #[arg(long)]
    pub handlers: bool,
}
