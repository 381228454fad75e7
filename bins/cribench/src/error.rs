#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error("harness: {0}")]
    Harness(#[from] cribench_harness::HarnessError),

    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}
