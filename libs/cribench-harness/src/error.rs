use std::path::PathBuf;

use cribench_rpc::{DeliveryMode, RpcError};

/// Harness failures. A setup or transport failure is fatal to the
/// scenario that hit it and never touches its siblings; a warm-up count
/// mismatch is a correctness violation and stops the whole run.
#[derive(Debug, thiserror::Error)]
pub enum HarnessError {
    #[error("bind {}: {source}", path.display())]
    Bind {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("connect {} ({mode}): {source}", path.display())]
    Connect {
        path: PathBuf,
        mode: DeliveryMode,
        source: RpcError,
    },

    /// Warm-up returned the wrong record count: a generator/service
    /// inconsistency, never tolerated.
    #[error("{mode} warm-up returned {actual} containers, expected {expected}")]
    CountMismatch {
        mode: DeliveryMode,
        expected: usize,
        actual: usize,
    },

    #[error("rpc: {0}")]
    Rpc(#[from] RpcError),
}
