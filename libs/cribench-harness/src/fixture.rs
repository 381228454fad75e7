//! Per-scenario transport fixture: an exclusive Unix socket with the
//! dual-mode service bound to it, torn down exactly once on every exit
//! path via the `Drop` guard.

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::net::UnixListener;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use cribench_rpc::{DeliveryMode, RuntimeClient, serve};
use cribench_service::BenchRuntime;

use crate::error::HarnessError;

/// Hands out collision-free socket paths: pid plus a monotonic sequence,
/// owned by the harness instead of ambient global state.
pub struct SocketAllocator {
    dir: PathBuf,
    seq: AtomicU64,
}

impl SocketAllocator {
    pub fn new() -> Self {
        Self::in_dir(std::env::temp_dir())
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            seq: AtomicU64::new(0),
        }
    }

    fn next_socket(&self) -> PathBuf {
        let seq = self.seq.fetch_add(1, Ordering::Relaxed);
        self.dir
            .join(format!("cribench-{}-{seq}.sock", std::process::id()))
    }
}

impl Default for SocketAllocator {
    fn default() -> Self {
        Self::new()
    }
}

/// One running service instance. Lives for the duration of one
/// scenario's sub-benchmark; both delivery modes probe the same instance
/// so they share an identical server-side cost profile.
pub struct ServerFixture {
    socket: PathBuf,
    handle: Handle,
    token: CancellationToken,
    server: Option<JoinHandle<()>>,
}

impl ServerFixture {
    pub fn start(
        handle: &Handle,
        service: BenchRuntime,
        sockets: &SocketAllocator,
    ) -> Result<Self, HarnessError> {
        let socket = sockets.next_socket();
        let listener = {
            let _guard = handle.enter();
            UnixListener::bind(&socket).map_err(|e| HarnessError::Bind {
                path: socket.clone(),
                source: e,
            })?
        };

        let token = CancellationToken::new();
        let server = handle.spawn(serve(listener, Arc::new(service), token.clone()));
        tracing::debug!(socket = %socket.display(), "fixture started");

        Ok(Self {
            socket,
            handle: handle.clone(),
            token,
            server: Some(server),
        })
    }

    pub fn socket(&self) -> &Path {
        &self.socket
    }

    /// Construct an independent client bound to one delivery mode.
    /// Clients are a separate step from fixture startup so one running
    /// service can be probed by both modes without a restart.
    pub fn client(&self, mode: DeliveryMode) -> Result<RuntimeClient, HarnessError> {
        RuntimeClient::connect(&self.socket, mode).map_err(|e| HarnessError::Connect {
            path: self.socket.clone(),
            mode,
            source: e,
        })
    }

    /// Graceful drain-and-stop. Equivalent to dropping the fixture; a
    /// named method reads better at scenario boundaries.
    pub fn shutdown(self) {}

    fn teardown(&mut self) {
        let Some(server) = self.server.take() else {
            return;
        };
        self.token.cancel();
        if let Err(e) = self.handle.block_on(server) {
            tracing::warn!(error = %e, "server task join error");
        }
        let _ = std::fs::remove_file(&self.socket);
        tracing::debug!(socket = %self.socket.display(), "fixture stopped");
    }
}

impl Drop for ServerFixture {
    fn drop(&mut self) {
        self.teardown();
    }
}
