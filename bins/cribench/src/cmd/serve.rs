use std::sync::Arc;

use tokio::net::UnixListener;
use tokio_util::sync::CancellationToken;

use cribench_rpc::serve;
use cribench_service::BenchRuntime;

use crate::config::ServeArgs;
use crate::error::CliError;

pub fn run(args: ServeArgs) -> Result<(), CliError> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(run_inner(args))
}

async fn run_inner(args: ServeArgs) -> Result<(), CliError> {
    tracing::info!("cribench server starting");

    // A previous run may have left its socket behind.
    match std::fs::remove_file(&args.socket) {
        Ok(()) => {}
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => return Err(e.into()),
    }

    let listener = UnixListener::bind(&args.socket)?;
    let service = BenchRuntime::new(args.containers, args.annotations, args.chunk_size);

    let token = CancellationToken::new();
    let server = tokio::spawn(serve(listener, Arc::new(service), token.clone()));

    tracing::info!(
        socket = %args.socket.display(),
        containers = args.containers,
        annotations = args.annotations,
        chunk_size = args.chunk_size,
        "listening"
    );

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down...");

    // Stop accepting, drain in-flight connections, then unlink the socket.
    token.cancel();
    let _ = server.await;
    let _ = std::fs::remove_file(&args.socket);

    tracing::info!("shutdown complete");
    Ok(())
}
