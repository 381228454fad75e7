use std::io::ErrorKind;
use std::sync::Arc;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{UnixListener, UnixStream};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::ContainerRuntime;
use crate::error::RpcError;
use crate::framing::{Method, Reply, encode_message, encode_raw};

/// Accept loop: one task per connection, cooperative shutdown via the
/// cancellation token. After cancellation the loop stops accepting and
/// drains the remaining connection tasks before returning.
pub async fn serve(
    listener: UnixListener,
    runtime: Arc<dyn ContainerRuntime>,
    token: CancellationToken,
) {
    let mut conns = JoinSet::new();
    loop {
        tokio::select! {
            accepted = listener.accept() => {
                match accepted {
                    Ok((stream, _)) => {
                        let runtime = runtime.clone();
                        let conn_token = token.child_token();
                        conns.spawn(async move {
                            if let Err(e) = handle_connection(stream, runtime, conn_token).await {
                                tracing::warn!(error = %e, "connection error");
                            }
                        });
                    }
                    Err(e) => {
                        tracing::error!(error = %e, "accept error");
                        break;
                    }
                }
            }
            _ = token.cancelled() => break,
        }
    }

    while conns.join_next().await.is_some() {}
    tracing::debug!("server stopped");
}

/// Per-connection loop: read method bytes, answer with framed replies.
///
/// A streamed reply is a blocking sequence of chunk writes on this one
/// stream; the first failed write aborts the whole stream.
async fn handle_connection(
    mut stream: UnixStream,
    runtime: Arc<dyn ContainerRuntime>,
    token: CancellationToken,
) -> Result<(), RpcError> {
    let mut buf = Vec::with_capacity(8192);

    loop {
        let method = tokio::select! {
            read = stream.read_u8() => match read {
                Ok(b) => b,
                Err(e) if e.kind() == ErrorKind::UnexpectedEof => return Ok(()),
                Err(e) => return Err(e.into()),
            },
            _ = token.cancelled() => return Ok(()),
        };

        buf.clear();
        match Method::from_byte(method) {
            Some(Method::Version) => {
                encode_message(&runtime.version(), &mut buf)?;
                stream.write_all(&buf).await?;
            }
            Some(Method::List) => {
                encode_message(&runtime.list_containers(), &mut buf)?;
                stream.write_all(&buf).await?;
            }
            Some(Method::Stream) => {
                for chunk in runtime.stream_containers() {
                    buf.clear();
                    encode_message(&chunk, &mut buf)?;
                    stream.write_all(&buf).await?;
                }
                buf.clear();
                encode_raw(Reply::End, &[], &mut buf)?;
                stream.write_all(&buf).await?;
            }
            None => {
                tracing::warn!(method, "unsupported method");
                let err = RpcError::UnsupportedMethod(method);
                encode_raw(Reply::Error, err.to_string().as_bytes(), &mut buf)?;
                stream.write_all(&buf).await?;
            }
        }
    }
}
