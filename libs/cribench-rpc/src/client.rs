use std::io::{Read, Write};
use std::os::unix::net::UnixStream;
use std::path::Path;

use prost::Message;

use cribench_proto::{Container, ListContainersResponse, StreamContainersResponse, VersionResponse};

use crate::error::RpcError;
use crate::framing::{Method, Reply, decode_frame};

/// Which delivery strategy a client handle uses for `list_containers`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryMode {
    Unary,
    Streamed,
}

impl std::fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeliveryMode::Unary => f.write_str("unary"),
            DeliveryMode::Streamed => f.write_str("streamed"),
        }
    }
}

/// Blocking client handle bound to one delivery mode.
///
/// Both modes expose the same `list_containers` call so measurement code
/// is identical on either side of the comparison; only the wire shape
/// differs. Intentionally synchronous: the measurement loop issues
/// requests sequentially and must not pick up executor noise.
pub struct RuntimeClient {
    stream: UnixStream,
    mode: DeliveryMode,
    buf: Vec<u8>,
}

impl RuntimeClient {
    pub fn connect(socket: &Path, mode: DeliveryMode) -> Result<Self, RpcError> {
        let stream = UnixStream::connect(socket)?;
        Ok(Self {
            stream,
            mode,
            buf: Vec::with_capacity(8192),
        })
    }

    pub fn mode(&self) -> DeliveryMode {
        self.mode
    }

    /// Connectivity probe; not part of any timed loop.
    pub fn version(&mut self) -> Result<VersionResponse, RpcError> {
        self.send(Method::Version)?;
        let payload = self.read_payload()?;
        Ok(VersionResponse::decode(payload.as_slice())?)
    }

    /// Fetch the full record set via the mode this handle is bound to.
    pub fn list_containers(&mut self) -> Result<Vec<Container>, RpcError> {
        match self.mode {
            DeliveryMode::Unary => {
                self.send(Method::List)?;
                let payload = self.read_payload()?;
                Ok(ListContainersResponse::decode(payload.as_slice())?.containers)
            }
            DeliveryMode::Streamed => {
                self.send(Method::Stream)?;
                let mut containers = Vec::new();
                loop {
                    let (tag, payload) = self.read_reply()?;
                    match tag {
                        Reply::Payload => {
                            let chunk = StreamContainersResponse::decode(payload.as_slice())?;
                            containers.extend(chunk.containers);
                        }
                        Reply::End => return Ok(containers),
                        Reply::Error => return Err(remote_error(payload)),
                    }
                }
            }
        }
    }

    fn send(&mut self, method: Method) -> Result<(), RpcError> {
        self.stream.write_all(&[method as u8])?;
        Ok(())
    }

    /// Read one reply that must be a `Payload` frame.
    fn read_payload(&mut self) -> Result<Vec<u8>, RpcError> {
        let (tag, payload) = self.read_reply()?;
        match tag {
            Reply::Payload => Ok(payload),
            Reply::Error => Err(remote_error(payload)),
            Reply::End => Err(RpcError::UnknownReply(Reply::End as u8)),
        }
    }

    /// Read from the socket until one complete frame is buffered.
    fn read_reply(&mut self) -> Result<(Reply, Vec<u8>), RpcError> {
        let mut tmp = [0u8; 4096];
        loop {
            if let Some((tag, payload, consumed)) = decode_frame(&self.buf)? {
                self.buf.drain(..consumed);
                return Ok((tag, payload));
            }
            let n = self.stream.read(&mut tmp)?;
            if n == 0 {
                return Err(std::io::Error::from(std::io::ErrorKind::UnexpectedEof).into());
            }
            self.buf.extend_from_slice(&tmp[..n]);
        }
    }
}

fn remote_error(payload: Vec<u8>) -> RpcError {
    RpcError::Remote(String::from_utf8_lossy(&payload).into_owned())
}
