//! Reply framing: `[1 byte tag][4 bytes big-endian length][payload]`.
//!
//! Requests carry no arguments, so a request is the bare method byte and
//! only replies are framed.

use prost::Message;

use crate::error::RpcError;

/// Upper bound on a single reply payload.
pub const MAX_FRAME: usize = 64 * 1024 * 1024;

/// Reply tag byte plus length prefix.
pub const HEADER_LEN: usize = 5;

/// Method byte sent by the client. The service interface is capability
/// scoped: these three operations are the whole surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Method {
    Version = 0x01,
    List = 0x02,
    Stream = 0x03,
}

impl Method {
    pub fn from_byte(b: u8) -> Option<Method> {
        match b {
            0x01 => Some(Method::Version),
            0x02 => Some(Method::List),
            0x03 => Some(Method::Stream),
            _ => None,
        }
    }
}

/// Reply tag byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Reply {
    /// One encoded message.
    Payload = 0x10,
    /// End of a streamed reply sequence; empty payload.
    End = 0x11,
    /// UTF-8 error text.
    Error = 0x12,
}

impl Reply {
    pub fn from_byte(b: u8) -> Option<Reply> {
        match b {
            0x10 => Some(Reply::Payload),
            0x11 => Some(Reply::End),
            0x12 => Some(Reply::Error),
            _ => None,
        }
    }
}

/// Append one framed message to `out`.
pub fn encode_message(msg: &impl Message, out: &mut Vec<u8>) -> Result<(), RpcError> {
    let len = msg.encoded_len();
    if len > MAX_FRAME {
        return Err(RpcError::FrameTooLarge(len));
    }
    out.push(Reply::Payload as u8);
    out.extend_from_slice(&(len as u32).to_be_bytes());
    msg.encode(out)?;
    Ok(())
}

/// Append a framed raw payload (`End` / `Error` frames) to `out`.
pub fn encode_raw(tag: Reply, payload: &[u8], out: &mut Vec<u8>) -> Result<(), RpcError> {
    if payload.len() > MAX_FRAME {
        return Err(RpcError::FrameTooLarge(payload.len()));
    }
    out.push(tag as u8);
    out.extend_from_slice(&(payload.len() as u32).to_be_bytes());
    out.extend_from_slice(payload);
    Ok(())
}

/// Try to decode one frame from the front of `buf`.
///
/// Returns `Ok(None)` when the buffer does not yet hold a complete frame,
/// otherwise the tag, payload, and total bytes consumed.
pub fn decode_frame(buf: &[u8]) -> Result<Option<(Reply, Vec<u8>, usize)>, RpcError> {
    if buf.len() < HEADER_LEN {
        return Ok(None);
    }
    let tag = Reply::from_byte(buf[0]).ok_or(RpcError::UnknownReply(buf[0]))?;
    let len = u32::from_be_bytes([buf[1], buf[2], buf[3], buf[4]]) as usize;
    if len > MAX_FRAME {
        return Err(RpcError::FrameTooLarge(len));
    }
    let total = HEADER_LEN + len;
    if buf.len() < total {
        return Ok(None);
    }
    Ok(Some((tag, buf[HEADER_LEN..total].to_vec(), total)))
}
