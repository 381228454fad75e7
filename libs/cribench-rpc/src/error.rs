use crate::framing::MAX_FRAME;

/// Unified error type for the RPC layer. No call is retried; a failed
/// call is surfaced to the caller as-is.
#[derive(Debug, thiserror::Error)]
pub enum RpcError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("encode: {0}")]
    Encode(#[from] prost::EncodeError),

    #[error("decode: {0}")]
    Decode(#[from] prost::DecodeError),

    #[error("frame too large: {0} bytes (max {max})", max = MAX_FRAME)]
    FrameTooLarge(usize),

    #[error("unknown reply tag: {0:#04x}")]
    UnknownReply(u8),

    #[error("unsupported method: {0:#04x}")]
    UnsupportedMethod(u8),

    #[error("server error: {0}")]
    Remote(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn frame_too_large_names_both_sizes() {
        let msg = RpcError::FrameTooLarge(MAX_FRAME + 1).to_string();
        assert!(msg.contains(&(MAX_FRAME + 1).to_string()), "got: {msg}");
        assert!(msg.contains(&MAX_FRAME.to_string()), "got: {msg}");
    }

    #[test]
    fn unsupported_method_names_the_byte() {
        let msg = RpcError::UnsupportedMethod(0x7f).to_string();
        assert_eq!(msg, "unsupported method: 0x7f");
    }
}
