//! Minimal binary RPC over Unix sockets: unary and server-streamed
//! replies with length-prefixed framing.
//!
//! The server side runs on tokio and dispatches each connection on its
//! own task; the client side is deliberately blocking so measurement
//! loops stay sequential. The service surface is the capability-scoped
//! [`ContainerRuntime`] trait; any method byte outside it is answered
//! with an explicit error frame, never a silent default.

mod client;
mod error;
pub mod framing;
mod server;

pub use client::{DeliveryMode, RuntimeClient};
pub use error::RpcError;
pub use server::serve;

use cribench_proto::{ListContainersResponse, StreamContainersResponse, VersionResponse};

/// The three operations this benchmark serves. Implementations must be
/// independently callable without a live connection: the harness times
/// handler bodies directly to split generation cost from transport cost.
pub trait ContainerRuntime: Send + Sync + 'static {
    /// Static identity payload; connectivity probe, never timed.
    fn version(&self) -> VersionResponse;

    /// The whole record set as one response.
    fn list_containers(&self) -> ListContainersResponse;

    /// The same record set as consecutive chunks, global order preserved.
    fn stream_containers(&self) -> Vec<StreamContainersResponse>;
}
