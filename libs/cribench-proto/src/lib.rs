//! Wire messages and the deterministic synthetic container generator.
//!
//! Message shapes mirror the container-runtime list API: one aggregate
//! response for the unary call, one chunk message for the streamed call.
//! Everything here is pure data; no I/O, no transport.

mod generator;
mod messages;

pub use generator::{CREATED_AT_EPOCH, generate_container, generate_containers};
pub use messages::{
    Container, ContainerMetadata, ContainerState, ImageSpec, ListContainersResponse,
    StreamContainersResponse, VersionResponse,
};
