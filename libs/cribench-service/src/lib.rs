//! Dual-mode benchmark service: the same logical record set served
//! through a unary list and a chunked stream.
//!
//! Every call regenerates the set from scratch, no caching, mirroring a
//! runtime that reconstructs current state per request. With
//! identical parameters the unary response and the concatenation of all
//! stream chunks are the same ordered sequence.

use cribench_proto::{
    ListContainersResponse, StreamContainersResponse, VersionResponse, generate_containers,
};
use cribench_rpc::ContainerRuntime;

/// Service instance for one benchmark scenario.
#[derive(Debug, Clone, Copy)]
pub struct BenchRuntime {
    containers: usize,
    annotations: usize,
    chunk_size: usize,
}

impl BenchRuntime {
    /// A `chunk_size` of zero is clamped to one; the sweep engine never
    /// passes zero, but a degenerate CLI value must not wedge the server.
    pub fn new(containers: usize, annotations: usize, chunk_size: usize) -> Self {
        Self {
            containers,
            annotations,
            chunk_size: chunk_size.max(1),
        }
    }

    pub fn containers(&self) -> usize {
        self.containers
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }
}

impl ContainerRuntime for BenchRuntime {
    fn version(&self) -> VersionResponse {
        VersionResponse {
            version: "0.1.0".to_string(),
            runtime_name: "cribench".to_string(),
            runtime_version: "0.1.0".to_string(),
            runtime_api_version: "v1".to_string(),
        }
    }

    fn list_containers(&self) -> ListContainersResponse {
        ListContainersResponse {
            containers: generate_containers(self.containers, self.annotations),
        }
    }

    fn stream_containers(&self) -> Vec<StreamContainersResponse> {
        generate_containers(self.containers, self.annotations)
            .chunks(self.chunk_size)
            .map(|chunk| StreamContainersResponse {
                containers: chunk.to_vec(),
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unary_returns_configured_count_in_order() {
        let svc = BenchRuntime::new(100, 4, 10);
        let resp = svc.list_containers();
        assert_eq!(resp.containers.len(), 100);
        for (i, c) in resp.containers.iter().enumerate() {
            assert_eq!(c.id, format!("container-{i}"));
        }
    }

    #[test]
    fn stream_emits_even_chunks() {
        let svc = BenchRuntime::new(100, 2, 10);
        let chunks = svc.stream_containers();
        assert_eq!(chunks.len(), 10);
        assert!(chunks.iter().all(|c| c.containers.len() == 10));
    }

    #[test]
    fn stream_tail_chunk_may_be_partial() {
        let svc = BenchRuntime::new(10, 1, 3);
        let sizes: Vec<usize> = svc
            .stream_containers()
            .iter()
            .map(|c| c.containers.len())
            .collect();
        assert_eq!(sizes, [3, 3, 3, 1]);
    }

    #[test]
    fn chunk_equal_to_count_is_a_single_chunk() {
        let svc = BenchRuntime::new(16, 1, 16);
        assert_eq!(svc.stream_containers().len(), 1);
    }

    #[test]
    fn stream_concatenation_equals_unary_list() {
        let svc = BenchRuntime::new(57, 3, 8);
        let unary = svc.list_containers().containers;
        let streamed: Vec<_> = svc
            .stream_containers()
            .into_iter()
            .flat_map(|c| c.containers)
            .collect();
        assert_eq!(streamed, unary);
    }

    #[test]
    fn version_is_static() {
        let svc = BenchRuntime::new(1, 1, 1);
        let v = svc.version();
        assert_eq!(v.runtime_name, "cribench");
        assert_eq!(v.runtime_api_version, "v1");
    }
}
