use std::collections::BTreeMap;

use crate::messages::{Container, ContainerMetadata, ContainerState, ImageSpec};

/// Fixed epoch the synthetic creation timestamps are offset from.
pub const CREATED_AT_EPOCH: i64 = 1_700_000_000;

/// Build one synthetic container record.
///
/// Pure function of `(index, annotation_count)`: every string field is a
/// deterministic format of the index (and sub-index for annotations), so
/// two calls with the same arguments produce identical records. Delivery
/// benchmarks rely on this: they must measure delivery cost, not data
/// variance.
pub fn generate_container(index: usize, annotation_count: usize) -> Container {
    let mut annotations = BTreeMap::new();
    for j in 0..annotation_count {
        annotations.insert(
            format!("io.kubernetes.annotation-{j}"),
            format!("value-{index}-{j}"),
        );
    }

    let mut labels = BTreeMap::new();
    labels.insert("app".to_string(), format!("app-{index}"));
    labels.insert("component".to_string(), "server".to_string());

    Container {
        id: format!("container-{index}"),
        pod_sandbox_id: format!("sandbox-{index}"),
        metadata: Some(ContainerMetadata {
            name: format!("name-{index}"),
            attempt: index as u32,
        }),
        image: Some(ImageSpec {
            image: format!("registry.example.com/image-{index}:latest"),
        }),
        image_ref: format!("sha256:abcdef{index:06}"),
        state: ContainerState::Running as i32,
        created_at: CREATED_AT_EPOCH + index as i64,
        labels,
        annotations,
        image_id: format!("sha256:fedcba{index:06}"),
    }
}

/// Build the full record set: indices `0..count` in ascending order.
pub fn generate_containers(count: usize, annotation_count: usize) -> Vec<Container> {
    (0..count)
        .map(|i| generate_container(i, annotation_count))
        .collect()
}
