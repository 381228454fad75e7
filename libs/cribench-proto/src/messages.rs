use std::collections::BTreeMap;

/// One synthetic container record.
///
/// Label and annotation maps are B-tree backed so that encoding a record
/// built from the same inputs always yields identical bytes.
#[derive(Clone, PartialEq, prost::Message)]
pub struct Container {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub pod_sandbox_id: String,
    #[prost(message, optional, tag = "3")]
    pub metadata: Option<ContainerMetadata>,
    #[prost(message, optional, tag = "4")]
    pub image: Option<ImageSpec>,
    #[prost(string, tag = "5")]
    pub image_ref: String,
    #[prost(enumeration = "ContainerState", tag = "6")]
    pub state: i32,
    #[prost(int64, tag = "7")]
    pub created_at: i64,
    #[prost(btree_map = "string, string", tag = "8")]
    pub labels: BTreeMap<String, String>,
    #[prost(btree_map = "string, string", tag = "9")]
    pub annotations: BTreeMap<String, String>,
    #[prost(string, tag = "10")]
    pub image_id: String,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ContainerMetadata {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(uint32, tag = "2")]
    pub attempt: u32,
}

#[derive(Clone, PartialEq, prost::Message)]
pub struct ImageSpec {
    #[prost(string, tag = "1")]
    pub image: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, prost::Enumeration)]
#[repr(i32)]
pub enum ContainerState {
    Created = 0,
    Running = 1,
    Exited = 2,
    Unknown = 3,
}

/// Static identity payload for the version/handshake operation.
#[derive(Clone, PartialEq, prost::Message)]
pub struct VersionResponse {
    #[prost(string, tag = "1")]
    pub version: String,
    #[prost(string, tag = "2")]
    pub runtime_name: String,
    #[prost(string, tag = "3")]
    pub runtime_version: String,
    #[prost(string, tag = "4")]
    pub runtime_api_version: String,
}

/// Unary delivery: the whole record set in one message.
#[derive(Clone, PartialEq, prost::Message)]
pub struct ListContainersResponse {
    #[prost(message, repeated, tag = "1")]
    pub containers: Vec<Container>,
}

/// Streamed delivery: one chunk of consecutive records.
#[derive(Clone, PartialEq, prost::Message)]
pub struct StreamContainersResponse {
    #[prost(message, repeated, tag = "1")]
    pub containers: Vec<Container>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate_containers;
    use prost::Message;

    #[test]
    fn aggregate_round_trip() {
        let msg = ListContainersResponse {
            containers: generate_containers(16, 4),
        };
        let mut buf = Vec::new();
        msg.encode(&mut buf).unwrap();
        assert_eq!(buf.len(), msg.encoded_len());

        let decoded = ListContainersResponse::decode(buf.as_slice()).unwrap();
        assert_eq!(decoded, msg);
    }

    #[test]
    fn per_record_round_trip() {
        for container in generate_containers(8, 2) {
            let msg = StreamContainersResponse {
                containers: vec![container],
            };
            let mut buf = Vec::new();
            msg.encode(&mut buf).unwrap();
            let decoded = StreamContainersResponse::decode(buf.as_slice()).unwrap();
            assert_eq!(decoded, msg);
        }
    }

    #[test]
    fn marshal_bytes_are_identical_across_runs() {
        let mut a = Vec::new();
        let mut b = Vec::new();
        ListContainersResponse {
            containers: generate_containers(32, 8),
        }
        .encode(&mut a)
        .unwrap();
        ListContainersResponse {
            containers: generate_containers(32, 8),
        }
        .encode(&mut b)
        .unwrap();
        assert_eq!(a, b);
    }
}
