//! End-to-end tests over a real Unix socket: fixture lifecycle, delivery
//! equivalence between the two modes, the unsupported-method reply, and
//! the sweep engine's skip rule.

use std::io::{Read, Write};
use std::os::unix::net::UnixStream;

use tokio::runtime::Runtime;

use cribench_harness::{
    ServerFixture, SocketAllocator, SweepConfig, run_handler_sweep, run_sweep, run_sweep_with,
};
use cribench_rpc::DeliveryMode;
use cribench_rpc::framing::{Reply, decode_frame};
use cribench_service::BenchRuntime;

fn runtime() -> Runtime {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap()
}

#[test]
fn version_probe_answers() {
    let rt = runtime();
    let sockets = SocketAllocator::new();
    let fixture =
        ServerFixture::start(rt.handle(), BenchRuntime::new(4, 1, 2), &sockets).unwrap();

    let mut client = fixture.client(DeliveryMode::Unary).unwrap();
    let version = client.version().unwrap();
    assert_eq!(version.runtime_name, "cribench");
    assert_eq!(version.runtime_api_version, "v1");
}

#[test]
fn streamed_and_unary_return_the_same_sequence() {
    let rt = runtime();
    let sockets = SocketAllocator::new();
    let fixture =
        ServerFixture::start(rt.handle(), BenchRuntime::new(100, 4, 10), &sockets).unwrap();

    // Two independent mode-bound clients against the one running service.
    let mut unary = fixture.client(DeliveryMode::Unary).unwrap();
    let mut streamed = fixture.client(DeliveryMode::Streamed).unwrap();

    let via_list = unary.list_containers().unwrap();
    let via_stream = streamed.list_containers().unwrap();

    assert_eq!(via_list.len(), 100);
    assert_eq!(via_stream, via_list);
    for (i, c) in via_list.iter().enumerate() {
        assert_eq!(c.id, format!("container-{i}"));
    }
}

#[test]
fn repeated_calls_are_identical() {
    let rt = runtime();
    let sockets = SocketAllocator::new();
    let fixture =
        ServerFixture::start(rt.handle(), BenchRuntime::new(16, 2, 4), &sockets).unwrap();

    let mut client = fixture.client(DeliveryMode::Streamed).unwrap();
    let first = client.list_containers().unwrap();
    let second = client.list_containers().unwrap();
    assert_eq!(first, second);
}

#[test]
fn unsupported_method_gets_an_error_frame() {
    let rt = runtime();
    let sockets = SocketAllocator::new();
    let fixture =
        ServerFixture::start(rt.handle(), BenchRuntime::new(1, 1, 1), &sockets).unwrap();

    let mut raw = UnixStream::connect(fixture.socket()).unwrap();
    raw.write_all(&[0x7f]).unwrap();

    let mut buf = Vec::new();
    let mut tmp = [0u8; 256];
    let (tag, payload) = loop {
        if let Some((tag, payload, _)) = decode_frame(&buf).unwrap() {
            break (tag, payload);
        }
        let n = raw.read(&mut tmp).unwrap();
        assert_ne!(n, 0, "server closed before replying");
        buf.extend_from_slice(&tmp[..n]);
    };

    assert_eq!(tag, Reply::Error);
    let text = String::from_utf8(payload).unwrap();
    assert!(text.contains("unsupported method"), "got: {text}");
}

#[test]
fn client_hangup_mid_stream_leaves_the_server_healthy() {
    let rt = runtime();
    let sockets = SocketAllocator::new();
    let fixture =
        ServerFixture::start(rt.handle(), BenchRuntime::new(512, 8, 1), &sockets).unwrap();

    // Request a stream and hang up without reading a single chunk. The
    // server's first failed write aborts that stream.
    let mut raw = UnixStream::connect(fixture.socket()).unwrap();
    raw.write_all(&[0x03]).unwrap();
    drop(raw);

    // The aborted stream must not wedge the service for later clients.
    let mut client = fixture.client(DeliveryMode::Streamed).unwrap();
    assert_eq!(client.list_containers().unwrap().len(), 512);

    let path = fixture.socket().to_path_buf();
    drop(client);
    drop(fixture);
    assert!(!path.exists());
}

#[test]
fn fixture_teardown_removes_the_socket() {
    let rt = runtime();
    let sockets = SocketAllocator::new();
    let fixture =
        ServerFixture::start(rt.handle(), BenchRuntime::new(1, 1, 1), &sockets).unwrap();
    let path = fixture.socket().to_path_buf();
    assert!(path.exists());

    drop(fixture);
    assert!(!path.exists());
}

#[test]
fn sweep_skips_chunk_larger_than_count() {
    let rt = runtime();
    let config = SweepConfig {
        container_counts: vec![5],
        annotation_counts: vec![1],
        chunk_sizes: vec![7],
        tries: 1,
        repeat: 1,
    };
    let reports = run_sweep(rt.handle(), &config).unwrap();
    assert!(reports.is_empty());
}

#[test]
fn sweep_survives_scenarios_whose_socket_cannot_bind() {
    let rt = runtime();
    // Both scenarios fail to bind; neither may abort the sweep itself.
    let sockets = SocketAllocator::in_dir("/nonexistent/cribench-sweep");
    let config = SweepConfig {
        container_counts: vec![4, 8],
        annotation_counts: vec![1],
        chunk_sizes: vec![2],
        tries: 1,
        repeat: 1,
    };
    let reports = run_sweep_with(rt.handle(), &config, &sockets).unwrap();
    assert!(reports.is_empty());
}

#[test]
fn zero_tries_is_clamped_to_one_request() {
    let rt = runtime();
    let config = SweepConfig {
        container_counts: vec![4],
        annotation_counts: vec![1],
        chunk_sizes: vec![2],
        tries: 0,
        repeat: 0,
    };
    let reports = run_sweep(rt.handle(), &config).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].unary.requests, 1);
    assert!(reports[0].unary.us_per_request().is_finite());
}

#[test]
fn sweep_single_scenario_smoke() {
    let rt = runtime();
    let config = SweepConfig {
        container_counts: vec![8],
        annotation_counts: vec![2],
        chunk_sizes: vec![4],
        tries: 3,
        repeat: 2,
    };
    let reports = run_sweep(rt.handle(), &config).unwrap();
    assert_eq!(reports.len(), 1);

    let r = &reports[0];
    assert_eq!(r.scenario.containers, 8);
    assert_eq!(r.unary.requests, 6);
    assert_eq!(r.streamed.requests, 6);
    assert!(r.unary.total.as_nanos() > 0);
    assert!(r.streamed.total.as_nanos() > 0);
    // Chunked framing always costs extra header bytes.
    assert!(r.streamed_wire_bytes > r.unary_wire_bytes);
}

#[test]
fn handler_sweep_reports_every_valid_combination() {
    let config = SweepConfig {
        container_counts: vec![4, 8],
        annotation_counts: vec![1],
        chunk_sizes: vec![2, 6],
        tries: 2,
        repeat: 1,
    };
    // (4,2) (8,2) (8,6) are valid; (4,6) is skipped.
    let reports = run_handler_sweep(&config);
    assert_eq!(reports.len(), 3);
    assert!(reports.iter().all(|r| r.unary.requests == 2));
}
