//! Sweep & measurement engine: runs one controlled experiment per valid
//! parameter combination and derives comparative metrics.

use std::time::{Duration, Instant};

use prost::Message;
use tokio::runtime::Handle;

use cribench_rpc::{DeliveryMode, framing::HEADER_LEN};
use cribench_service::BenchRuntime;

use crate::alloc;
use crate::error::HarnessError;
use crate::fixture::{ServerFixture, SocketAllocator};

/// Parameter grid plus loop counts. `tries` timed requests per mode,
/// repeated `repeat` times; per-request latency divides by both. Zero
/// `tries` or `repeat` is clamped to one at run time so the division
/// stays defined.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub container_counts: Vec<usize>,
    pub annotation_counts: Vec<usize>,
    pub chunk_sizes: Vec<usize>,
    pub tries: usize,
    pub repeat: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self {
            container_counts: vec![4, 8, 16, 32, 64, 128, 256, 512, 1024],
            annotation_counts: vec![1, 2, 4, 8, 16, 32],
            chunk_sizes: vec![1, 16, 64, 256],
            tries: 100,
            repeat: 1,
        }
    }
}

/// One (record count, annotation count, chunk size) combination.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Scenario {
    pub containers: usize,
    pub annotations: usize,
    pub chunk_size: usize,
}

impl std::fmt::Display for Scenario {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "containers={}/annotations={}/chunk={}",
            self.containers, self.annotations, self.chunk_size
        )
    }
}

/// Accumulated measurements for one delivery mode.
#[derive(Debug, Clone, Copy)]
pub struct ModeSample {
    pub requests: usize,
    pub total: Duration,
    pub allocs: u64,
    pub alloc_bytes: u64,
}

impl ModeSample {
    pub fn us_per_request(&self) -> f64 {
        self.total.as_micros() as f64 / self.requests as f64
    }

    pub fn allocs_per_request(&self) -> f64 {
        self.allocs as f64 / self.requests as f64
    }
}

/// Derived metrics for one scenario. Nothing is dropped, even when the
/// two modes come out equal.
#[derive(Debug, Clone)]
pub struct ScenarioReport {
    pub scenario: Scenario,
    pub unary: ModeSample,
    pub streamed: ModeSample,
    /// Framed bytes of the unary reply.
    pub unary_wire_bytes: usize,
    /// Framed bytes of all stream chunks plus the end frame.
    pub streamed_wire_bytes: usize,
}

impl ScenarioReport {
    /// Signed latency difference: positive means unary was faster.
    pub fn latency_delta_pct(&self) -> f64 {
        let unary = self.unary.us_per_request();
        let streamed = self.streamed.us_per_request();
        (streamed - unary) / unary * 100.0
    }

    /// Extra wire bytes paid for chunked framing, relative to unary.
    pub fn framing_overhead_pct(&self) -> f64 {
        (self.streamed_wire_bytes as f64 - self.unary_wire_bytes as f64)
            / self.unary_wire_bytes as f64
            * 100.0
    }
}

/// Run every valid combination in the grid. A chunk size larger than the
/// record count is skipped, not an error; it must never degrade into a
/// silent single-chunk run. A scenario whose setup or transport fails is
/// logged and skipped, leaving its siblings to run; only a warm-up count
/// mismatch aborts the whole sweep.
pub fn run_sweep(handle: &Handle, config: &SweepConfig) -> Result<Vec<ScenarioReport>, HarnessError> {
    run_sweep_with(handle, config, &SocketAllocator::new())
}

/// Same sweep with an explicit socket allocator, so the caller controls
/// where the socket files land.
pub fn run_sweep_with(
    handle: &Handle,
    config: &SweepConfig,
    sockets: &SocketAllocator,
) -> Result<Vec<ScenarioReport>, HarnessError> {
    let tries = config.tries.max(1);
    let repeat = config.repeat.max(1);
    let mut reports = Vec::new();

    for &containers in &config.container_counts {
        for &annotations in &config.annotation_counts {
            for &chunk_size in &config.chunk_sizes {
                if chunk_size > containers {
                    tracing::debug!(
                        containers,
                        chunk_size,
                        "chunk size exceeds container count, skipping"
                    );
                    continue;
                }
                let scenario = Scenario {
                    containers,
                    annotations,
                    chunk_size,
                };
                match run_scenario(handle, scenario, tries, repeat, sockets) {
                    Ok(report) => {
                        tracing::info!(
                            scenario = %scenario,
                            unary_us = report.unary.us_per_request(),
                            streamed_us = report.streamed.us_per_request(),
                            delta_pct = report.latency_delta_pct(),
                            "scenario done"
                        );
                        reports.push(report);
                    }
                    Err(err @ HarnessError::CountMismatch { .. }) => return Err(err),
                    Err(err) => {
                        tracing::error!(scenario = %scenario, error = %err, "scenario failed, skipping");
                    }
                }
            }
        }
    }

    Ok(reports)
}

/// One fixture per scenario, not per mode, so both clients probe a
/// service with the identical generation cost profile.
fn run_scenario(
    handle: &Handle,
    scenario: Scenario,
    tries: usize,
    repeat: usize,
    sockets: &SocketAllocator,
) -> Result<ScenarioReport, HarnessError> {
    let service = BenchRuntime::new(scenario.containers, scenario.annotations, scenario.chunk_size);
    let fixture = ServerFixture::start(handle, service, sockets)?;

    let unary = measure_mode(&fixture, DeliveryMode::Unary, scenario, tries, repeat)?;
    let streamed = measure_mode(&fixture, DeliveryMode::Streamed, scenario, tries, repeat)?;
    let (unary_wire_bytes, streamed_wire_bytes) = wire_sizes(&service);

    fixture.shutdown();

    Ok(ScenarioReport {
        scenario,
        unary,
        streamed,
        unary_wire_bytes,
        streamed_wire_bytes,
    })
}

fn measure_mode(
    fixture: &ServerFixture,
    mode: DeliveryMode,
    scenario: Scenario,
    tries: usize,
    repeat: usize,
) -> Result<ModeSample, HarnessError> {
    let mut client = fixture.client(mode)?;

    // Warm-up doubles as the correctness guard: the returned count must
    // match the scenario before anything is timed.
    let warm = client.list_containers()?;
    if warm.len() != scenario.containers {
        return Err(HarnessError::CountMismatch {
            mode,
            expected: scenario.containers,
            actual: warm.len(),
        });
    }

    let requests = tries * repeat;
    let before = alloc::snapshot();
    let start = Instant::now();
    for _ in 0..repeat {
        for _ in 0..tries {
            let got = client.list_containers()?;
            std::hint::black_box(got.len());
        }
    }
    let total = start.elapsed();
    let delta = alloc::snapshot().since(before);

    Ok(ModeSample {
        requests,
        total,
        allocs: delta.allocs,
        alloc_bytes: delta.bytes,
    })
}

/// Framed reply sizes for both shapes, computed from the service's own
/// responses without any transport.
fn wire_sizes(service: &BenchRuntime) -> (usize, usize) {
    use cribench_rpc::ContainerRuntime;

    let unary = HEADER_LEN + service.list_containers().encoded_len();
    let streamed = service
        .stream_containers()
        .iter()
        .map(|chunk| HEADER_LEN + chunk.encoded_len())
        .sum::<usize>()
        + HEADER_LEN; // end-of-stream frame
    (unary, streamed)
}

// ── Handler-only sweep ─────────────────────────────────────────────────

/// Server-side-only measurements: handler bodies invoked directly, no
/// fixture, no socket. Separates record generation cost from
/// transport+serialization cost.
#[derive(Debug, Clone)]
pub struct HandlerReport {
    pub scenario: Scenario,
    pub unary: ModeSample,
    pub streamed: ModeSample,
}

impl HandlerReport {
    pub fn latency_delta_pct(&self) -> f64 {
        let unary = self.unary.us_per_request();
        let streamed = self.streamed.us_per_request();
        (streamed - unary) / unary * 100.0
    }
}

pub fn run_handler_sweep(config: &SweepConfig) -> Vec<HandlerReport> {
    use cribench_rpc::ContainerRuntime;

    let mut reports = Vec::new();
    for &containers in &config.container_counts {
        for &annotations in &config.annotation_counts {
            for &chunk_size in &config.chunk_sizes {
                if chunk_size > containers {
                    continue;
                }
                let scenario = Scenario {
                    containers,
                    annotations,
                    chunk_size,
                };
                let service = BenchRuntime::new(containers, annotations, chunk_size);
                let requests = config.tries.max(1) * config.repeat.max(1);

                std::hint::black_box(service.list_containers());
                let before = alloc::snapshot();
                let start = Instant::now();
                for _ in 0..requests {
                    std::hint::black_box(service.list_containers().containers.len());
                }
                let total = start.elapsed();
                let delta = alloc::snapshot().since(before);
                let unary = ModeSample {
                    requests,
                    total,
                    allocs: delta.allocs,
                    alloc_bytes: delta.bytes,
                };

                std::hint::black_box(service.stream_containers());
                let before = alloc::snapshot();
                let start = Instant::now();
                for _ in 0..requests {
                    std::hint::black_box(service.stream_containers().len());
                }
                let total = start.elapsed();
                let delta = alloc::snapshot().since(before);
                let streamed = ModeSample {
                    requests,
                    total,
                    allocs: delta.allocs,
                    alloc_bytes: delta.bytes,
                };

                reports.push(HandlerReport {
                    scenario,
                    unary,
                    streamed,
                });
            }
        }
    }
    reports
}
