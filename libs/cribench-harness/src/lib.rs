//! Benchmark harness: transport fixtures, the parameter sweep engine,
//! allocation counting, and report printing.

pub mod alloc;
mod error;
mod fixture;
pub mod report;
mod sweep;

pub use error::HarnessError;
pub use fixture::{ServerFixture, SocketAllocator};
pub use sweep::{
    HandlerReport, ModeSample, Scenario, ScenarioReport, SweepConfig, run_handler_sweep, run_sweep,
    run_sweep_with,
};
