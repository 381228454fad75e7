//! Plain-text report tables: the sweep's actual output, meant for a
//! human or a plotting step downstream.

use crate::sweep::{HandlerReport, ScenarioReport};

pub fn print_sweep_report(reports: &[ScenarioReport]) {
    println!(
        "{:>10} {:>11} {:>6} | {:>12} {:>12} {:>8} | {:>11} {:>11} | {:>12} {:>12} {:>10}",
        "containers",
        "annotations",
        "chunk",
        "unary µs/req",
        "strm µs/req",
        "delta %",
        "unary allocs",
        "strm allocs",
        "unary bytes",
        "strm bytes",
        "overhead %"
    );
    for r in reports {
        println!(
            "{:>10} {:>11} {:>6} | {:>12.1} {:>12.1} {:>+8.1} | {:>11.0} {:>11.0} | {:>12} {:>12} {:>+10.2}",
            r.scenario.containers,
            r.scenario.annotations,
            r.scenario.chunk_size,
            r.unary.us_per_request(),
            r.streamed.us_per_request(),
            r.latency_delta_pct(),
            r.unary.allocs_per_request(),
            r.streamed.allocs_per_request(),
            r.unary_wire_bytes,
            r.streamed_wire_bytes,
            r.framing_overhead_pct()
        );
    }
}

pub fn print_handler_report(reports: &[HandlerReport]) {
    println!(
        "{:>10} {:>11} {:>6} | {:>12} {:>12} {:>8}",
        "containers", "annotations", "chunk", "list µs/req", "build µs/req", "delta %"
    );
    for r in reports {
        println!(
            "{:>10} {:>11} {:>6} | {:>12.1} {:>12.1} {:>+8.1}",
            r.scenario.containers,
            r.scenario.annotations,
            r.scenario.chunk_size,
            r.unary.us_per_request(),
            r.streamed.us_per_request(),
            r.latency_delta_pct()
        );
    }
}
