use cribench_harness::{SweepConfig, report, run_handler_sweep, run_sweep};

use crate::config::SweepArgs;
use crate::error::CliError;

pub fn run(args: SweepArgs) -> Result<(), CliError> {
    let config = SweepConfig {
        container_counts: args.containers,
        annotation_counts: args.annotations,
        chunk_sizes: args.chunk_sizes,
        tries: args.tries,
        repeat: args.repeat,
    };

    // The measurement loops run on this thread; the runtime only carries
    // the per-scenario server fixtures.
    let rt = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()?;

    let reports = run_sweep(rt.handle(), &config)?;
    report::print_sweep_report(&reports);

    if args.handlers {
        println!();
        let handler_reports = run_handler_sweep(&config);
        report::print_handler_report(&handler_reports);
    }

    Ok(())
}
