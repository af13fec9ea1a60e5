//! Replays recorded step traces through the aggregator.

use crate::{Result, StepTraceReader};
use scintsim_aggregation::{aggregate_events, aggregate_events_parallel, EventHits};
use scintsim_core::AggregatorConfig;
use std::path::Path;

/// Reads a trace and aggregates its events sequentially.
///
/// # Errors
/// Returns an error if the trace cannot be read or aggregation fails.
pub fn replay_trace<P: AsRef<Path>>(path: P, config: &AggregatorConfig) -> Result<Vec<EventHits>> {
    let events = StepTraceReader::open(path)?.read_events()?;
    let hits = aggregate_events(config, &events)?;
    log::info!(
        "aggregated {} events into {} hits",
        hits.len(),
        hits.iter().map(|e| e.hits.len()).sum::<usize>()
    );
    Ok(hits)
}

/// Reads a trace and aggregates its events on the rayon pool.
///
/// # Errors
/// Returns an error if the trace cannot be read or aggregation fails.
pub fn replay_trace_parallel<P: AsRef<Path>>(
    path: P,
    config: &AggregatorConfig,
) -> Result<Vec<EventHits>> {
    let events = StepTraceReader::open(path)?.read_events()?;
    let hits = aggregate_events_parallel(config, &events)?;
    log::info!(
        "aggregated {} events into {} hits",
        hits.len(),
        hits.iter().map(|e| e.hits.len()).sum::<usize>()
    );
    Ok(hits)
}
