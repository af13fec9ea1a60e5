//! High-level drivers that replay whole events through an aggregator.

use crate::{AggregationStatistics, HitAggregator};
use rayon::prelude::*;
use scintsim_core::{AggregatorConfig, Hit, Result, SimulatedEvent};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Hits produced by one event.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct EventHits {
    /// Id of the source event.
    pub event_id: u64,
    /// Hits in creation order.
    pub hits: Vec<Hit>,
    /// Counters of the event.
    pub statistics: AggregationStatistics,
}

impl EventHits {
    /// Total energy over all hits of the event.
    #[must_use]
    pub fn total_energy(&self) -> f64 {
        self.hits.iter().map(|h| h.energy).sum()
    }
}

/// Runs one event through `aggregator`.
///
/// Registers the event's primaries, feeds every deposit in order and
/// collects the hits. Outcomes that ask for a track to be killed are only
/// counted; replayed traces already reflect the transport decision.
///
/// # Errors
/// Propagates the first deposit error; the aggregator is left mid-event.
pub fn aggregate_event(
    aggregator: &mut HitAggregator,
    event: &SimulatedEvent,
) -> Result<EventHits> {
    aggregator.begin_event();
    for primary in &event.primaries {
        aggregator
            .lineage_mut()
            .register_primary(primary.track_id, primary.tag);
    }
    for deposit in &event.deposits {
        aggregator.process_deposit(deposit)?;
    }
    let statistics = aggregator.statistics();
    let hits = aggregator.end_event().into_vec();
    Ok(EventHits {
        event_id: event.event_id,
        hits,
        statistics,
    })
}

/// Aggregates events one after another with a single aggregator.
///
/// # Errors
/// Returns a configuration error or the first deposit error.
pub fn aggregate_events<'a, I>(config: &AggregatorConfig, events: I) -> Result<Vec<EventHits>>
where
    I: IntoIterator<Item = &'a SimulatedEvent>,
{
    let mut aggregator = HitAggregator::new(config.clone())?;
    events
        .into_iter()
        .map(|event| aggregate_event(&mut aggregator, event))
        .collect()
}

/// Aggregates events in parallel, one aggregator per worker.
///
/// Results are returned in input order and are identical to
/// [`aggregate_events`].
///
/// # Errors
/// Returns a configuration error or the first deposit error.
pub fn aggregate_events_parallel(
    config: &AggregatorConfig,
    events: &[SimulatedEvent],
) -> Result<Vec<EventHits>> {
    config.validate()?;
    events
        .par_iter()
        .map_init(
            || HitAggregator::from_validated(config.clone()),
            |aggregator, event| aggregate_event(aggregator, event),
        )
        .collect()
}

/// Sums the statistics of several events.
#[must_use]
pub fn total_statistics(events: &[EventHits]) -> AggregationStatistics {
    let mut total = AggregationStatistics::default();
    for event in events {
        total += event.statistics;
    }
    total
}
