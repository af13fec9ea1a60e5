use scintsim_aggregation::{
    aggregate_event, aggregate_events, aggregate_events_parallel, total_statistics, HitAggregator,
};
use scintsim_core::{AggregatorConfig, DepositEvent, Error, LineageTag, SimulatedEvent};

fn generate_events(count: u64) -> Vec<SimulatedEvent> {
    (0..count)
        .map(|id| {
            let base = id as f64;
            let mut event = SimulatedEvent::new(id).with_primary(1, LineageTag::new(2, 1));
            for step in 0..6_u32 {
                let volume = (step % 3) as usize;
                let time = base + f64::from(step) * 0.2;
                event = event.with_deposit(
                    DepositEvent::new(volume, time, 0.1 + f64::from(step) * 0.05)
                        .with_track(1, 0, 22)
                        .with_process("compt"),
                );
            }
            // Identical timestamp in every event: must never merge across events.
            event.with_deposit(
                DepositEvent::new(2, 0.0, 0.3)
                    .with_track(5, 1, 11)
                    .with_process("eIoni"),
            )
        })
        .collect()
}

#[test]
fn test_parallel_matches_sequential() {
    let config = AggregatorConfig::new(4, 0.5);
    let events = generate_events(64);

    let sequential = aggregate_events(&config, &events).unwrap();
    let parallel = aggregate_events_parallel(&config, &events).unwrap();

    assert_eq!(sequential.len(), 64);
    assert_eq!(sequential, parallel);
    for (event, hits) in events.iter().zip(&parallel) {
        assert_eq!(event.event_id, hits.event_id);
        assert!((event.deposited_energy() - hits.total_energy()).abs() < 1e-9);
    }
}

#[test]
fn test_events_do_not_leak_state() {
    let config = AggregatorConfig::new(4, 0.5);
    let events = generate_events(2);
    let mut aggregator = HitAggregator::new(config).unwrap();

    let first = aggregate_event(&mut aggregator, &events[0]).unwrap();
    let second = aggregate_event(&mut aggregator, &events[1]).unwrap();

    assert_eq!(first.hits.len(), second.hits.len());
    assert_eq!(
        first.hits.iter().map(|h| h.gen_multiplicity).collect::<Vec<_>>(),
        second.hits.iter().map(|h| h.gen_multiplicity).collect::<Vec<_>>()
    );
}

#[test]
fn test_total_statistics() {
    let config = AggregatorConfig::new(4, 0.5);
    let results = aggregate_events(&config, &generate_events(3)).unwrap();
    let total = total_statistics(&results);
    assert_eq!(total.deposits_processed, 21);
    assert_eq!(total.accepted(), 21);
}

#[test]
fn test_invalid_config_reported() {
    let config = AggregatorConfig::new(4, -1.0);
    let result = aggregate_events_parallel(&config, &generate_events(1));
    assert!(matches!(result, Err(Error::ConfigError(_))));
}

#[test]
fn test_deposit_error_propagates() {
    let config = AggregatorConfig::new(1, 0.5);
    let result = aggregate_events_parallel(&config, &generate_events(4));
    assert!(matches!(result, Err(Error::VolumeOutOfRange { volume_id: 2, .. })));
}
