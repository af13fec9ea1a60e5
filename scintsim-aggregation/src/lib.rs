//! scintsim-aggregation: Deposit-to-hit aggregation.
//!
//! This crate turns the stream of energy-deposit steps of a simulated event
//! into hits:
//! - **Merge state** - last opened hit per sensitive volume
//! - **Aggregator** - half-open time-window merge with energy-weighted
//!   accumulation and lineage stamping
//! - **Drivers** - single-event, sequential and rayon-parallel replay
//!
#![warn(missing_docs)]

mod aggregator;
pub mod merge_state;
mod processing;
mod statistics;

pub use aggregator::{DepositOutcome, HitAggregator};
pub use merge_state::{MergeState, VolumeSlot};
pub use processing::{
    aggregate_event, aggregate_events, aggregate_events_parallel, total_statistics, EventHits,
};
pub use statistics::AggregationStatistics;

// Re-export core types used in the aggregator's API
pub use scintsim_core::{AggregatorConfig, DepositEvent, Hit, HitCollection, HitId};
