//! scintsim-core: Core types for deposit-to-hit aggregation.
//!
//! This crate provides the data model shared by the aggregation engine and
//! its collaborators: deposit steps, hit records, the per-event hit arena,
//! aggregator configuration, and the gamma-multiplicity lineage tracker.
//!

pub mod config;
pub mod deposit;
pub mod error;
pub mod event;
pub mod hit;
pub mod lineage;
pub mod vector;

pub use config::AggregatorConfig;
pub use deposit::{DepositEvent, StepPoint, TrackId, PRIMARY_PARENT_ID};
pub use error::{Error, Result};
pub use event::{PrimaryParticle, SimulatedEvent};
pub use hit::{Hit, HitCollection, HitId};
pub use lineage::{DecayNode, DecayTreeObserver, LineageConstants, LineageTag, LineageTracker};
pub use vector::ThreeVector;
