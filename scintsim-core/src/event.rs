//! Recorded simulated events used for replay.

use crate::{DepositEvent, LineageTag, TrackId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Primary particle as handed over by the generator.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct PrimaryParticle {
    pub track_id: TrackId,
    pub tag: LineageTag,
}

/// All inputs of one simulated event: its primaries and the deposit steps in
/// the order the transport engine produced them.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SimulatedEvent {
    pub event_id: u64,
    #[cfg_attr(feature = "serde", serde(default))]
    pub primaries: Vec<PrimaryParticle>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub deposits: Vec<DepositEvent>,
}

impl SimulatedEvent {
    /// Creates an empty event.
    #[must_use]
    pub fn new(event_id: u64) -> Self {
        Self {
            event_id,
            ..Default::default()
        }
    }

    /// Adds a tagged primary.
    #[must_use]
    pub fn with_primary(mut self, track_id: TrackId, tag: LineageTag) -> Self {
        self.primaries.push(PrimaryParticle { track_id, tag });
        self
    }

    /// Appends a deposit step.
    #[must_use]
    pub fn with_deposit(mut self, deposit: DepositEvent) -> Self {
        self.deposits.push(deposit);
        self
    }

    /// Sum of deposited energy over all steps.
    #[must_use]
    pub fn deposited_energy(&self) -> f64 {
        self.deposits.iter().map(|d| d.edep).sum()
    }
}
