//! Aggregation counters.

use std::ops::AddAssign;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Counters collected while aggregating deposits.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AggregationStatistics {
    /// Deposit steps handed to the aggregator.
    pub deposits_processed: usize,
    /// Hits opened.
    pub hits_created: usize,
    /// Deposits folded into an existing hit.
    pub deposits_merged: usize,
    /// Steps without deposited energy.
    pub zero_energy_steps: usize,
    /// Zero-energy steps classified as background interactions.
    pub background_interactions: usize,
    /// Primaries killed by the energy cut.
    pub tracks_killed: usize,
}

impl AggregationStatistics {
    /// Deposits that ended up in a hit.
    #[must_use]
    pub fn accepted(&self) -> usize {
        self.hits_created + self.deposits_merged
    }

    /// Mean number of deposits per hit.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn mean_interactions(&self) -> f64 {
        if self.hits_created == 0 {
            0.0
        } else {
            self.accepted() as f64 / self.hits_created as f64
        }
    }
}

impl AddAssign for AggregationStatistics {
    fn add_assign(&mut self, rhs: Self) {
        self.deposits_processed += rhs.deposits_processed;
        self.hits_created += rhs.hits_created;
        self.deposits_merged += rhs.deposits_merged;
        self.zero_energy_steps += rhs.zero_energy_steps;
        self.background_interactions += rhs.background_interactions;
        self.tracks_killed += rhs.tracks_killed;
    }
}
