//! Aggregated hit records and the per-event hit collection.

use crate::vector::weighted_mean;
use crate::{DepositEvent, ThreeVector, TrackId};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Index of a hit inside the collection of the current event.
///
/// Ids are assigned in insertion order and are only meaningful within the
/// event that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HitId(pub usize);

impl HitId {
    /// Returns the raw index.
    #[inline]
    #[must_use]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One or more deposits in a single sensitive volume, merged by time
/// proximity.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Hit {
    /// Sum of all merged deposits (MeV).
    pub energy: f64,
    /// Number of merged deposits.
    pub interactions: u32,
    /// Energy-weighted mean time (ns).
    pub time: f64,
    /// Energy-weighted mean post-step position.
    pub position: ThreeVector,
    /// Sensitive volume copy number.
    pub volume_id: usize,
    /// Track that opened the hit.
    pub track_id: TrackId,
    /// PDG code of the track that opened the hit.
    pub pdg: i32,
    /// Process of the opening step.
    pub process: String,
    /// Pre-step polarization of the opening deposit.
    pub polarization_in: ThreeVector,
    /// Pre-step momentum of the opening deposit.
    pub momentum_in: ThreeVector,
    /// Post-step polarization of the latest merged deposit.
    pub polarization_out: ThreeVector,
    /// Post-step momentum of the latest merged deposit.
    pub momentum_out: ThreeVector,
    /// Generation multiplicity at creation time (0 when untagged).
    pub gen_multiplicity: i64,
    /// Generation index at creation time (0 when untagged).
    pub gen_index: i32,
}

impl Hit {
    /// Opens a hit from a single deposit.
    ///
    /// Lineage fields start at zero; the aggregator stamps them afterwards.
    #[must_use]
    pub fn from_deposit(deposit: &DepositEvent) -> Self {
        Self {
            energy: deposit.edep,
            interactions: 1,
            time: deposit.time,
            position: deposit.post.position,
            volume_id: deposit.volume_id,
            track_id: deposit.track_id,
            pdg: deposit.pdg,
            process: deposit.process.clone(),
            polarization_in: deposit.pre.polarization,
            momentum_in: deposit.pre.momentum,
            polarization_out: deposit.post.polarization,
            momentum_out: deposit.post.momentum,
            gen_multiplicity: 0,
            gen_index: 0,
        }
    }

    /// Folds a further deposit into this hit.
    ///
    /// Time and position are averaged with the accumulated energy from
    /// before the update and the new deposit's energy as weights. Fields set
    /// at creation are left untouched.
    pub fn absorb(&mut self, deposit: &DepositEvent) {
        let previous = self.energy;
        self.time = weighted_mean(self.time, previous, deposit.time, deposit.edep);
        self.position = self
            .position
            .weighted_mean(previous, deposit.post.position, deposit.edep);
        self.energy = previous + deposit.edep;
        self.interactions += 1;
        self.polarization_out = deposit.post.polarization;
        self.momentum_out = deposit.post.momentum;
    }
}

/// Insertion-ordered arena of hits for one event.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct HitCollection {
    hits: Vec<Hit>,
}

impl HitCollection {
    /// Creates an empty collection.
    #[must_use]
    pub fn new() -> Self {
        Self { hits: Vec::new() }
    }

    /// Creates a collection with pre-allocated capacity.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            hits: Vec::with_capacity(capacity),
        }
    }

    /// Appends a hit and returns its id.
    pub fn insert(&mut self, hit: Hit) -> HitId {
        let id = HitId(self.hits.len());
        self.hits.push(hit);
        id
    }

    /// Returns the hit with the given id.
    #[must_use]
    pub fn get(&self, id: HitId) -> Option<&Hit> {
        self.hits.get(id.0)
    }

    /// Returns the hit with the given id mutably.
    pub fn get_mut(&mut self, id: HitId) -> Option<&mut Hit> {
        self.hits.get_mut(id.0)
    }

    /// Returns the number of hits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hits.len()
    }

    /// Returns true if no hit was recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }

    /// Removes all hits, keeping the allocation.
    pub fn clear(&mut self) {
        self.hits.clear();
    }

    /// Returns an iterator over the hits in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Hit> {
        self.hits.iter()
    }

    /// Returns the hits as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Hit] {
        &self.hits
    }

    /// Total energy over all hits.
    #[must_use]
    pub fn total_energy(&self) -> f64 {
        self.hits.iter().map(|h| h.energy).sum()
    }

    /// Consumes the collection, returning the hits.
    #[must_use]
    pub fn into_vec(self) -> Vec<Hit> {
        self.hits
    }
}

impl std::ops::Index<HitId> for HitCollection {
    type Output = Hit;

    fn index(&self, id: HitId) -> &Hit {
        &self.hits[id.0]
    }
}

impl<'a> IntoIterator for &'a HitCollection {
    type Item = &'a Hit;
    type IntoIter = std::slice::Iter<'a, Hit>;

    fn into_iter(self) -> Self::IntoIter {
        self.hits.iter()
    }
}
