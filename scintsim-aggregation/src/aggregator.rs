//! Time-windowed deposit-to-hit aggregation.
//!
//! Key characteristics:
//! - One merge slot per sensitive volume holding the id of the last hit
//!   opened there and the time of its opening deposit
//! - Deposits within the merge window of that time fold into the hit with
//!   energy-weighted time and position; anything else opens a new hit
//! - New hits are stamped with lineage taken from the [`LineageTracker`]
//! - All state is event scoped and cleared by [`HitAggregator::begin_event`]

use crate::merge_state::MergeState;
use crate::statistics::AggregationStatistics;
use scintsim_core::{
    AggregatorConfig, DecayTreeObserver, DepositEvent, Error, Hit, HitCollection, HitId,
    LineageTracker, Result,
};

/// What a deposit step did to the hit collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DepositOutcome {
    /// A new hit was opened.
    Created(HitId),
    /// The deposit was folded into an existing hit.
    Merged(HitId),
    /// No energy was deposited.
    NoDeposit,
    /// No energy was deposited, but the primary interacted and was marked
    /// as background.
    Background,
    /// The primary exceeded the energy cut; the caller should stop
    /// transporting the track and its secondaries.
    Killed,
}

impl DepositOutcome {
    /// True if the deposit created or updated a hit.
    #[must_use]
    pub fn is_accepted(self) -> bool {
        matches!(self, Self::Created(_) | Self::Merged(_))
    }

    /// True if the transport engine should kill the track.
    #[must_use]
    pub fn should_kill_track(self) -> bool {
        matches!(self, Self::Killed)
    }

    /// The hit that was created or updated.
    #[must_use]
    pub fn hit_id(self) -> Option<HitId> {
        match self {
            Self::Created(id) | Self::Merged(id) => Some(id),
            _ => None,
        }
    }
}

/// Aggregates deposit steps of one event into hits.
///
/// An instance must only be driven by one thread of control; parallel event
/// processing uses one aggregator per worker.
#[derive(Debug)]
pub struct HitAggregator {
    config: AggregatorConfig,
    merge_state: MergeState,
    lineage: LineageTracker,
    hits: HitCollection,
    statistics: AggregationStatistics,
}

impl HitAggregator {
    /// Creates an aggregator ready to process the first event.
    ///
    /// # Errors
    /// Returns a configuration error if `config` fails validation.
    pub fn new(config: AggregatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_validated(config))
    }

    pub(crate) fn from_validated(config: AggregatorConfig) -> Self {
        Self {
            merge_state: MergeState::new(config.slot_count()),
            lineage: LineageTracker::new(config.lineage),
            hits: HitCollection::new(),
            statistics: AggregationStatistics::default(),
            config,
        }
    }

    /// Attaches a decay-tree observer.
    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn DecayTreeObserver>) -> Self {
        self.lineage.set_observer(observer);
        self
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &AggregatorConfig {
        &self.config
    }

    /// Hits recorded so far in the current event.
    #[must_use]
    pub fn hits(&self) -> &HitCollection {
        &self.hits
    }

    /// Lineage state of the current event.
    #[must_use]
    pub fn lineage(&self) -> &LineageTracker {
        &self.lineage
    }

    /// Mutable lineage state, used by the generator to register primaries.
    pub fn lineage_mut(&mut self) -> &mut LineageTracker {
        &mut self.lineage
    }

    /// Per-volume merge state of the current event.
    #[must_use]
    pub fn merge_state(&self) -> &MergeState {
        &self.merge_state
    }

    /// Counters of the current event.
    #[must_use]
    pub fn statistics(&self) -> AggregationStatistics {
        self.statistics
    }

    /// Starts a new event, discarding all event-scoped state.
    pub fn begin_event(&mut self) {
        self.merge_state.reset();
        self.lineage.reset();
        self.hits.clear();
        self.statistics = AggregationStatistics::default();
    }

    /// Ends the event and hands over its hits.
    ///
    /// The merge state is cleared since its ids refer to the returned
    /// collection. Lineage state and statistics stay readable until the next
    /// [`begin_event`](Self::begin_event), which must be called before the
    /// next event's first deposit.
    pub fn end_event(&mut self) -> HitCollection {
        self.merge_state.reset();
        log::debug!(
            "event closed: {} hits from {} deposits",
            self.hits.len(),
            self.statistics.deposits_processed
        );
        std::mem::take(&mut self.hits)
    }

    /// Processes one deposit step.
    ///
    /// Every event must be opened with [`begin_event`](Self::begin_event).
    /// [`end_event`](Self::end_event) alone is not an event boundary: the
    /// active lineage branch and the counters survive it, and secondaries of
    /// the next event would derive from the stale branch.
    ///
    /// # Errors
    /// Returns [`Error::VolumeOutOfRange`] if the volume id exceeds the
    /// configured volume count, [`Error::InvalidEnergy`] for negative or
    /// non-finite deposits and [`Error::NonFiniteDeposit`] for a non-finite
    /// time or post-step position. No state changes in any of these cases.
    pub fn process_deposit(&mut self, deposit: &DepositEvent) -> Result<DepositOutcome> {
        self.merge_state.check(deposit.volume_id)?;

        if deposit.is_primary() {
            if let Some(cut) = self.config.active_energy_cut() {
                if deposit.kinetic_energy > cut {
                    self.statistics.deposits_processed += 1;
                    self.statistics.tracks_killed += 1;
                    log::debug!(
                        "killing primary {} with kinetic energy {} above cut {cut}",
                        deposit.track_id,
                        deposit.kinetic_energy
                    );
                    return Ok(DepositOutcome::Killed);
                }
            }
        }

        if !deposit.edep.is_finite() || deposit.edep < 0.0 {
            return Err(Error::InvalidEnergy(deposit.edep));
        }
        if !deposit.time.is_finite() {
            return Err(Error::NonFiniteDeposit { field: "time" });
        }
        let position = deposit.post.position;
        if !(position.x.is_finite() && position.y.is_finite() && position.z.is_finite()) {
            return Err(Error::NonFiniteDeposit {
                field: "post-step position",
            });
        }
        self.statistics.deposits_processed += 1;

        if deposit.edep <= 0.0 {
            return Ok(self.classify_zero_energy(deposit));
        }

        if let Some(id) = self.merge_state.merge_target(
            deposit.volume_id,
            deposit.time,
            self.config.time_window_ns,
        ) {
            if let Some(hit) = self.hits.get_mut(id) {
                hit.absorb(deposit);
                self.statistics.deposits_merged += 1;
                log::trace!(
                    "volume {}: merged {} MeV into hit {}",
                    deposit.volume_id,
                    deposit.edep,
                    id.index()
                );
                return Ok(DepositOutcome::Merged(id));
            }
        }

        let id = self.open_hit(deposit);
        Ok(DepositOutcome::Created(id))
    }

    fn classify_zero_energy(&mut self, deposit: &DepositEvent) -> DepositOutcome {
        self.statistics.zero_energy_steps += 1;

        let Some(threshold) = self.config.allowed_momentum_transfer else {
            return DepositOutcome::NoDeposit;
        };
        // Interaction without deposit, e.g. Rayleigh scattering.
        if deposit.is_primary()
            && deposit.momentum_transfer() > threshold
            && self.lineage.mark_background(deposit.track_id)
        {
            self.statistics.background_interactions += 1;
            return DepositOutcome::Background;
        }
        DepositOutcome::NoDeposit
    }

    fn open_hit(&mut self, deposit: &DepositEvent) -> HitId {
        let mut hit = Hit::from_deposit(deposit);

        if deposit.is_primary() {
            // Primaries without a registered tag stay untagged.
            if let Some(tag) = self.lineage.tag_primary(deposit.track_id) {
                hit.gen_multiplicity = tag.multiplicity;
                hit.gen_index = tag.index;
                self.lineage.mark_scattered(deposit.track_id);
            }
        } else {
            hit.gen_multiplicity = self.lineage.derive_secondary_multiplicity(deposit.track_id);
        }

        let id = self.hits.insert(hit);
        self.merge_state.record(deposit.volume_id, id, deposit.time);
        self.statistics.hits_created += 1;
        log::trace!(
            "volume {}: opened hit {} at {} ns",
            deposit.volume_id,
            id.index(),
            deposit.time
        );
        id
    }
}
