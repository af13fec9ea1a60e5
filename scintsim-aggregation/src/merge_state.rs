//! Per-volume merge bookkeeping.

use scintsim_core::{Error, HitId, Result};

/// Last unmerged hit of one sensitive volume.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VolumeSlot {
    /// Hit opened most recently in this volume.
    pub hit: Option<HitId>,
    /// Time of the deposit that opened `hit` (ns).
    pub time: f64,
}

/// One slot per sensitive volume, indexed by copy number.
///
/// Slots store ids into the event's hit collection, never the hits
/// themselves.
#[derive(Debug, Clone)]
pub struct MergeState {
    slots: Vec<VolumeSlot>,
}

impl MergeState {
    /// Creates state for volume ids `0..slot_count`.
    #[must_use]
    pub fn new(slot_count: usize) -> Self {
        Self {
            slots: vec![VolumeSlot::default(); slot_count],
        }
    }

    /// Forgets every recorded hit.
    pub fn reset(&mut self) {
        self.slots.fill(VolumeSlot::default());
    }

    /// Number of slots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// True if there are no slots.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Checks that `volume_id` addresses a slot.
    ///
    /// # Errors
    /// Returns [`Error::VolumeOutOfRange`] otherwise.
    pub fn check(&self, volume_id: usize) -> Result<()> {
        if volume_id < self.slots.len() {
            Ok(())
        } else {
            Err(Error::VolumeOutOfRange {
                volume_id,
                volume_count: self.slots.len().saturating_sub(1),
            })
        }
    }

    /// Returns the slot of a volume.
    #[must_use]
    pub fn slot(&self, volume_id: usize) -> Option<&VolumeSlot> {
        self.slots.get(volume_id)
    }

    /// Returns the hit a deposit at `time` should merge into, if any.
    ///
    /// The window is half-open: a gap strictly below `window` merges.
    #[must_use]
    pub fn merge_target(&self, volume_id: usize, time: f64, window: f64) -> Option<HitId> {
        let slot = self.slots.get(volume_id)?;
        let hit = slot.hit?;
        ((slot.time - time).abs() < window).then_some(hit)
    }

    /// Records a freshly opened hit for a volume.
    pub fn record(&mut self, volume_id: usize, hit: HitId, time: f64) {
        if let Some(slot) = self.slots.get_mut(volume_id) {
            slot.hit = Some(hit);
            slot.time = time;
        }
    }

    /// Number of volumes that currently hold an open hit.
    #[must_use]
    pub fn occupied(&self) -> usize {
        self.slots.iter().filter(|s| s.hit.is_some()).count()
    }
}
