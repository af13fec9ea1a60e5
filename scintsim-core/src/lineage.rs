//! Gamma-multiplicity lineage tracking.
//!
//! Every primary particle enters the event with a [`LineageTag`] supplied by
//! the generator. When the primary opens a hit the tag is copied onto the
//! hit and the primary's multiplicity is advanced by the scattering offset,
//! so later hits of the same primary are distinguishable from its first one.
//! Secondaries inherit the active branch multiplied by the secondary factor.
//!
//! The decay tree maps each multiplicity value (node id) to the track that
//! produced it. It only grows during an event and is discarded by
//! [`LineageTracker::reset`].

use std::collections::HashMap;
use std::fmt;

use crate::TrackId;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Lineage tuple attached to a primary particle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineageTag {
    /// Generation class (e.g. 2 or 3 for annihilation gammas, 1 for prompt).
    pub multiplicity: i64,
    /// Index of the particle within its generation.
    pub index: i32,
}

impl LineageTag {
    /// Creates a lineage tag.
    #[must_use]
    pub fn new(multiplicity: i64, index: i32) -> Self {
        Self {
            multiplicity,
            index,
        }
    }
}

/// Constants steering how multiplicities evolve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct LineageConstants {
    /// Added to a primary's multiplicity each time it opens a hit.
    pub scattering_offset: i64,
    /// Factor applied to the active branch for secondary particles.
    pub secondary_multiplication: i64,
    /// Multiplicity assigned to primaries that interact without depositing.
    pub background: i64,
}

impl Default for LineageConstants {
    fn default() -> Self {
        Self {
            scattering_offset: 10,
            secondary_multiplication: 100,
            background: 0,
        }
    }
}

impl LineageConstants {
    /// Constants of the reduced detector model: fixed offset of 100.
    #[must_use]
    pub fn simple() -> Self {
        Self {
            scattering_offset: 100,
            ..Self::default()
        }
    }
}

/// A node of the decay tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct DecayNode {
    /// Multiplicity value identifying the node.
    pub id: i64,
    /// Track that produced the node.
    pub track_id: TrackId,
}

/// Receives lineage advancement notifications.
///
/// Implementations are purely observational; hit aggregation does not
/// depend on them.
pub trait DecayTreeObserver: Send {
    /// Called whenever a branch `parent` is extended to `multiplicity` by
    /// `track_id`.
    fn on_lineage_advanced(&mut self, parent: i64, multiplicity: i64, track_id: TrackId);
}

/// Event-scoped lineage state.
#[derive(Default)]
pub struct LineageTracker {
    constants: LineageConstants,
    primaries: HashMap<TrackId, LineageTag>,
    current_branch: i64,
    decay_tree: Vec<DecayNode>,
    observer: Option<Box<dyn DecayTreeObserver>>,
}

impl fmt::Debug for LineageTracker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineageTracker")
            .field("constants", &self.constants)
            .field("primaries", &self.primaries)
            .field("current_branch", &self.current_branch)
            .field("decay_tree", &self.decay_tree)
            .field("observer", &self.observer.is_some())
            .finish()
    }
}

impl LineageTracker {
    /// Creates an empty tracker.
    #[must_use]
    pub fn new(constants: LineageConstants) -> Self {
        Self {
            constants,
            ..Self::default()
        }
    }

    /// Attaches an observer notified on every lineage advancement.
    pub fn set_observer(&mut self, observer: Box<dyn DecayTreeObserver>) {
        self.observer = Some(observer);
    }

    /// Detaches and returns the observer, if any.
    pub fn take_observer(&mut self) -> Option<Box<dyn DecayTreeObserver>> {
        self.observer.take()
    }

    /// Returns the lineage constants.
    #[must_use]
    pub fn constants(&self) -> &LineageConstants {
        &self.constants
    }

    /// Discards all event-scoped state.
    pub fn reset(&mut self) {
        self.primaries.clear();
        self.current_branch = 0;
        self.decay_tree.clear();
    }

    /// Attaches the generator-supplied tag to a primary track.
    ///
    /// Registering the same track twice replaces the earlier tag.
    pub fn register_primary(&mut self, track_id: TrackId, tag: LineageTag) {
        self.primaries.insert(track_id, tag);
    }

    /// Returns the current lineage of a primary track.
    #[must_use]
    pub fn tag_primary(&self, track_id: TrackId) -> Option<LineageTag> {
        self.primaries.get(&track_id).copied()
    }

    /// Number of primaries with a registered tag.
    #[must_use]
    pub fn primary_count(&self) -> usize {
        self.primaries.len()
    }

    /// Advances a primary after it scattered in an active volume.
    ///
    /// Returns the new multiplicity, or `None` if the track carries no tag.
    pub fn mark_scattered(&mut self, track_id: TrackId) -> Option<i64> {
        let offset = self.constants.scattering_offset;
        let tag = self.primaries.get_mut(&track_id)?;
        let parent = tag.multiplicity;
        tag.multiplicity = parent.saturating_add(offset);
        let advanced = tag.multiplicity;

        self.decay_tree.push(DecayNode {
            id: advanced,
            track_id,
        });
        self.current_branch = advanced;
        if let Some(observer) = self.observer.as_mut() {
            observer.on_lineage_advanced(parent, advanced, track_id);
        }
        log::trace!("primary {track_id} scattered: multiplicity {parent} -> {advanced}");
        Some(advanced)
    }

    /// Marks a primary as having interacted without depositing energy.
    ///
    /// Returns false if the track carries no tag.
    pub fn mark_background(&mut self, track_id: TrackId) -> bool {
        let background = self.constants.background;
        match self.primaries.get_mut(&track_id) {
            Some(tag) => {
                tag.multiplicity = background;
                log::trace!("primary {track_id} classified as background");
                true
            }
            None => false,
        }
    }

    /// Derives the multiplicity of a secondary track from the active branch
    /// and makes it the new active branch.
    pub fn derive_secondary_multiplicity(&mut self, track_id: TrackId) -> i64 {
        let parent = self.current_branch();
        let derived = parent.saturating_mul(self.constants.secondary_multiplication);
        self.decay_tree.push(DecayNode {
            id: derived,
            track_id,
        });
        self.set_current_branch(derived);
        if let Some(observer) = self.observer.as_mut() {
            observer.on_lineage_advanced(parent, derived, track_id);
        }
        derived
    }

    /// Returns the active branch value.
    #[must_use]
    pub fn current_branch(&self) -> i64 {
        self.current_branch
    }

    /// Overrides the active branch value.
    pub fn set_current_branch(&mut self, value: i64) {
        self.current_branch = value;
    }

    /// Decay tree nodes in insertion order.
    #[must_use]
    pub fn decay_tree(&self) -> &[DecayNode] {
        &self.decay_tree
    }

    /// Track that most recently produced node `id`.
    #[must_use]
    pub fn node(&self, id: i64) -> Option<TrackId> {
        self.decay_tree
            .iter()
            .rev()
            .find(|node| node.id == id)
            .map(|node| node.track_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::{Arc, Mutex};

    #[derive(Default, Clone)]
    struct Recorder(Arc<Mutex<Vec<(i64, i64, TrackId)>>>);

    impl DecayTreeObserver for Recorder {
        fn on_lineage_advanced(&mut self, parent: i64, multiplicity: i64, track_id: TrackId) {
            self.0.lock().unwrap().push((parent, multiplicity, track_id));
        }
    }

    #[test]
    fn test_register_and_tag() {
        let mut tracker = LineageTracker::new(LineageConstants::default());
        tracker.register_primary(1, LineageTag::new(2, 1));
        assert_eq!(tracker.tag_primary(1), Some(LineageTag::new(2, 1)));
        assert_eq!(tracker.tag_primary(2), None);
    }

    #[test]
    fn test_mark_scattered_advances_every_call() {
        let mut tracker = LineageTracker::new(LineageConstants::default());
        tracker.register_primary(1, LineageTag::new(3, 2));

        assert_eq!(tracker.mark_scattered(1), Some(13));
        assert_eq!(tracker.mark_scattered(1), Some(23));
        assert_eq!(tracker.tag_primary(1).map(|t| t.index), Some(2));
        assert_eq!(tracker.current_branch(), 23);
        assert_eq!(tracker.node(13), Some(1));
        assert_eq!(tracker.decay_tree().len(), 2);
    }

    #[test]
    fn test_mark_scattered_untagged() {
        let mut tracker = LineageTracker::new(LineageConstants::default());
        assert_eq!(tracker.mark_scattered(5), None);
        assert!(tracker.decay_tree().is_empty());
    }

    #[test]
    fn test_secondary_reads_branch_before_write() {
        let mut tracker = LineageTracker::new(LineageConstants::default());
        let recorder = Recorder::default();
        tracker.set_observer(Box::new(recorder.clone()));
        tracker.register_primary(1, LineageTag::new(2, 1));
        tracker.mark_scattered(1);

        let derived = tracker.derive_secondary_multiplicity(4);
        assert_eq!(derived, 1200);
        assert_eq!(tracker.current_branch(), 1200);
        assert_eq!(tracker.node(1200), Some(4));
        assert_eq!(*recorder.0.lock().unwrap(), vec![(2, 12, 1), (12, 1200, 4)]);
    }

    #[test]
    fn test_secondary_multiplication_saturates() {
        let mut tracker = LineageTracker::new(LineageConstants::default());
        tracker.set_current_branch(i64::MAX / 2);
        assert_eq!(tracker.derive_secondary_multiplicity(9), i64::MAX);
    }

    #[test]
    fn test_background() {
        let mut tracker = LineageTracker::new(LineageConstants::default());
        tracker.register_primary(1, LineageTag::new(2, 1));
        assert!(tracker.mark_background(1));
        assert_eq!(tracker.tag_primary(1).map(|t| t.multiplicity), Some(0));
        assert!(!tracker.mark_background(2));
    }

    #[test]
    fn test_reset() {
        let mut tracker = LineageTracker::new(LineageConstants::simple());
        tracker.register_primary(1, LineageTag::new(2, 1));
        assert_eq!(tracker.mark_scattered(1), Some(102));
        tracker.reset();
        assert_eq!(tracker.primary_count(), 0);
        assert_eq!(tracker.current_branch(), 0);
        assert!(tracker.decay_tree().is_empty());
    }
}
