//! Energy-deposit steps delivered by the transport engine.

use crate::ThreeVector;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Track identifier assigned by the transport engine.
pub type TrackId = i32;

/// Parent track id carried by user-generated (primary) particles.
pub const PRIMARY_PARENT_ID: TrackId = 0;

/// Kinematic state at one end of a simulation step.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct StepPoint {
    /// Global position.
    pub position: ThreeVector,
    /// Momentum.
    pub momentum: ThreeVector,
    /// Polarization.
    pub polarization: ThreeVector,
}

impl StepPoint {
    /// Creates a step point.
    #[must_use]
    pub fn new(position: ThreeVector, momentum: ThreeVector, polarization: ThreeVector) -> Self {
        Self {
            position,
            momentum,
            polarization,
        }
    }
}

/// One simulated step in which a particle may deposit energy in a sensitive
/// volume.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize), serde(default))]
pub struct DepositEvent {
    /// Total energy deposited in the step (MeV). Zero is a valid no-op.
    pub edep: f64,
    /// Global time at the pre-step point (ns).
    pub time: f64,
    /// Pre-step kinematics.
    pub pre: StepPoint,
    /// Post-step kinematics.
    pub post: StepPoint,
    /// Copy number of the sensitive volume.
    pub volume_id: usize,
    /// Track that made the step.
    pub track_id: TrackId,
    /// PDG encoding of the particle.
    pub pdg: i32,
    /// Name of the process that limited the step.
    pub process: String,
    /// Parent track id (0 for primaries).
    pub parent_track_id: TrackId,
    /// Kinetic energy of the track (MeV).
    pub kinetic_energy: f64,
}

impl DepositEvent {
    /// Creates a deposit with the essential fields set and all kinematics
    /// zeroed. Further fields are filled with the `with_*` setters.
    #[must_use]
    pub fn new(volume_id: usize, time: f64, edep: f64) -> Self {
        Self {
            edep,
            time,
            volume_id,
            ..Default::default()
        }
    }

    /// Sets the track, its parent and the particle type.
    #[must_use]
    pub fn with_track(mut self, track_id: TrackId, parent_track_id: TrackId, pdg: i32) -> Self {
        self.track_id = track_id;
        self.parent_track_id = parent_track_id;
        self.pdg = pdg;
        self
    }

    /// Sets the step-limiting process name.
    #[must_use]
    pub fn with_process(mut self, process: impl Into<String>) -> Self {
        self.process = process.into();
        self
    }

    /// Sets the pre-step kinematics.
    #[must_use]
    pub fn with_pre(mut self, pre: StepPoint) -> Self {
        self.pre = pre;
        self
    }

    /// Sets the post-step kinematics.
    #[must_use]
    pub fn with_post(mut self, post: StepPoint) -> Self {
        self.post = post;
        self
    }

    /// Sets the post-step position only.
    #[must_use]
    pub fn with_post_position(mut self, position: ThreeVector) -> Self {
        self.post.position = position;
        self
    }

    /// Sets the track kinetic energy.
    #[must_use]
    pub fn with_kinetic_energy(mut self, kinetic_energy: f64) -> Self {
        self.kinetic_energy = kinetic_energy;
        self
    }

    /// True for user-generated particles.
    #[inline]
    #[must_use]
    pub fn is_primary(&self) -> bool {
        self.parent_track_id == PRIMARY_PARENT_ID
    }

    /// Absolute change of the squared momentum across the step.
    #[inline]
    #[must_use]
    pub fn momentum_transfer(&self) -> f64 {
        (self.post.momentum.mag2() - self.pre.momentum.mag2()).abs()
    }
}
