//! Aggregator configuration.

use crate::{Error, LineageConstants, Result};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Configuration consumed by the hit aggregator at construction time.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct AggregatorConfig {
    /// Highest sensitive-volume copy number; merge state holds
    /// `volume_count + 1` slots.
    pub volume_count: usize,
    /// Deposits closer than this to a hit's opening deposit merge into it (ns).
    pub time_window_ns: f64,
    /// Kinetic-energy cut for primaries (MeV).
    pub energy_cut: Option<f64>,
    /// Kill primaries above `energy_cut` instead of recording their steps.
    pub kill_above_energy_cut: bool,
    /// Threshold on |Δp²| above which a zero-energy step of a primary is
    /// classified as a background interaction. `None` disables the check.
    pub allowed_momentum_transfer: Option<f64>,
    /// Lineage constants.
    pub lineage: LineageConstants,
}

impl Default for AggregatorConfig {
    fn default() -> Self {
        Self {
            volume_count: 1,
            time_window_ns: 5.0,
            energy_cut: None,
            kill_above_energy_cut: false,
            allowed_momentum_transfer: None,
            lineage: LineageConstants::default(),
        }
    }
}

impl AggregatorConfig {
    /// Creates a configuration for `volume_count` volumes and the given
    /// merge window, with all optional policies disabled.
    #[must_use]
    pub fn new(volume_count: usize, time_window_ns: f64) -> Self {
        Self {
            volume_count,
            time_window_ns,
            ..Self::default()
        }
    }

    /// Reduced detector model: no energy cut, no background classification
    /// and a fixed scattering offset of 100.
    #[must_use]
    pub fn simple(volume_count: usize, time_window_ns: f64) -> Self {
        Self {
            lineage: LineageConstants::simple(),
            ..Self::new(volume_count, time_window_ns)
        }
    }

    /// Sets the number of sensitive volumes.
    #[must_use]
    pub fn with_volume_count(mut self, volume_count: usize) -> Self {
        self.volume_count = volume_count;
        self
    }

    /// Sets the merge window.
    #[must_use]
    pub fn with_time_window_ns(mut self, window: f64) -> Self {
        self.time_window_ns = window;
        self
    }

    /// Enables the primary energy-cut kill policy.
    #[must_use]
    pub fn with_energy_cut(mut self, cut: f64) -> Self {
        self.energy_cut = Some(cut);
        self.kill_above_energy_cut = true;
        self
    }

    /// Enables background classification of non-depositing interactions.
    #[must_use]
    pub fn with_allowed_momentum_transfer(mut self, threshold: f64) -> Self {
        self.allowed_momentum_transfer = Some(threshold);
        self
    }

    /// Sets the lineage constants.
    #[must_use]
    pub fn with_lineage(mut self, lineage: LineageConstants) -> Self {
        self.lineage = lineage;
        self
    }

    /// Number of merge-state slots (volume ids `0..=volume_count`).
    #[must_use]
    pub fn slot_count(&self) -> usize {
        self.volume_count.saturating_add(1)
    }

    /// Energy above which primaries are killed, if the policy is active.
    #[must_use]
    pub fn active_energy_cut(&self) -> Option<f64> {
        if self.kill_above_energy_cut {
            self.energy_cut
        } else {
            None
        }
    }

    /// Checks that the configuration is usable.
    ///
    /// # Errors
    /// Returns [`Error::ConfigError`] describing the first invalid field.
    pub fn validate(&self) -> Result<()> {
        if self.volume_count == 0 {
            return Err(Error::ConfigError(
                "volume_count must be at least 1".to_string(),
            ));
        }
        if self.volume_count.checked_add(1).is_none() {
            return Err(Error::ConfigError(format!(
                "volume_count {} leaves no room for the merge slots",
                self.volume_count
            )));
        }
        if !self.time_window_ns.is_finite() || self.time_window_ns <= 0.0 {
            return Err(Error::ConfigError(format!(
                "time_window_ns must be a positive finite number, got {}",
                self.time_window_ns
            )));
        }
        if self.kill_above_energy_cut {
            match self.energy_cut {
                Some(cut) if cut.is_finite() && cut >= 0.0 => {}
                Some(cut) => {
                    return Err(Error::ConfigError(format!(
                        "energy_cut must be a non-negative finite number, got {cut}"
                    )))
                }
                None => {
                    return Err(Error::ConfigError(
                        "kill_above_energy_cut requires energy_cut".to_string(),
                    ))
                }
            }
        }
        if let Some(threshold) = self.allowed_momentum_transfer {
            if !threshold.is_finite() || threshold < 0.0 {
                return Err(Error::ConfigError(format!(
                    "allowed_momentum_transfer must be a non-negative finite number, got {threshold}"
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = AggregatorConfig::new(5, 0.5)
            .with_energy_cut(1.0)
            .with_allowed_momentum_transfer(1e-4);

        assert_eq!(config.volume_count, 5);
        assert_eq!(config.slot_count(), 6);
        assert!((config.time_window_ns - 0.5).abs() < f64::EPSILON);
        assert_eq!(config.active_energy_cut(), Some(1.0));
        assert_eq!(config.allowed_momentum_transfer, Some(1e-4));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_simple_preset() {
        let config = AggregatorConfig::simple(10, 5.0);
        assert_eq!(config.lineage.scattering_offset, 100);
        assert_eq!(config.active_energy_cut(), None);
        assert_eq!(config.allowed_momentum_transfer, None);
    }

    #[test]
    fn test_energy_cut_inactive_without_flag() {
        let mut config = AggregatorConfig::new(1, 1.0);
        config.energy_cut = Some(2.0);
        assert_eq!(config.active_energy_cut(), None);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        assert!(AggregatorConfig::new(0, 1.0).validate().is_err());
        assert!(AggregatorConfig::new(usize::MAX, 1.0).validate().is_err());
        assert!(AggregatorConfig::new(1, 0.0).validate().is_err());
        assert!(AggregatorConfig::new(1, f64::NAN).validate().is_err());

        let mut config = AggregatorConfig::new(1, 1.0);
        config.kill_above_energy_cut = true;
        assert!(config.validate().is_err());

        let config = AggregatorConfig::new(1, 1.0).with_allowed_momentum_transfer(-1.0);
        assert!(config.validate().is_err());
    }
}
