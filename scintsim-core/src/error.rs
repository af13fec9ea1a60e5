//! Error types for scintsim-core.

use thiserror::Error;

/// Result type alias for scintsim operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error types for scintsim operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    /// Deposit refers to a sensitive volume outside the configured range.
    #[error("volume id {volume_id} outside configured range 0..={volume_count}")]
    VolumeOutOfRange { volume_id: usize, volume_count: usize },

    /// Deposited energy is negative or not a finite number.
    #[error("invalid deposited energy: {0}")]
    InvalidEnergy(f64),

    /// Deposit time or post-step position is not a finite number.
    #[error("non-finite deposit {field}")]
    NonFiniteDeposit { field: &'static str },

    /// Configuration error.
    #[error("configuration error: {0}")]
    ConfigError(String),
}
