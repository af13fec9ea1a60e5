//! Three-component vectors for positions, momenta and polarizations.

use std::ops::{Add, Mul, Sub};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Cartesian three-vector in simulation units.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct ThreeVector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl ThreeVector {
    /// The zero vector.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        z: 0.0,
    };

    /// Creates a new vector.
    #[inline]
    #[must_use]
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Squared magnitude.
    #[inline]
    #[must_use]
    pub fn mag2(&self) -> f64 {
        self.x * self.x + self.y * self.y + self.z * self.z
    }

    /// Magnitude.
    #[inline]
    #[must_use]
    pub fn mag(&self) -> f64 {
        self.mag2().sqrt()
    }

    /// Weighted mean of `self` (carrying `weight`) and `sample` (carrying
    /// `sample_weight`).
    ///
    /// The result is a convex combination of the two inputs as long as both
    /// weights are non-negative and their sum is positive. A zero total
    /// weight returns `self` unchanged.
    #[inline]
    #[must_use]
    pub fn weighted_mean(self, weight: f64, sample: Self, sample_weight: f64) -> Self {
        let total = weight + sample_weight;
        if total <= 0.0 {
            return self;
        }
        Self {
            x: weighted_mean(self.x, weight, sample.x, sample_weight),
            y: weighted_mean(self.y, weight, sample.y, sample_weight),
            z: weighted_mean(self.z, weight, sample.z, sample_weight),
        }
    }
}

/// Scalar weighted mean of two samples.
///
/// Returns `value` unchanged when the total weight is not positive.
#[inline]
#[must_use]
pub fn weighted_mean(value: f64, weight: f64, sample: f64, sample_weight: f64) -> f64 {
    let total = weight + sample_weight;
    if total <= 0.0 {
        return value;
    }
    let mean = (value * weight + sample * sample_weight) / total;
    let (low, high) = (value.min(sample), value.max(sample));
    if low.is_nan() || high.is_nan() {
        return mean;
    }
    // Clamp against rounding so the mean never leaves the sample range.
    mean.clamp(low, high)
}

impl Add for ThreeVector {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for ThreeVector {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for ThreeVector {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl From<[f64; 3]> for ThreeVector {
    fn from(v: [f64; 3]) -> Self {
        Self::new(v[0], v[1], v[2])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_mag2() {
        let v = ThreeVector::new(1.0, 2.0, 2.0);
        assert_relative_eq!(v.mag2(), 9.0);
        assert_relative_eq!(v.mag(), 3.0);
    }

    #[test]
    fn test_weighted_mean_scalar() {
        // (10 * 1.0 + 5 * 1.3) / 15
        let mean = weighted_mean(1.0, 10.0, 1.3, 5.0);
        assert_relative_eq!(mean, 1.1, epsilon = 1e-12);
    }

    #[test]
    fn test_weighted_mean_nan_samples_do_not_panic() {
        assert!(weighted_mean(f64::NAN, 1.0, f64::NAN, 1.0).is_nan());
        let v = ThreeVector::new(f64::NAN, 1.0, 0.0);
        let mean = v.weighted_mean(1.0, ThreeVector::new(f64::NAN, 3.0, 0.0), 1.0);
        assert!(mean.x.is_nan());
        assert_relative_eq!(mean.y, 2.0);
    }

    #[test]
    fn test_weighted_mean_stays_in_range() {
        let mean = weighted_mean(0.1, 1e-300, 0.3, 1e300);
        assert!((0.1..=0.3).contains(&mean));
    }

    #[test]
    fn test_weighted_mean_zero_weight() {
        let v = ThreeVector::new(1.0, 2.0, 3.0);
        let out = v.weighted_mean(0.0, ThreeVector::ZERO, 0.0);
        assert_eq!(out, v);
    }

    #[test]
    fn test_vector_weighted_mean() {
        let a = ThreeVector::new(0.0, 0.0, 0.0);
        let b = ThreeVector::new(3.0, 6.0, -3.0);
        let m = a.weighted_mean(2.0, b, 1.0);
        assert_relative_eq!(m.x, 1.0, epsilon = 1e-12);
        assert_relative_eq!(m.y, 2.0, epsilon = 1e-12);
        assert_relative_eq!(m.z, -1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_vector_ops() {
        let a = ThreeVector::new(1.0, 2.0, 3.0);
        let b = ThreeVector::from([1.0, 1.0, 1.0]);
        assert_eq!(a + b, ThreeVector::new(2.0, 3.0, 4.0));
        assert_eq!(a - b, ThreeVector::new(0.0, 1.0, 2.0));
        assert_eq!(a * 2.0, ThreeVector::new(2.0, 4.0, 6.0));
    }
}
