//! Two-component waveform distance value.

use std::fmt;

/// Shape and scale distance between two waveforms, in that fixed order.
///
/// Components may be NaN or infinite when the inputs are degenerate
/// (all-zero channels, non-positive scaling factors).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceVector {
    shape: f64,
    scale: f64,
}

impl DistanceVector {
    /// Zero distance, the result for identical non-degenerate waveforms.
    pub const ZERO: Self = Self {
        shape: 0.0,
        scale: 0.0,
    };

    pub(crate) fn new(shape: f64, scale: f64) -> Self {
        Self { shape, scale }
    }

    /// Shape distance `d1`: summed normalized residual after per-channel rescaling.
    #[must_use]
    pub fn shape(self) -> f64 {
        self.shape
    }

    /// Scale distance `d2`: log-scale spread of the per-channel scaling factors.
    #[must_use]
    pub fn scale(self) -> f64 {
        self.scale
    }

    /// Return `[d1, d2]`.
    #[must_use]
    pub fn to_array(self) -> [f64; 2] {
        [self.shape, self.scale]
    }

    /// Return true if both components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.shape.is_finite() && self.scale.is_finite()
    }
}

impl From<DistanceVector> for [f64; 2] {
    fn from(d: DistanceVector) -> Self {
        d.to_array()
    }
}

impl From<DistanceVector> for (f64, f64) {
    fn from(d: DistanceVector) -> Self {
        (d.shape, d.scale)
    }
}

impl fmt::Display for DistanceVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{:.6}, {:.6}]", self.shape, self.scale)
    }
}
