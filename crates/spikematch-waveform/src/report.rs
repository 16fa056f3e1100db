//! Full breakdown of a single waveform comparison.

use crate::distance::DistanceVector;
use crate::scaling::ScalingFactors;

/// Everything computed while comparing one waveform pair.
///
/// `distance.shape()` is the sum of `channel_shape_terms` in channel order,
/// and `distance.scale()` is `scale_deviation + scale_spread`.
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceReport {
    /// The `[d1, d2]` result.
    pub distance: DistanceVector,
    /// Per-channel least-squares scaling factors of the first waveform onto the second.
    pub alphas: ScalingFactors,
    /// Per-channel `||alpha_i * x_i - y_i|| / ||y_i||`.
    pub channel_shape_terms: Vec<f64>,
    /// `d2a = max_i |ln(alpha_i)|`.
    pub scale_deviation: f64,
    /// `d2b = max_{i,j} |ln(alpha_i) - ln(alpha_j)|`.
    pub scale_spread: f64,
}

impl DistanceReport {
    /// Return the number of compared channels.
    #[must_use]
    pub fn n_channels(&self) -> usize {
        self.alphas.len()
    }
}
