//! Per-channel least-squares scaling factors and the reductions built on them.

use std::ops::Index;

/// One least-squares scaling factor per channel.
///
/// `alpha[i]` minimizes `sum((alpha * x_i - y_i)^2)`, so it maps channel `i`
/// of the first waveform onto channel `i` of the second.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalingFactors(Vec<f64>);

impl ScalingFactors {
    pub(crate) fn new(alphas: Vec<f64>) -> Self {
        Self(alphas)
    }

    /// Return the factors in channel order.
    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.0
    }

    /// Return the number of channels.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if there are no factors. Never the case for factors
    /// produced from a valid waveform pair.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Largest absolute log-scaling across channels: `max_i |ln(alpha_i)|`.
    #[must_use]
    pub fn max_abs_log(&self) -> f64 {
        nan_max(self.0.iter().map(|a| a.ln().abs()))
    }

    /// Largest pairwise log-scaling discrepancy over all ordered channel
    /// pairs, self-pairs included: `max_{i,j} |ln(alpha_i) - ln(alpha_j)|`.
    ///
    /// A zero factor makes its self-pair `-inf - -inf = NaN`, so the result
    /// is NaN. An order-dependent maximum that skips NaN would report `inf`
    /// instead whenever the NaN pair is not the first candidate.
    #[must_use]
    pub fn max_pairwise_log_spread(&self) -> f64 {
        let logs: Vec<f64> = self.0.iter().map(|a| a.ln()).collect();
        nan_max(
            logs.iter()
                .flat_map(|&li| logs.iter().map(move |&lj| (li - lj).abs())),
        )
    }

    /// Consume and return the inner vector.
    #[must_use]
    pub fn into_inner(self) -> Vec<f64> {
        self.0
    }
}

impl Index<usize> for ScalingFactors {
    type Output = f64;

    fn index(&self, channel: usize) -> &Self::Output {
        &self.0[channel]
    }
}

impl AsRef<[f64]> for ScalingFactors {
    fn as_ref(&self) -> &[f64] {
        &self.0
    }
}

/// Least-squares scaling of `x` onto `y`: `dot(x, y) / dot(x, x)`.
///
/// An all-zero `x` yields `0 / 0 = NaN`.
pub(crate) fn least_squares_alpha(x: &[f64], y: &[f64]) -> f64 {
    dot(x, y) / dot(x, x)
}

pub(crate) fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(p, q)| p * q).sum()
}

/// Euclidean norm `sqrt(sum(v^2))`.
pub(crate) fn norm(v: impl Iterator<Item = f64>) -> f64 {
    v.map(|e| e * e).sum::<f64>().sqrt()
}

/// Maximum that propagates NaN: any NaN candidate makes the result NaN.
///
/// [`f64::max`] ignores NaN operands, which would hide degenerate channels.
pub(crate) fn nan_max(values: impl Iterator<Item = f64>) -> f64 {
    values.fold(f64::NEG_INFINITY, |acc, v| {
        if acc.is_nan() || v.is_nan() {
            f64::NAN
        } else {
            acc.max(v)
        }
    })
}
