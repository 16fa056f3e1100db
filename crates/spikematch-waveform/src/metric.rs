//! Shape/scale waveform distance (Tolias et al. 2007).

use std::fmt;

use rayon::prelude::*;
use tracing::{debug, instrument};

use crate::distance::DistanceVector;
use crate::error::DistanceError;
use crate::matrix::DistanceMatrix;
use crate::report::DistanceReport;
use crate::scaling::{ScalingFactors, dot, least_squares_alpha, norm};
use crate::waveform::Waveform;

/// How degenerate inputs are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DistanceMode {
    /// Reproduce the published formula: zero channels and non-positive
    /// scaling factors surface as NaN/Inf in the result.
    #[default]
    Literal,

    /// Reject degenerate channels and non-finite results with an error.
    Strict,
}

impl DistanceMode {
    /// Return the lowercase mode name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Literal => "literal",
            Self::Strict => "strict",
        }
    }
}

impl fmt::Display for DistanceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable waveform distance calculator. Thread-safe and copyable.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WaveformDistance {
    mode: DistanceMode,
}

impl WaveformDistance {
    /// Create a calculator that reproduces the published formula exactly.
    #[must_use]
    pub fn literal() -> Self {
        Self {
            mode: DistanceMode::Literal,
        }
    }

    /// Create a calculator that rejects degenerate inputs.
    #[must_use]
    pub fn strict() -> Self {
        Self {
            mode: DistanceMode::Strict,
        }
    }

    /// Set the degenerate-input handling mode.
    #[must_use]
    pub fn with_mode(mut self, mode: DistanceMode) -> Self {
        self.mode = mode;
        self
    }

    /// Return the degenerate-input handling mode.
    #[must_use]
    pub fn mode(&self) -> DistanceMode {
        self.mode
    }

    /// Compute `[d1, d2]` between `x` and `y`.
    ///
    /// The distance is directional: `x` is rescaled onto `y`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DistanceError::ShapeMismatch`] | `x.shape() != y.shape()` |
    /// | Any other variant | Strict mode only, see [`WaveformDistance::report`] |
    pub fn distance(&self, x: &Waveform, y: &Waveform) -> Result<DistanceVector, DistanceError> {
        self.report(x, y).map(|r| r.distance)
    }

    /// Compute the per-channel least-squares scaling factors of `x` onto `y`.
    ///
    /// # Errors
    ///
    /// Returns [`DistanceError::ShapeMismatch`] if `x.shape() != y.shape()`.
    /// The mode does not apply; factors are returned as computed.
    pub fn scaling_factors(
        &self,
        x: &Waveform,
        y: &Waveform,
    ) -> Result<ScalingFactors, DistanceError> {
        check_shapes(x, y)?;
        Ok(compute_alphas(x, y))
    }

    /// Compute the distance together with every intermediate term.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DistanceError::ShapeMismatch`] | `x.shape() != y.shape()` |
    /// | [`DistanceError::ZeroEnergyChannel`] | Strict: a channel of `x` is all zeros |
    /// | [`DistanceError::ZeroReferenceChannel`] | Strict: a channel of `y` has zero norm |
    /// | [`DistanceError::NonPositiveScaling`] | Strict: a scaling factor is not finite and positive |
    /// | [`DistanceError::NonFiniteDistance`] | Strict: `d1` or `d2` is NaN or infinite |
    #[instrument(skip(self, x, y), fields(mode = %self.mode, shape = ?x.shape()))]
    pub fn report(&self, x: &Waveform, y: &Waveform) -> Result<DistanceReport, DistanceError> {
        check_shapes(x, y)?;

        let alphas = compute_alphas(x, y);
        if self.mode == DistanceMode::Strict {
            check_channels(x, y, &alphas)?;
        }

        let channel_shape_terms: Vec<f64> = x
            .channels()
            .zip(y.channels())
            .zip(alphas.as_slice())
            .map(|((xi, yi), &alpha)| {
                let residual = xi.iter().zip(yi).map(|(a, b)| alpha * a - b);
                norm(residual) / norm(yi.iter().copied())
            })
            .collect();
        let shape: f64 = channel_shape_terms.iter().sum();

        let scale_deviation = alphas.max_abs_log();
        let scale_spread = alphas.max_pairwise_log_spread();
        let distance = DistanceVector::new(shape, scale_deviation + scale_spread);

        debug!(
            alphas = ?alphas.as_slice(),
            d1 = shape,
            d2a = scale_deviation,
            d2b = scale_spread,
            "waveform distance computed"
        );

        if self.mode == DistanceMode::Strict && !distance.is_finite() {
            return Err(DistanceError::NonFiniteDistance {
                d1: distance.shape(),
                d2: distance.scale(),
            });
        }

        Ok(DistanceReport {
            distance,
            alphas,
            channel_shape_terms,
            scale_deviation,
            scale_spread,
        })
    }

    /// Compute distances for every ordered pair of waveforms, the diagonal included.
    ///
    /// Entry `(i, j)` is `distance(&waveforms[i], &waveforms[j])`. Computation
    /// is parallelized across pairs using rayon.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DistanceError::ShapeMismatch`] | A waveform's shape differs from `waveforms[0]` |
    /// | Any strict-mode variant | Strict: the first failing pair in row-major order |
    #[instrument(skip(self, waveforms), fields(mode = %self.mode, n = waveforms.len()))]
    pub fn pairwise(&self, waveforms: &[Waveform]) -> Result<DistanceMatrix, DistanceError> {
        let n = waveforms.len();
        if let Some(first) = waveforms.first() {
            for w in &waveforms[1..] {
                check_shapes(first, w)?;
            }
        }

        let results: Vec<Result<DistanceVector, DistanceError>> = (0..n * n)
            .into_par_iter()
            .map(|flat_idx| {
                let (i, j) = (flat_idx / n, flat_idx % n);
                self.distance(&waveforms[i], &waveforms[j])
            })
            .collect();
        let data = results.into_iter().collect::<Result<Vec<_>, _>>()?;

        debug!(n_pairs = data.len(), "pairwise distances computed");
        Ok(DistanceMatrix::from_raw(n, data))
    }
}

/// Compute `[d1, d2]` between `x` and `y` with the published formula.
///
/// Shorthand for `WaveformDistance::literal().distance(x, y)`. Degenerate
/// inputs yield NaN/Inf components rather than errors.
///
/// # Errors
///
/// Returns [`DistanceError::ShapeMismatch`] if `x.shape() != y.shape()`.
pub fn compute_waveform_distance(
    x: &Waveform,
    y: &Waveform,
) -> Result<DistanceVector, DistanceError> {
    WaveformDistance::literal().distance(x, y)
}

fn check_shapes(x: &Waveform, y: &Waveform) -> Result<(), DistanceError> {
    if x.shape() != y.shape() {
        return Err(DistanceError::ShapeMismatch {
            left: x.shape(),
            right: y.shape(),
        });
    }
    Ok(())
}

fn compute_alphas(x: &Waveform, y: &Waveform) -> ScalingFactors {
    ScalingFactors::new(
        x.channels()
            .zip(y.channels())
            .map(|(xi, yi)| least_squares_alpha(xi, yi))
            .collect(),
    )
}

fn check_channels(
    x: &Waveform,
    y: &Waveform,
    alphas: &ScalingFactors,
) -> Result<(), DistanceError> {
    for (channel, ((xi, yi), &alpha)) in x
        .channels()
        .zip(y.channels())
        .zip(alphas.as_slice())
        .enumerate()
    {
        if dot(xi, xi) == 0.0 {
            return Err(DistanceError::ZeroEnergyChannel { channel });
        }
        if dot(yi, yi) == 0.0 {
            return Err(DistanceError::ZeroReferenceChannel { channel });
        }
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(DistanceError::NonPositiveScaling { channel, alpha });
        }
    }
    Ok(())
}
