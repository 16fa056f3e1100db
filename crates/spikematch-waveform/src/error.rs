//! Error types for waveform construction and distance computation.

/// Errors from building a [`Waveform`](crate::Waveform) out of raw samples.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum WaveformError {
    /// Returned when a waveform has no time samples.
    #[error("waveform must have at least one sample")]
    EmptyWaveform,

    /// Returned when a waveform has no channels.
    #[error("waveform must have at least one channel")]
    NoChannels,

    /// Returned when a sample row has a different channel count than the first row.
    #[error("row {row} has {got} channels, expected {expected}")]
    RaggedRow {
        /// Zero-based sample index of the offending row.
        row: usize,
        /// Channel count of the first row.
        expected: usize,
        /// Channel count of this row.
        got: usize,
    },

    /// Returned when a channel has a different sample count than the first channel.
    #[error("channel {channel} has {got} samples, expected {expected}")]
    RaggedChannel {
        /// Zero-based index of the offending channel.
        channel: usize,
        /// Sample count of the first channel.
        expected: usize,
        /// Sample count of this channel.
        got: usize,
    },

    /// Returned when a flat buffer does not hold `samples * channels` values.
    #[error("buffer of {got} values does not match shape ({samples}, {channels})")]
    BufferLength {
        /// Requested sample count.
        samples: usize,
        /// Requested channel count.
        channels: usize,
        /// Actual buffer length.
        got: usize,
    },
}

/// Errors from waveform distance computation.
///
/// Only [`DistanceError::ShapeMismatch`] is produced in
/// [`DistanceMode::Literal`](crate::DistanceMode::Literal). The remaining
/// variants are raised by [`DistanceMode::Strict`](crate::DistanceMode::Strict).
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum DistanceError {
    /// Returned when the two waveforms do not share `(samples, channels)`.
    #[error("waveform shapes differ: {left:?} vs {right:?} (samples, channels)")]
    ShapeMismatch {
        /// Shape of the first waveform.
        left: (usize, usize),
        /// Shape of the second waveform.
        right: (usize, usize),
    },

    /// Returned when a channel of the first waveform is all zeros.
    #[error("channel {channel} of the first waveform has zero energy")]
    ZeroEnergyChannel {
        /// Zero-based channel index.
        channel: usize,
    },

    /// Returned when a channel of the second waveform has zero norm.
    #[error("channel {channel} of the second waveform has zero norm")]
    ZeroReferenceChannel {
        /// Zero-based channel index.
        channel: usize,
    },

    /// Returned when a scaling factor is not a finite positive value.
    #[error("channel {channel} has non-positive scaling factor {alpha}")]
    NonPositiveScaling {
        /// Zero-based channel index.
        channel: usize,
        /// The offending scaling factor.
        alpha: f64,
    },

    /// Returned when the distance vector contains NaN or infinity.
    #[error("distance is not finite: d1 = {d1}, d2 = {d2}")]
    NonFiniteDistance {
        /// Shape distance.
        d1: f64,
        /// Scale distance.
        d2: f64,
    },
}
