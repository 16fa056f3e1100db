//! Shape/scale distance between multi-channel spike waveforms.
//!
//! Pure math library, zero I/O. Implements the two-component waveform
//! distance of Tolias et al. (2007), "Recording chronically from the same
//! neurons in awake, behaving primates": per-channel least-squares scaling,
//! a normalized residual shape distance `d1` and a log-scale distance `d2`.
//! Also provides parallel pairwise distance matrices.

mod distance;
mod error;
mod matrix;
mod metric;
mod report;
mod scaling;
mod waveform;

pub use distance::DistanceVector;
pub use error::{DistanceError, WaveformError};
pub use matrix::DistanceMatrix;
pub use metric::{DistanceMode, WaveformDistance, compute_waveform_distance};
pub use report::DistanceReport;
pub use scaling::ScalingFactors;
pub use waveform::Waveform;
