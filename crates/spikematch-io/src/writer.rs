//! JSON result writer for comparison and pairwise outputs.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Serialize;
use spikematch_waveform::{DistanceMatrix, DistanceMode, DistanceReport};
use tracing::{debug, info, instrument};

use crate::domain::{ExperimentName, UnitId};
use crate::IoError;

/// Writes waveform distance results to JSON files.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named `{experiment}_compare.json` and
/// `{experiment}_pairwise.json`. Non-finite distances are written as `null`.
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Return the path of the comparison artifact.
    pub fn compare_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_compare.json", self.experiment.as_str()))
    }

    /// Return the path of the pairwise artifact.
    pub fn pairwise_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}_pairwise.json", self.experiment.as_str()))
    }

    /// Write a single comparison to `{experiment}_compare.json`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all, fields(first = %first, second = %second))]
    pub fn write_compare(
        &self,
        first: &UnitId,
        second: &UnitId,
        mode: DistanceMode,
        shape: (usize, usize),
        report: &DistanceReport,
    ) -> Result<(), IoError> {
        let artifact = CompareArtifact {
            experiment: self.experiment.as_str(),
            first: first.as_str(),
            second: second.as_str(),
            mode: mode.as_str(),
            n_samples: shape.0,
            n_channels: shape.1,
            distance: report.distance.to_array(),
            d2a: report.scale_deviation,
            d2b: report.scale_spread,
            alphas: report.alphas.as_slice(),
            channel_shape_terms: &report.channel_shape_terms,
        };
        self.write_json(&self.compare_path(), &artifact)
    }

    /// Write a pairwise distance matrix to `{experiment}_pairwise.json`.
    ///
    /// `d1[i][j]` and `d2[i][j]` hold the distance from unit `i` to unit `j`.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the file cannot be written.
    #[instrument(skip_all, fields(n_units = unit_ids.len()))]
    pub fn write_pairwise(
        &self,
        unit_ids: &[UnitId],
        mode: DistanceMode,
        matrix: &DistanceMatrix,
    ) -> Result<(), IoError> {
        let artifact = PairwiseArtifact {
            experiment: self.experiment.as_str(),
            mode: mode.as_str(),
            unit_ids: unit_ids.iter().map(UnitId::as_str).collect(),
            d1: matrix.shape_rows(),
            d2: matrix.scale_rows(),
        };
        self.write_json(&self.pairwise_path(), &artifact)
    }

    fn write_json<T: Serialize>(&self, path: &Path, artifact: &T) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(artifact).expect("serialization cannot fail");
        fs::write(path, &json).map_err(|e| IoError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        info!(path = %path.display(), "result written");
        Ok(())
    }
}

#[derive(Serialize)]
struct CompareArtifact<'a> {
    experiment: &'a str,
    first: &'a str,
    second: &'a str,
    mode: &'a str,
    n_samples: usize,
    n_channels: usize,
    distance: [f64; 2],
    d2a: f64,
    d2b: f64,
    alphas: &'a [f64],
    channel_shape_terms: &'a [f64],
}

#[derive(Serialize)]
struct PairwiseArtifact<'a> {
    experiment: &'a str,
    mode: &'a str,
    unit_ids: Vec<&'a str>,
    d1: Vec<Vec<f64>>,
    d2: Vec<Vec<f64>>,
}
