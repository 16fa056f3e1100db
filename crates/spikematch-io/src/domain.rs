//! Domain types for spikematch-io.

use std::path::Path;

use spikematch_waveform::Waveform;

use crate::IoError;

/// Identifier of a sorted spike unit, taken from its waveform file stem.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct UnitId(String);

impl UnitId {
    /// Derive a unit ID from the file stem of `path` (`session1/unit07.csv` → `unit07`).
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidUnitId`] if the path has no stem or it is
    /// not valid UTF-8.
    pub fn from_path(path: &Path) -> Result<Self, IoError> {
        path.file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .map(|s| Self(s.to_string()))
            .ok_or_else(|| IoError::InvalidUnitId {
                path: path.to_path_buf(),
            })
    }

    /// Return the unit ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for UnitId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Average waveforms of several units, loaded from one file per unit.
///
/// `unit_ids[i]` corresponds to `waveforms[i]`, in input order.
#[derive(Debug)]
pub struct WaveformDataset {
    /// Unit identifiers in input order.
    pub unit_ids: Vec<UnitId>,
    /// One average waveform per unit.
    pub waveforms: Vec<Waveform>,
}

impl WaveformDataset {
    /// Return the number of units.
    pub fn len(&self) -> usize {
        self.unit_ids.len()
    }

    /// Return true if the dataset holds no units.
    pub fn is_empty(&self) -> bool {
        self.unit_ids.is_empty()
    }
}
