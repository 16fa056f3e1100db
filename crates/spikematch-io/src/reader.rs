//! CSV waveform reader with full input validation.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use spikematch_waveform::Waveform;
use tracing::{debug, info, instrument};

use crate::domain::{UnitId, WaveformDataset};
use crate::IoError;

/// Reads an average waveform from a CSV file.
///
/// Expected CSV format:
/// - Header row required, one column per channel: `ch0,ch1,...,chC`
/// - One row per time sample, all rows must have the header's column count
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::CsvParse`] | Malformed CSV record |
/// | [`IoError::NoChannels`] | Header row is empty |
/// | [`IoError::EmptyDataset`] | Zero sample rows after header |
/// | [`IoError::InconsistentRowLength`] | Row has different column count than header |
/// | [`IoError::NonFiniteValue`] | Cell is NaN, Inf, or unparseable float |
pub struct WaveformReader {
    path: PathBuf,
}

impl WaveformReader {
    /// Create a new reader for the given CSV file path.
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }

    /// Read and validate the CSV file, returning a [`Waveform`] of shape
    /// `(rows, header columns)`.
    #[instrument(skip(self), fields(path = %self.path.display()))]
    pub fn read(&self) -> Result<Waveform, IoError> {
        let file = std::fs::File::open(&self.path).map_err(|e| IoError::FileNotFound {
            path: self.path.clone(),
            source: e,
        })?;

        // flexible(true) so that our own InconsistentRowLength check fires
        // instead of a low-level CsvParse error.
        let mut rdr = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(file);

        let header = rdr.headers().map_err(|e| self.csv_error(e))?;
        let n_channels = header.len();
        if n_channels == 0 || header.iter().all(str::is_empty) {
            return Err(IoError::NoChannels {
                path: self.path.clone(),
            });
        }
        debug!(n_channels, channels = ?header.iter().collect::<Vec<_>>(), "read CSV header");

        let mut rows: Vec<Vec<f64>> = Vec::new();
        for (row_index, result) in rdr.records().enumerate() {
            let record = result.map_err(|e| self.csv_error(e))?;

            if record.len() != n_channels {
                return Err(IoError::InconsistentRowLength {
                    path: self.path.clone(),
                    row_index,
                    expected: n_channels,
                    got: record.len(),
                });
            }

            let mut values = Vec::with_capacity(n_channels);
            for (col_index, raw) in record.iter().enumerate() {
                let non_finite = || IoError::NonFiniteValue {
                    path: self.path.clone(),
                    row_index,
                    col_index,
                    raw: raw.to_string(),
                };
                let value: f64 = raw.parse().map_err(|_| non_finite())?;
                if !value.is_finite() {
                    return Err(non_finite());
                }
                values.push(value);
            }
            rows.push(values);
        }

        if rows.is_empty() {
            return Err(IoError::EmptyDataset {
                path: self.path.clone(),
            });
        }

        let waveform = Waveform::from_rows(&rows)?;
        info!(
            n_samples = waveform.n_samples(),
            n_channels = waveform.n_channels(),
            "waveform loaded"
        );
        Ok(waveform)
    }

    /// Read one waveform per path, naming each unit after its file stem.
    ///
    /// # Errors
    ///
    /// Any error of [`WaveformReader::read`], plus:
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::InvalidUnitId`] | A path has no usable file stem |
    /// | [`IoError::DuplicateUnitId`] | Two paths share a file stem |
    #[instrument(skip_all, fields(n_files = paths.len()))]
    pub fn read_many<P: AsRef<Path>>(paths: &[P]) -> Result<WaveformDataset, IoError> {
        let mut unit_ids = Vec::with_capacity(paths.len());
        let mut waveforms = Vec::with_capacity(paths.len());
        let mut seen: HashMap<UnitId, &Path> = HashMap::new();

        for path in paths {
            let path = path.as_ref();
            let unit_id = UnitId::from_path(path)?;
            if let Some(first) = seen.get(&unit_id) {
                return Err(IoError::DuplicateUnitId {
                    unit_id: unit_id.as_str().to_string(),
                    first: first.to_path_buf(),
                    second: path.to_path_buf(),
                });
            }
            seen.insert(unit_id.clone(), path);

            waveforms.push(Self::new(path).read()?);
            unit_ids.push(unit_id);
        }

        info!(n_units = unit_ids.len(), "waveform dataset loaded");
        Ok(WaveformDataset {
            unit_ids,
            waveforms,
        })
    }

    fn csv_error(&self, e: csv::Error) -> IoError {
        IoError::CsvParse {
            path: self.path.clone(),
            offset: e.position().map_or(0, |p| p.byte()),
            source: e,
        }
    }
}
