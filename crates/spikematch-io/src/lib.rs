//! File I/O, validation, and serialization for the spikematch pipeline.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::{ExperimentName, UnitId, WaveformDataset};
pub use error::IoError;
pub use reader::WaveformReader;
pub use writer::ResultWriter;
