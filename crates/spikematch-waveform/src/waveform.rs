//! Multi-channel waveform type with shape guarantees.

use std::ops::Index;

use crate::error::WaveformError;

/// Owned multi-channel waveform of shape `(samples, channels)`.
///
/// Guaranteed to hold at least one sample and one channel. Values are stored
/// channel-major so each channel is a contiguous slice. Sample values are
/// not checked for finiteness: NaN and infinity are carried through the
/// distance computation unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    n_samples: usize,
    n_channels: usize,
    data: Vec<f64>,
}

impl Waveform {
    /// Create a single-channel waveform from a 1-D sample sequence.
    ///
    /// The result has shape `(samples.len(), 1)`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`WaveformError::EmptyWaveform`] | `samples` is empty |
    pub fn from_samples(samples: Vec<f64>) -> Result<Self, WaveformError> {
        if samples.is_empty() {
            return Err(WaveformError::EmptyWaveform);
        }
        Ok(Self {
            n_samples: samples.len(),
            n_channels: 1,
            data: samples,
        })
    }

    /// Create a waveform from sample rows, one row per time sample holding
    /// one value per channel.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`WaveformError::EmptyWaveform`] | `rows` is empty |
    /// | [`WaveformError::NoChannels`] | The first row is empty |
    /// | [`WaveformError::RaggedRow`] | A row differs in length from the first |
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, WaveformError> {
        let first = rows.first().ok_or(WaveformError::EmptyWaveform)?;
        let n_channels = first.as_ref().len();
        if n_channels == 0 {
            return Err(WaveformError::NoChannels);
        }
        for (row, r) in rows.iter().enumerate() {
            let got = r.as_ref().len();
            if got != n_channels {
                return Err(WaveformError::RaggedRow {
                    row,
                    expected: n_channels,
                    got,
                });
            }
        }

        let n_samples = rows.len();
        let mut data = Vec::with_capacity(n_samples * n_channels);
        for channel in 0..n_channels {
            data.extend(rows.iter().map(|r| r.as_ref()[channel]));
        }
        Ok(Self {
            n_samples,
            n_channels,
            data,
        })
    }

    /// Create a waveform from per-channel sample columns.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`WaveformError::NoChannels`] | `channels` is empty |
    /// | [`WaveformError::EmptyWaveform`] | The first channel is empty |
    /// | [`WaveformError::RaggedChannel`] | A channel differs in length from the first |
    pub fn from_channels(channels: Vec<Vec<f64>>) -> Result<Self, WaveformError> {
        let n_samples = channels.first().ok_or(WaveformError::NoChannels)?.len();
        if n_samples == 0 {
            return Err(WaveformError::EmptyWaveform);
        }
        if let Some((channel, c)) = channels
            .iter()
            .enumerate()
            .find(|(_, c)| c.len() != n_samples)
        {
            return Err(WaveformError::RaggedChannel {
                channel,
                expected: n_samples,
                got: c.len(),
            });
        }

        let n_channels = channels.len();
        Ok(Self {
            n_samples,
            n_channels,
            data: channels.into_iter().flatten().collect(),
        })
    }

    /// Create a waveform from a flat row-major buffer of shape `(n_samples, n_channels)`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`WaveformError::EmptyWaveform`] | `n_samples` is zero |
    /// | [`WaveformError::NoChannels`] | `n_channels` is zero |
    /// | [`WaveformError::BufferLength`] | `values.len() != n_samples * n_channels` |
    pub fn from_row_major(
        n_samples: usize,
        n_channels: usize,
        values: &[f64],
    ) -> Result<Self, WaveformError> {
        if n_samples == 0 {
            return Err(WaveformError::EmptyWaveform);
        }
        if n_channels == 0 {
            return Err(WaveformError::NoChannels);
        }
        if values.len() != n_samples * n_channels {
            return Err(WaveformError::BufferLength {
                samples: n_samples,
                channels: n_channels,
                got: values.len(),
            });
        }
        let data = (0..n_channels)
            .flat_map(|c| values.iter().skip(c).step_by(n_channels).copied())
            .collect();
        Ok(Self {
            n_samples,
            n_channels,
            data,
        })
    }

    /// Return the number of time samples per channel.
    #[must_use]
    pub fn n_samples(&self) -> usize {
        self.n_samples
    }

    /// Return the number of channels.
    #[must_use]
    pub fn n_channels(&self) -> usize {
        self.n_channels
    }

    /// Return `(samples, channels)`.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.n_samples, self.n_channels)
    }

    /// Return the samples of one channel.
    ///
    /// # Panics
    ///
    /// Panics if `channel >= n_channels`.
    #[must_use]
    pub fn channel(&self, channel: usize) -> &[f64] {
        assert!(
            channel < self.n_channels,
            "channel {channel} out of bounds for waveform with {} channels",
            self.n_channels
        );
        let start = channel * self.n_samples;
        &self.data[start..start + self.n_samples]
    }

    /// Iterate over channels in index order.
    pub fn channels(&self) -> impl ExactSizeIterator<Item = &[f64]> + '_ {
        self.data.chunks_exact(self.n_samples)
    }

    /// Return the waveform as sample rows, one `Vec` per time sample.
    #[must_use]
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.n_samples)
            .map(|s| self.channels().map(|c| c[s]).collect())
            .collect()
    }
}

impl Index<(usize, usize)> for Waveform {
    type Output = f64;

    /// Index by `(sample, channel)`.
    fn index(&self, (sample, channel): (usize, usize)) -> &Self::Output {
        &self.channel(channel)[sample]
    }
}

impl TryFrom<Vec<f64>> for Waveform {
    type Error = WaveformError;

    fn try_from(samples: Vec<f64>) -> Result<Self, Self::Error> {
        Self::from_samples(samples)
    }
}
