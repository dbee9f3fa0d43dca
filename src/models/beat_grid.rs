use serde::{Deserialize, Serialize};

use crate::error::DirectorError;

/// One cut window on the output timeline, half-open in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub start: f64,
    pub end: f64,
}

impl Interval {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }
}

/// Ordered beat timestamps from the audio analyzer plus the measured track
/// duration. The grid defines the cut points the edit must land on.
///
/// Deserialization funnels through `BeatGrid::new`, so malformed analyzer
/// output is rejected at the input boundary rather than mid-run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawBeatGrid")]
pub struct BeatGrid {
    beats: Vec<f64>,
    total_duration: f64,
}

#[derive(Deserialize)]
struct RawBeatGrid {
    beats: Vec<f64>,
    total_duration: f64,
}

impl TryFrom<RawBeatGrid> for BeatGrid {
    type Error = DirectorError;

    fn try_from(raw: RawBeatGrid) -> Result<Self, Self::Error> {
        Self::new(raw.beats, raw.total_duration)
    }
}

impl BeatGrid {
    /// Validate raw analyzer output: timestamps must be finite,
    /// non-negative and strictly increasing, and the track duration must
    /// cover the last beat.
    pub fn new(beats: Vec<f64>, total_duration: f64) -> Result<Self, DirectorError> {
        if !total_duration.is_finite() || total_duration < 0.0 {
            return Err(DirectorError::MalformedInput(format!(
                "invalid total duration: {total_duration}"
            )));
        }
        for (i, &beat) in beats.iter().enumerate() {
            if !beat.is_finite() || beat < 0.0 {
                return Err(DirectorError::MalformedInput(format!(
                    "beat {i} has invalid timestamp {beat}"
                )));
            }
            if i > 0 && beat <= beats[i - 1] {
                return Err(DirectorError::MalformedInput(format!(
                    "beat timestamps not strictly increasing at index {i}: {} then {beat}",
                    beats[i - 1]
                )));
            }
        }
        if let Some(&last) = beats.last() {
            if last > total_duration {
                return Err(DirectorError::MalformedInput(format!(
                    "last beat {last} exceeds total duration {total_duration}"
                )));
            }
        }

        Ok(Self {
            beats,
            total_duration,
        })
    }

    pub fn beats(&self) -> &[f64] {
        &self.beats
    }

    pub fn total_duration(&self) -> f64 {
        self.total_duration
    }

    /// The half-open intervals tiling `[0, total_duration)`: a leading
    /// interval before the first beat when the track does not start on
    /// one, the beat-to-beat intervals, and a trailing interval after the
    /// last beat. Zero-length intervals are never produced.
    pub fn intervals(&self) -> Vec<Interval> {
        let mut boundaries = Vec::with_capacity(self.beats.len() + 2);
        boundaries.push(0.0);
        boundaries.extend_from_slice(&self.beats);
        boundaries.push(self.total_duration);

        boundaries
            .windows(2)
            .filter(|w| w[1] > w[0])
            .map(|w| Interval {
                start: w[0],
                end: w[1],
            })
            .collect()
    }
}
