use serde::{Deserialize, Serialize};

use crate::error::DirectorError;
use crate::models::SceneCatalog;

/// Float slack for boundary comparisons on the timeline. Destination
/// positions are carried through additively, so drift stays well below
/// this.
pub(crate) const EPSILON: f64 = 1e-6;

/// One assignment: cut `[excerpt_start, excerpt_end)` out of
/// `source_file` and place it at `[dest_start, dest_end)` on the output
/// timeline. Excerpt and destination spans are always equal in length;
/// the renderer never stretches time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EditSegment {
    pub scene_id: String,
    pub source_file: String,
    pub excerpt_start: f64,
    pub excerpt_end: f64,
    pub dest_start: f64,
    pub dest_end: f64,
}

impl EditSegment {
    pub fn dest_duration(&self) -> f64 {
        self.dest_end - self.dest_start
    }

    pub fn excerpt_duration(&self) -> f64 {
        self.excerpt_end - self.excerpt_start
    }
}

/// The full edit: an ordered, gapless sequence of segments covering the
/// track from 0 to its total duration. Built once per generation run and
/// consumed read-only by the renderer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EditTimeline {
    pub segments: Vec<EditSegment>,
}

impl EditTimeline {
    pub fn total_duration(&self) -> f64 {
        self.segments.last().map(|s| s.dest_end).unwrap_or(0.0)
    }

    /// Serialize for handoff to the renderer.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Check every timeline invariant: segments tile `[0, total_duration)`
    /// contiguously, each excerpt matches its destination in length, and
    /// each excerpt lies inside its scene's source bounds.
    ///
    /// This is the hard gate the Director runs before returning; a failure
    /// here means the assignment algorithm is broken.
    pub fn validate(
        &self,
        catalog: &SceneCatalog,
        total_duration: f64,
    ) -> Result<(), DirectorError> {
        if self.segments.is_empty() {
            if total_duration.abs() < EPSILON {
                return Ok(());
            }
            return Err(DirectorError::InvariantViolation(format!(
                "empty timeline for non-zero duration {total_duration}"
            )));
        }

        let mut expected_start = 0.0;
        for (i, segment) in self.segments.iter().enumerate() {
            if (segment.dest_start - expected_start).abs() > EPSILON {
                return Err(DirectorError::InvariantViolation(format!(
                    "segment {i} starts at {} but previous ended at {expected_start}",
                    segment.dest_start
                )));
            }
            if segment.dest_duration() <= 0.0 {
                return Err(DirectorError::InvariantViolation(format!(
                    "segment {i} has non-positive duration"
                )));
            }
            if (segment.excerpt_duration() - segment.dest_duration()).abs() > EPSILON {
                return Err(DirectorError::InvariantViolation(format!(
                    "segment {i} excerpt length {} != destination length {}",
                    segment.excerpt_duration(),
                    segment.dest_duration()
                )));
            }

            let scene = catalog.get(&segment.scene_id).ok_or_else(|| {
                DirectorError::InvariantViolation(format!(
                    "segment {i} references unknown scene {}",
                    segment.scene_id
                ))
            })?;
            if segment.excerpt_start < scene.source_start - EPSILON
                || segment.excerpt_end > scene.source_end + EPSILON
            {
                return Err(DirectorError::InvariantViolation(format!(
                    "segment {i} excerpt {}..{} outside scene bounds {}..{}",
                    segment.excerpt_start,
                    segment.excerpt_end,
                    scene.source_start,
                    scene.source_end
                )));
            }

            expected_start = segment.dest_end;
        }

        if (expected_start - total_duration).abs() > EPSILON {
            return Err(DirectorError::InvariantViolation(format!(
                "timeline ends at {expected_start}, expected {total_duration}"
            )));
        }
        Ok(())
    }
}
