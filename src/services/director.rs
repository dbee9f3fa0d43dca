use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::DirectorError;
use crate::models::{
    BeatGrid, EditSegment, EditTimeline, Interval, ProgressionPlan, SceneCatalog, EPSILON,
};
use crate::services::report::GenerationReport;
use crate::services::selection::{self, Relaxation, SceneCursor};

/// Variety knobs for a generation run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Variety {
    /// Minimum number of intervals between two uses of the same scene.
    /// `None` picks a default proportional to the catalog size.
    pub cooldown: Option<usize>,
    /// Drives the tie-break among equally eligible candidates. Same seed,
    /// same inputs, same timeline.
    pub seed: u64,
}

impl Default for Variety {
    fn default() -> Self {
        Self {
            cooldown: None,
            seed: 0,
        }
    }
}

impl Variety {
    pub fn with_seed(seed: u64) -> Self {
        Self {
            cooldown: None,
            seed,
        }
    }

    fn cooldown_for(&self, catalog_len: usize) -> usize {
        self.cooldown.unwrap_or((catalog_len / 2).max(1))
    }
}

/// Result of one run: the validated timeline plus its diagnostics.
#[derive(Debug, Clone)]
pub struct Generation {
    pub timeline: EditTimeline,
    pub report: GenerationReport,
}

/// The assignment engine: walks the beat grid once and fills every
/// interval with a scene excerpt, escalating intensity per the plan and
/// falling back through the relaxation ladder when the pool runs thin.
///
/// A run is pure CPU-bound sequential work. The catalog/grid/plan are
/// read-only snapshots; all mutable state (scene cursors) is owned by the
/// run itself, so one catalog can back concurrent runs.
pub struct Director {
    variety: Variety,
}

impl Director {
    pub fn new(variety: Variety) -> Self {
        Self { variety }
    }

    /// Produce a gapless edit covering `[0, grid.total_duration())`.
    ///
    /// Fails with `InsufficientFootage` only for an empty catalog; any
    /// non-empty catalog yields a full timeline, with relaxations recorded
    /// in the report. The returned timeline has already passed the
    /// invariant validation gate.
    pub fn generate(
        &self,
        catalog: &SceneCatalog,
        grid: &BeatGrid,
        plan: &ProgressionPlan,
    ) -> Result<Generation, DirectorError> {
        if catalog.is_empty() {
            return Err(DirectorError::InsufficientFootage);
        }

        let intervals = grid.intervals();
        let cooldown = self.variety.cooldown_for(catalog.len());
        debug!(
            intervals = intervals.len(),
            scenes = catalog.len(),
            cooldown,
            seed = self.variety.seed,
            "starting generation run"
        );

        // Seeded shuffle rank, fixed for the run: the final tie-break
        // among candidates equal on category and confidence.
        let mut rng = StdRng::seed_from_u64(self.variety.seed);
        let mut order: Vec<usize> = (0..catalog.len()).collect();
        order.shuffle(&mut rng);
        let mut ranks = vec![0usize; catalog.len()];
        for (rank, &idx) in order.iter().enumerate() {
            ranks[idx] = rank;
        }

        let mut cursors = vec![SceneCursor::default(); catalog.len()];
        let mut report = GenerationReport::default();
        let mut timeline = EditTimeline::default();

        let count = intervals.len();
        for (i, interval) in intervals.iter().enumerate() {
            let floor = plan.floor_for(i, count);
            let duration = interval.duration();

            match selection::choose(catalog, &cursors, &ranks, i, duration, floor, cooldown) {
                Some(pick) => {
                    let scene = &catalog.scenes()[pick.scene_idx];
                    let cursor = &mut cursors[pick.scene_idx];
                    if pick.relaxation == Some(Relaxation::WrapAround) {
                        cursor.consumed = 0.0;
                    }
                    if let Some(level) = pick.relaxation {
                        debug!(
                            interval = i,
                            scene = %scene.id,
                            level = ?level,
                            "selection relaxed"
                        );
                    }

                    let excerpt_start = scene.source_start + cursor.consumed;
                    timeline.segments.push(EditSegment {
                        scene_id: scene.id.clone(),
                        source_file: scene.source_file.clone(),
                        excerpt_start,
                        excerpt_end: excerpt_start + duration,
                        dest_start: interval.start,
                        dest_end: interval.end,
                    });
                    cursor.consumed += duration;
                    cursor.last_used = Some(i);
                    report.record(pick.relaxation);
                }
                None => {
                    // No scene's whole span covers the interval. The
                    // destination duration is a hard constraint, so tile
                    // the interval instead of shrinking it.
                    pad_interval(catalog, &ranks, &mut cursors, i, *interval, &mut timeline)?;
                    report.record(Some(Relaxation::TailPad));
                }
            }
        }

        timeline.validate(catalog, grid.total_duration())?;
        debug!(
            segments = timeline.segments.len(),
            relaxed = report.relaxed_intervals(),
            "generation run complete"
        );
        Ok(Generation { timeline, report })
    }
}

/// Fill one interval from a scene shorter than the interval itself: the
/// whole excerpt once, then its tail repeated until the interval closes.
fn pad_interval(
    catalog: &SceneCatalog,
    ranks: &[usize],
    cursors: &mut [SceneCursor],
    interval_index: usize,
    interval: Interval,
    timeline: &mut EditTimeline,
) -> Result<(), DirectorError> {
    let (scene_idx, scene) = catalog
        .scenes()
        .iter()
        .enumerate()
        .max_by(|(a_idx, a), (b_idx, b)| {
            a.duration()
                .total_cmp(&b.duration())
                .then_with(|| a.confidence.total_cmp(&b.confidence))
                .then_with(|| ranks[*b_idx].cmp(&ranks[*a_idx]))
        })
        .ok_or_else(|| {
            DirectorError::InvariantViolation("padding reached with empty catalog".to_string())
        })?;

    let span = scene.duration();
    warn!(
        interval = interval_index,
        scene = %scene.id,
        span,
        needed = interval.duration(),
        "catalog exhausted, tiling interval with repeated tail"
    );

    // Lead with the full excerpt.
    let first_len = span.min(interval.duration());
    let mut pos = if first_len >= interval.duration() {
        interval.end
    } else {
        interval.start + first_len
    };
    timeline.segments.push(EditSegment {
        scene_id: scene.id.clone(),
        source_file: scene.source_file.clone(),
        excerpt_start: scene.source_start,
        excerpt_end: scene.source_start + first_len,
        dest_start: interval.start,
        dest_end: pos,
    });

    // Repeat the tail until the interval is closed. The closing slice is
    // pinned to the interval boundary so no float drift accumulates.
    while interval.end - pos > EPSILON {
        let remainder = interval.end - pos;
        let tail_len = remainder.min(span);
        let dest_end = if tail_len >= remainder {
            interval.end
        } else {
            pos + tail_len
        };
        timeline.segments.push(EditSegment {
            scene_id: scene.id.clone(),
            source_file: scene.source_file.clone(),
            excerpt_start: scene.source_end - (dest_end - pos),
            excerpt_end: scene.source_end,
            dest_start: pos,
            dest_end,
        });
        pos = dest_end;
    }

    cursors[scene_idx].last_used = Some(interval_index);
    Ok(())
}
