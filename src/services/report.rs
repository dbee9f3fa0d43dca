use serde::Serialize;

use crate::services::selection::Relaxation;

/// Diagnostics for one generation run: how many intervals were filled
/// strictly and how many needed each relaxation level. Relaxation is not
/// an error, but a heavily relaxed run usually means the clip pool is too
/// thin for the track.
#[derive(Debug, Clone, Default, Serialize)]
pub struct GenerationReport {
    pub intervals: usize,
    pub cooldown_dropped: usize,
    pub floor_dropped: usize,
    pub wrap_around: usize,
    pub tail_padded: usize,
    /// Per-interval relaxation level, `None` where the strict rule held.
    pub interval_relaxations: Vec<Option<Relaxation>>,
}

impl GenerationReport {
    pub(crate) fn record(&mut self, relaxation: Option<Relaxation>) {
        self.intervals += 1;
        match relaxation {
            Some(Relaxation::DropCooldown) => self.cooldown_dropped += 1,
            Some(Relaxation::DropCategoryFloor) => self.floor_dropped += 1,
            Some(Relaxation::WrapAround) => self.wrap_around += 1,
            Some(Relaxation::TailPad) => self.tail_padded += 1,
            None => {}
        }
        self.interval_relaxations.push(relaxation);
    }

    pub fn relaxed_intervals(&self) -> usize {
        self.cooldown_dropped + self.floor_dropped + self.wrap_around + self.tail_padded
    }

    pub fn fully_strict(&self) -> bool {
        self.relaxed_intervals() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counts_by_level() {
        let mut report = GenerationReport::default();
        report.record(None);
        report.record(Some(Relaxation::DropCooldown));
        report.record(Some(Relaxation::WrapAround));
        report.record(Some(Relaxation::TailPad));

        assert_eq!(report.intervals, 4);
        assert_eq!(report.cooldown_dropped, 1);
        assert_eq!(report.floor_dropped, 0);
        assert_eq!(report.wrap_around, 1);
        assert_eq!(report.tail_padded, 1);
        assert_eq!(report.relaxed_intervals(), 3);
        assert!(!report.fully_strict());
        assert_eq!(report.interval_relaxations.len(), 4);
    }

    #[test]
    fn test_strict_run() {
        let mut report = GenerationReport::default();
        report.record(None);
        report.record(None);
        assert!(report.fully_strict());
    }
}
