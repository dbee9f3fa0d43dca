use std::cmp::Ordering;

use serde::Serialize;

use crate::models::{Category, Scene, SceneCatalog, EPSILON};

/// Which constraint had to be loosened to fill an interval. Levels are
/// tried strictly in this order; `None` on a pick means the strict rule
/// held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Relaxation {
    /// Cooldown spacing ignored.
    DropCooldown,
    /// Category floor ignored too; closest category below the floor wins.
    DropCategoryFloor,
    /// Scene footage re-used from its start after exhaustion.
    WrapAround,
    /// No scene spans the interval; it was tiled with a repeated tail.
    TailPad,
}

/// Per-run consumption state for one scene. Owned exclusively by a single
/// generation run; the catalog itself stays untouched.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct SceneCursor {
    /// Seconds already excised from the front of the scene's span.
    pub consumed: f64,
    /// Interval index of the most recent use, for cooldown spacing.
    pub last_used: Option<usize>,
}

impl SceneCursor {
    pub fn remaining(&self, scene: &Scene) -> f64 {
        scene.duration() - self.consumed
    }

    pub fn in_cooldown(&self, interval: usize, cooldown: usize) -> bool {
        match self.last_used {
            Some(last) => interval - last <= cooldown,
            None => false,
        }
    }
}

/// A selection decision for one interval.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Pick {
    pub scene_idx: usize,
    pub relaxation: Option<Relaxation>,
}

/// One rung of the fallback ladder: which constraints are still enforced.
struct Pass {
    relaxation: Option<Relaxation>,
    enforce_cooldown: bool,
    enforce_floor: bool,
    /// When set, a scene qualifies on its whole span instead of its
    /// unconsumed remainder (the caller rewinds the cursor).
    whole_span: bool,
}

const LADDER: [Pass; 4] = [
    Pass {
        relaxation: None,
        enforce_cooldown: true,
        enforce_floor: true,
        whole_span: false,
    },
    Pass {
        relaxation: Some(Relaxation::DropCooldown),
        enforce_cooldown: false,
        enforce_floor: true,
        whole_span: false,
    },
    Pass {
        relaxation: Some(Relaxation::DropCategoryFloor),
        enforce_cooldown: false,
        enforce_floor: false,
        whole_span: false,
    },
    Pass {
        relaxation: Some(Relaxation::WrapAround),
        enforce_cooldown: false,
        enforce_floor: false,
        whole_span: true,
    },
];

/// Pick a scene for one interval, walking the fallback ladder until a
/// rung yields a candidate. Returns `None` only when no scene's whole
/// span covers the interval, in which case the caller must pad.
pub(crate) fn choose(
    catalog: &SceneCatalog,
    cursors: &[SceneCursor],
    ranks: &[usize],
    interval: usize,
    duration: f64,
    floor: Category,
    cooldown: usize,
) -> Option<Pick> {
    for pass in &LADDER {
        let best = catalog
            .scenes()
            .iter()
            .enumerate()
            .filter(|(idx, scene)| {
                let available = if pass.whole_span {
                    scene.duration()
                } else {
                    cursors[*idx].remaining(scene)
                };
                if available + EPSILON < duration {
                    return false;
                }
                if pass.enforce_cooldown && cursors[*idx].in_cooldown(interval, cooldown) {
                    return false;
                }
                !pass.enforce_floor || scene.category >= floor
            })
            .min_by(|(a_idx, a), (b_idx, b)| {
                candidate_order(a, ranks[*a_idx], b, ranks[*b_idx], floor, pass.enforce_floor)
            });

        if let Some((scene_idx, _)) = best {
            return Some(Pick {
                scene_idx,
                relaxation: pass.relaxation,
            });
        }
    }
    None
}

/// Total order over eligible candidates.
///
/// With the floor enforced: lowest sufficient category first, so intense
/// footage is held back for later intervals. With the floor dropped:
/// closest category below the floor first, then closest above. Confidence
/// breaks category ties, the seeded shuffle rank breaks the rest.
fn candidate_order(
    a: &Scene,
    a_rank: usize,
    b: &Scene,
    b_rank: usize,
    floor: Category,
    floor_enforced: bool,
) -> Ordering {
    let by_category = if floor_enforced {
        a.category.cmp(&b.category)
    } else {
        a.category
            .distance_from(floor)
            .cmp(&b.category.distance_from(floor))
    };
    by_category
        .then_with(|| b.confidence.total_cmp(&a.confidence))
        .then_with(|| a_rank.cmp(&b_rank))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene(cat: u8, len: f64, confidence: f64) -> Scene {
        Scene::new("clip.mp4", 0.0, len, Category(cat), confidence)
    }

    fn run_choose(
        catalog: &SceneCatalog,
        cursors: &[SceneCursor],
        interval: usize,
        floor: u8,
        cooldown: usize,
    ) -> Option<Pick> {
        let ranks: Vec<usize> = (0..catalog.len()).collect();
        choose(
            catalog,
            cursors,
            &ranks,
            interval,
            1.0,
            Category(floor),
            cooldown,
        )
    }

    #[test]
    fn test_prefers_lowest_sufficient_category() {
        let catalog =
            SceneCatalog::new(vec![scene(2, 5.0, 0.9), scene(1, 5.0, 0.5), scene(0, 5.0, 0.9)])
                .unwrap();
        let cursors = vec![SceneCursor::default(); 3];
        let pick = run_choose(&catalog, &cursors, 0, 1, 1).unwrap();
        assert_eq!(pick.scene_idx, 1);
        assert!(pick.relaxation.is_none());
    }

    #[test]
    fn test_confidence_breaks_category_ties() {
        let catalog =
            SceneCatalog::new(vec![scene(1, 5.0, 0.4), scene(1, 5.0, 0.8)]).unwrap();
        let cursors = vec![SceneCursor::default(); 2];
        let pick = run_choose(&catalog, &cursors, 0, 0, 1).unwrap();
        assert_eq!(pick.scene_idx, 1);
    }

    #[test]
    fn test_cooldown_blocks_then_relaxes() {
        let catalog = SceneCatalog::new(vec![scene(0, 5.0, 0.9), scene(0, 5.0, 0.2)]).unwrap();
        let mut cursors = vec![SceneCursor::default(); 2];
        cursors[0].last_used = Some(0);

        // Second scene is free, no relaxation needed.
        let pick = run_choose(&catalog, &cursors, 1, 0, 2).unwrap();
        assert_eq!(pick.scene_idx, 1);
        assert!(pick.relaxation.is_none());

        // Both cooling down: the cooldown is the first constraint dropped.
        cursors[1].last_used = Some(1);
        let pick = run_choose(&catalog, &cursors, 2, 0, 2).unwrap();
        assert_eq!(pick.relaxation, Some(Relaxation::DropCooldown));
    }

    #[test]
    fn test_floor_relaxation_prefers_closest_below() {
        // Nothing at or above floor 3; category 2 is closer below than 0.
        let catalog = SceneCatalog::new(vec![scene(0, 5.0, 0.9), scene(2, 5.0, 0.1)]).unwrap();
        let cursors = vec![SceneCursor::default(); 2];
        let pick = run_choose(&catalog, &cursors, 0, 3, 1).unwrap();
        assert_eq!(pick.scene_idx, 1);
        assert_eq!(pick.relaxation, Some(Relaxation::DropCategoryFloor));
    }

    #[test]
    fn test_wrap_around_when_footage_spent() {
        let catalog = SceneCatalog::new(vec![scene(0, 1.0, 0.9)]).unwrap();
        let mut cursors = vec![SceneCursor::default(); 1];
        cursors[0].consumed = 1.0;
        cursors[0].last_used = Some(0);
        let pick = run_choose(&catalog, &cursors, 1, 0, 1).unwrap();
        assert_eq!(pick.relaxation, Some(Relaxation::WrapAround));
    }

    #[test]
    fn test_none_when_no_span_fits() {
        let catalog = SceneCatalog::new(vec![scene(0, 0.4, 0.9)]).unwrap();
        let cursors = vec![SceneCursor::default(); 1];
        assert!(run_choose(&catalog, &cursors, 0, 0, 1).is_none());
    }
}
