use serde::{Deserialize, Serialize};

use crate::error::DirectorError;
use crate::models::Category;

/// One stage of the progression: the minimum category that applies to all
/// intervals whose position fraction falls before `end_fraction`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Stage {
    pub end_fraction: f64,
    pub min_category: Category,
}

/// Policy describing how the minimum acceptable category rises as the
/// timeline advances, e.g. "first half: at least category 0, second half:
/// at least category 1".
///
/// Fractions are cumulative stage end boundaries, strictly increasing and
/// at most 1. If the last stage ends before 1, it extends to the end of
/// the grid.
///
/// Deserialization funnels through `ProgressionPlan::new`, so a malformed
/// plan is rejected at the input boundary rather than mid-run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "RawProgressionPlan")]
pub struct ProgressionPlan {
    stages: Vec<Stage>,
}

#[derive(Deserialize)]
struct RawProgressionPlan {
    stages: Vec<Stage>,
}

impl TryFrom<RawProgressionPlan> for ProgressionPlan {
    type Error = DirectorError;

    fn try_from(raw: RawProgressionPlan) -> Result<Self, Self::Error> {
        Self::new(raw.stages)
    }
}

impl ProgressionPlan {
    pub fn new(stages: Vec<Stage>) -> Result<Self, DirectorError> {
        if stages.is_empty() {
            return Err(DirectorError::MalformedInput(
                "progression plan has no stages".to_string(),
            ));
        }
        for (i, stage) in stages.iter().enumerate() {
            if !stage.end_fraction.is_finite()
                || stage.end_fraction <= 0.0
                || stage.end_fraction > 1.0
            {
                return Err(DirectorError::MalformedInput(format!(
                    "stage {i}: end fraction {} outside (0, 1]",
                    stage.end_fraction
                )));
            }
            if i > 0 {
                if stage.end_fraction <= stages[i - 1].end_fraction {
                    return Err(DirectorError::MalformedInput(format!(
                        "stage {i}: end fractions not increasing"
                    )));
                }
                if stage.min_category < stages[i - 1].min_category {
                    return Err(DirectorError::MalformedInput(format!(
                        "stage {i}: category floor decreases"
                    )));
                }
            }
        }
        Ok(Self { stages })
    }

    /// Equal-width stages, one per category, in the given order. This is
    /// the classic escalation: each category gets the same share of the
    /// timeline.
    pub fn uniform(categories: &[Category]) -> Result<Self, DirectorError> {
        let count = categories.len();
        let stages = categories
            .iter()
            .enumerate()
            .map(|(i, &cat)| Stage {
                end_fraction: (i + 1) as f64 / count as f64,
                min_category: cat,
            })
            .collect();
        Self::new(stages)
    }

    pub fn stages(&self) -> &[Stage] {
        &self.stages
    }

    /// Minimum required category for interval `index` of `count`, keyed by
    /// the interval's start position as a fraction of the interval count.
    pub fn floor_for(&self, index: usize, count: usize) -> Category {
        let position = if count == 0 {
            0.0
        } else {
            index as f64 / count as f64
        };
        for stage in &self.stages {
            if position < stage.end_fraction {
                return stage.min_category;
            }
        }
        // Past the last declared boundary (or exactly on 1.0): the final
        // stage applies.
        self.stages[self.stages.len() - 1].min_category
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_stage() -> ProgressionPlan {
        ProgressionPlan::new(vec![
            Stage {
                end_fraction: 0.5,
                min_category: Category(0),
            },
            Stage {
                end_fraction: 1.0,
                min_category: Category(1),
            },
        ])
        .unwrap()
    }

    #[test]
    fn test_floor_by_interval_position() {
        let plan = two_stage();
        // 4 intervals: first two in stage one, last two in stage two.
        assert_eq!(plan.floor_for(0, 4), Category(0));
        assert_eq!(plan.floor_for(1, 4), Category(0));
        assert_eq!(plan.floor_for(2, 4), Category(1));
        assert_eq!(plan.floor_for(3, 4), Category(1));
    }

    #[test]
    fn test_short_last_stage_extends() {
        let plan = ProgressionPlan::new(vec![Stage {
            end_fraction: 0.3,
            min_category: Category(2),
        }])
        .unwrap();
        assert_eq!(plan.floor_for(9, 10), Category(2));
    }

    #[test]
    fn test_uniform_splits_evenly() {
        let plan = ProgressionPlan::uniform(&[Category(0), Category(1), Category(2)]).unwrap();
        assert_eq!(plan.stages().len(), 3);
        assert_eq!(plan.floor_for(0, 6), Category(0));
        assert_eq!(plan.floor_for(2, 6), Category(1));
        assert_eq!(plan.floor_for(5, 6), Category(2));
    }

    #[test]
    fn test_rejects_empty_plan() {
        assert!(matches!(
            ProgressionPlan::new(vec![]),
            Err(DirectorError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_rejects_non_increasing_fractions() {
        let err = ProgressionPlan::new(vec![
            Stage {
                end_fraction: 0.5,
                min_category: Category(0),
            },
            Stage {
                end_fraction: 0.5,
                min_category: Category(1),
            },
        ])
        .unwrap_err();
        assert!(matches!(err, DirectorError::MalformedInput(_)));
    }

    #[test]
    fn test_rejects_decreasing_categories() {
        let err = ProgressionPlan::new(vec![
            Stage {
                end_fraction: 0.5,
                min_category: Category(2),
            },
            Stage {
                end_fraction: 1.0,
                min_category: Category(1),
            },
        ])
        .unwrap_err();
        assert!(matches!(err, DirectorError::MalformedInput(_)));
    }

    #[test]
    fn test_uniform_rejects_unordered_categories() {
        assert!(ProgressionPlan::uniform(&[Category(1), Category(0)]).is_err());
    }

    #[test]
    fn test_deserialization_rejects_empty_plan() {
        // The wire path must hit the same validation as the constructor;
        // an empty plan would otherwise panic the floor lookup mid-run.
        let err = serde_json::from_str::<ProgressionPlan>(r#"{"stages":[]}"#).unwrap_err();
        assert!(err.to_string().contains("no stages"));
    }

    #[test]
    fn test_deserialization_rejects_decreasing_categories() {
        let json = r#"{"stages":[
            {"end_fraction":0.5,"min_category":2},
            {"end_fraction":1.0,"min_category":1}
        ]}"#;
        assert!(serde_json::from_str::<ProgressionPlan>(json).is_err());
    }

    #[test]
    fn test_deserialization_round_trip() {
        let plan = two_stage();
        let json = serde_json::to_string(&plan).unwrap();
        let parsed: ProgressionPlan = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed.stages(), plan.stages());
    }
}
