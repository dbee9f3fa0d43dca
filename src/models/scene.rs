use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Ordinal intensity label attached to a scene. Higher values mean more
/// intense/energetic footage. The progression plan expresses its floors in
/// the same scale.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Category(pub u8);

impl Category {
    /// Ordering key for floor-relaxed selection: prefer the closest
    /// category below the floor, then the closest above.
    pub(crate) fn distance_from(self, floor: Category) -> (u8, u8) {
        if self <= floor {
            (0, floor.0 - self.0)
        } else {
            (1, self.0 - floor.0)
        }
    }
}

/// A single candidate excerpt: a classified stretch of a source video.
///
/// Produced once by the upstream classifier and immutable afterwards. The
/// `confidence` score is only ever a tie-break, never a hard filter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Scene {
    pub id: String,
    pub source_file: String,
    pub source_start: f64,
    pub source_end: f64,
    pub category: Category,
    pub confidence: f64,
}

impl Scene {
    pub fn new(
        source_file: impl Into<String>,
        source_start: f64,
        source_end: f64,
        category: Category,
        confidence: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            source_file: source_file.into(),
            source_start,
            source_end,
            category,
            confidence,
        }
    }

    /// Total usable span of this scene in seconds.
    pub fn duration(&self) -> f64 {
        self.source_end - self.source_start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration() {
        let scene = Scene::new("a.mp4", 2.0, 7.5, Category(1), 0.8);
        assert!((scene.duration() - 5.5).abs() < 1e-9);
    }

    #[test]
    fn test_new_assigns_unique_ids() {
        let a = Scene::new("a.mp4", 0.0, 1.0, Category(0), 0.5);
        let b = Scene::new("a.mp4", 0.0, 1.0, Category(0), 0.5);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn test_category_ordering() {
        assert!(Category(0) < Category(2));
        assert_eq!(Category(1).distance_from(Category(3)), (0, 2));
        assert_eq!(Category(3).distance_from(Category(3)), (0, 0));
        assert_eq!(Category(5).distance_from(Category(3)), (1, 2));
        // Closest below beats anything above.
        assert!(Category(0).distance_from(Category(3)) < Category(4).distance_from(Category(3)));
    }
}
