use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::error::DirectorError;
use crate::models::{Category, Scene};

/// Immutable pool of classified scenes, bucketed by category.
///
/// Built once from the classifier's flat output; the Director only ever
/// reads from it. Per-run consumption state lives in the Director's own
/// cursors, never here, so a catalog can back any number of runs.
///
/// On the wire the catalog is the classifier's flat scene list;
/// deserialization funnels through `SceneCatalog::new` and its validation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "Vec<Scene>", into = "Vec<Scene>")]
pub struct SceneCatalog {
    scenes: Vec<Scene>,
    by_category: BTreeMap<Category, Vec<usize>>,
    by_id: HashMap<String, usize>,
}

impl SceneCatalog {
    /// Group a flat classified scene list into category buckets.
    ///
    /// Fails fast with `MalformedInput` on invalid scenes (empty or
    /// negative spans, non-finite bounds, confidence outside [0,1]) and on
    /// duplicate ids, since every scene must land in exactly one bucket.
    pub fn new(scenes: Vec<Scene>) -> Result<Self, DirectorError> {
        let mut by_category: BTreeMap<Category, Vec<usize>> = BTreeMap::new();
        let mut by_id = HashMap::with_capacity(scenes.len());

        for (idx, scene) in scenes.iter().enumerate() {
            validate_scene(scene)?;
            if by_id.insert(scene.id.clone(), idx).is_some() {
                return Err(DirectorError::MalformedInput(format!(
                    "duplicate scene id: {}",
                    scene.id
                )));
            }
            by_category.entry(scene.category).or_default().push(idx);
        }

        Ok(Self {
            scenes,
            by_category,
            by_id,
        })
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }

    /// All scenes in insertion order.
    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn get(&self, id: &str) -> Option<&Scene> {
        self.by_id.get(id).map(|&idx| &self.scenes[idx])
    }

    /// Categories present in the catalog, ascending.
    pub fn categories(&self) -> impl Iterator<Item = Category> + '_ {
        self.by_category.keys().copied()
    }

    /// Scenes carrying exactly the given category.
    pub fn scenes_in(&self, category: Category) -> impl Iterator<Item = &Scene> {
        self.by_category
            .get(&category)
            .into_iter()
            .flatten()
            .map(|&idx| &self.scenes[idx])
    }
}

impl TryFrom<Vec<Scene>> for SceneCatalog {
    type Error = DirectorError;

    fn try_from(scenes: Vec<Scene>) -> Result<Self, Self::Error> {
        Self::new(scenes)
    }
}

impl From<SceneCatalog> for Vec<Scene> {
    fn from(catalog: SceneCatalog) -> Self {
        catalog.scenes
    }
}

fn validate_scene(scene: &Scene) -> Result<(), DirectorError> {
    if !scene.source_start.is_finite() || !scene.source_end.is_finite() {
        return Err(DirectorError::MalformedInput(format!(
            "scene {}: non-finite source bounds",
            scene.id
        )));
    }
    if scene.source_start < 0.0 || scene.source_end <= scene.source_start {
        return Err(DirectorError::MalformedInput(format!(
            "scene {}: invalid source range {}..{}",
            scene.id, scene.source_start, scene.source_end
        )));
    }
    if !(0.0..=1.0).contains(&scene.confidence) {
        return Err(DirectorError::MalformedInput(format!(
            "scene {}: confidence {} outside [0,1]",
            scene.id, scene.confidence
        )));
    }
    Ok(())
}
