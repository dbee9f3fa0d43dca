mod beat_grid;
mod catalog;
mod progression;
mod scene;
mod timeline;

pub use beat_grid::{BeatGrid, Interval};
pub use catalog::SceneCatalog;
pub use progression::{ProgressionPlan, Stage};
pub use scene::{Category, Scene};
pub use timeline::{EditSegment, EditTimeline};

pub(crate) use timeline::EPSILON;
