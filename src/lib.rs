//! Beat-synchronized edit planning.
//!
//! Takes a catalog of classified clip excerpts, the beat grid of a music
//! track and an intensity progression, and assigns an excerpt to every
//! beat interval so the finished edit covers the track exactly. Scene
//! detection, classification, beat extraction and rendering live outside
//! this crate; they exchange plain serializable data with it.
//!
//! ```
//! use beatcut::{
//!     BeatGrid, Category, Director, ProgressionPlan, Scene, SceneCatalog, Variety,
//! };
//!
//! let catalog = SceneCatalog::new(vec![
//!     Scene::new("calm.mp4", 0.0, 8.0, Category(0), 0.9),
//!     Scene::new("wild.mp4", 0.0, 8.0, Category(1), 0.8),
//! ])?;
//! let grid = BeatGrid::new(vec![1.0, 2.0, 3.0], 4.0)?;
//! let plan = ProgressionPlan::uniform(&[Category(0), Category(1)])?;
//!
//! let generation = Director::new(Variety::with_seed(42)).generate(&catalog, &grid, &plan)?;
//! assert_eq!(generation.timeline.segments.len(), 4);
//! # Ok::<(), beatcut::DirectorError>(())
//! ```

mod error;
mod models;
mod services;

pub use error::DirectorError;
pub use models::{
    BeatGrid, Category, EditSegment, EditTimeline, Interval, ProgressionPlan, Scene, SceneCatalog,
    Stage,
};
pub use services::{Director, Generation, GenerationReport, Relaxation, Variety};
