mod director;
mod report;
mod selection;

pub use director::{Director, Generation, Variety};
pub use report::GenerationReport;
pub use selection::Relaxation;
