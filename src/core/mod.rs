pub mod model;
pub mod stager;

pub use model::{OutputRecord, QcEntry, QcStatus, SampleInfo};
pub use stager::{StageSummary, Stager};
