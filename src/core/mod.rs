pub mod pipeline;
pub mod stages;
pub mod trace;

pub use crate::types::result::{PipelineOutcome, PipelineRun};
pub use pipeline::ItineraryPipeline;
pub use stages::{PipelineState, StageRecord};
pub use trace::StageTrace;
