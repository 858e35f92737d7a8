//! trip-planner-rs: turn unreliable language-model output into typed travel itineraries
//!
//! The pipeline locates a JSON object in free-form text, repairs near-valid
//! JSON, validates and enriches it, and degrades to a segmented prose view or
//! an offline mock itinerary when nothing better is available.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use trip_planner_rs::{ItineraryPipeline, ItineraryRequest, ModelClient, PlannerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = PlannerConfig::from_env()?;
//!     let client = ModelClient::from_config(&config);
//!     let request = ItineraryRequest::new("Lisbon")?.with_days(4);
//!
//!     let run = ItineraryPipeline::new().plan(&client, &request).await;
//!     println!("{}", run.replay());
//!     Ok(())
//! }
//! ```

extern crate self as trip_planner_rs;

pub mod config;
pub mod core;
pub mod error;
pub mod gazetteer;
pub mod mock;
pub mod parsing;
pub mod schemas;
pub mod services;
pub mod types;

pub use config::{ConfigOverrides, PlannerConfig};
pub use crate::core::{
    ItineraryPipeline, PipelineOutcome, PipelineRun, PipelineState, StageRecord, StageTrace,
};
pub use error::{PlannerError, Result};
pub use gazetteer::{Gazetteer, GazetteerEntry, PlaceLookup};
pub use mock::{MockGenerator, MockParams};
pub use schemas::{ResponseSchema, SchemaHandle, Validator};
pub use services::{build_itinerary_prompt, build_prose_prompt, ModelClient};
pub use tripplanner_macros::response_schema;
pub use types::{
    Activity, BudgetBreakdown, BudgetTier, Coordinates, DayPlan, DaySection, ItineraryData,
    ItineraryRequest, Meal, StructuredView,
};

pub use schemas as schema;

#[cfg(feature = "cli")]
pub mod cli;
