pub mod itinerary;
pub mod lenient;
pub mod request;
pub mod response;
pub mod result;
pub mod view;

pub use itinerary::{
    Activity, BudgetBreakdown, Coordinates, DayPlan, ItineraryData, Meal, MAX_TRIP_DAYS,
};
pub use request::{clamp_days, parse_days, BudgetTier, ItineraryRequest};
pub use response::deserialize_response;
pub use result::{PipelineOutcome, PipelineRun};
pub use view::{DaySection, StructuredView};
