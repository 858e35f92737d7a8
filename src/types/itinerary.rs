use crate::response_schema;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::{lenient, request::BudgetTier};

/// Hard ceiling on trip length, in days.
pub const MAX_TRIP_DAYS: u32 = 30;

/// Characters of raw model text kept as the summary of a degraded itinerary.
const FALLBACK_SUMMARY_CHARS: usize = 2000;

/// A latitude/longitude pair. Both halves are always present.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Coordinates {
    /// Latitude in decimal degrees, -90 to 90
    pub lat: f64,
    /// Longitude in decimal degrees, -180 to 180
    pub lng: f64,
}

impl Coordinates {
    /// Returns `None` when either component is out of range or not finite.
    pub fn new(lat: f64, lng: f64) -> Option<Self> {
        let valid = lat.is_finite()
            && lng.is_finite()
            && (-90.0..=90.0).contains(&lat)
            && (-180.0..=180.0).contains(&lng);
        valid.then_some(Self { lat, lng })
    }
}

/// One scheduled activity within a day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    /// Time-of-day label such as "09:00 AM"; kept as free text
    #[serde(default, deserialize_with = "lenient::text")]
    #[schemars(with = "String")]
    pub time: String,
    /// Short activity name
    #[serde(default, deserialize_with = "lenient::text")]
    #[schemars(with = "String")]
    pub title: String,
    /// Long-form description with tips and context
    #[serde(default, deserialize_with = "lenient::text")]
    #[schemars(with = "String")]
    pub description: String,
    /// Place name, optionally with an address
    #[serde(default, deserialize_with = "lenient::text")]
    #[schemars(with = "String")]
    pub location: String,
    /// GPS position of the location, when known
    #[serde(
        default,
        deserialize_with = "lenient::coordinates",
        skip_serializing_if = "Option::is_none"
    )]
    #[schemars(with = "Option<Coordinates>")]
    pub coordinates: Option<Coordinates>,
    /// Estimated cost in USD
    #[serde(default, deserialize_with = "lenient::amount")]
    #[schemars(with = "f64")]
    pub cost: f64,
    /// Duration label such as "2 hours"
    #[serde(default, deserialize_with = "lenient::text")]
    #[schemars(with = "String")]
    pub duration: String,
}

/// A meal suggestion for a day.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Meal {
    /// breakfast, lunch, dinner, or any other label
    #[serde(rename = "type", default, deserialize_with = "lenient::text")]
    #[schemars(with = "String")]
    pub meal_type: String,
    /// Dish or restaurant suggestion
    #[serde(default, deserialize_with = "lenient::text")]
    #[schemars(with = "String")]
    pub suggestion: String,
    /// Restaurant name or area
    #[serde(default, deserialize_with = "lenient::text")]
    #[schemars(with = "String")]
    pub location: String,
    /// Estimated cost in USD
    #[serde(default, deserialize_with = "lenient::amount")]
    #[schemars(with = "f64")]
    pub estimated_cost: f64,
}

/// Everything planned for one day of the trip.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct DayPlan {
    /// 1-based day counter
    #[serde(default, deserialize_with = "lenient::count")]
    #[schemars(with = "u32")]
    pub day: u32,
    /// Date label, usually YYYY-MM-DD
    #[serde(default, deserialize_with = "lenient::text")]
    #[schemars(with = "String")]
    pub date: String,
    /// Activities in chronological order
    #[serde(default, deserialize_with = "lenient::objects")]
    #[schemars(with = "Vec<Activity>")]
    pub activities: Vec<Activity>,
    /// Meal suggestions in chronological order
    #[serde(default, deserialize_with = "lenient::objects")]
    #[schemars(with = "Vec<Meal>")]
    pub meals: Vec<Meal>,
    /// Hotel or stay suggestion
    #[serde(default, deserialize_with = "lenient::text")]
    #[schemars(with = "String")]
    pub accommodation: String,
    /// Estimated spend for the day; not reconciled with activity and meal costs
    #[serde(default, deserialize_with = "lenient::amount")]
    #[schemars(with = "f64")]
    pub estimated_cost: f64,
}

/// Trip budget split into five fixed buckets.
///
/// The buckets are not required to add up to `ItineraryData::total_estimated_cost`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct BudgetBreakdown {
    #[serde(default, deserialize_with = "lenient::amount")]
    #[schemars(with = "f64")]
    pub accommodation: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    #[schemars(with = "f64")]
    pub food: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    #[schemars(with = "f64")]
    pub activities: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    #[schemars(with = "f64")]
    pub transport: f64,
    #[serde(default, deserialize_with = "lenient::amount")]
    #[schemars(with = "f64")]
    pub miscellaneous: f64,
}

impl BudgetBreakdown {
    /// Rough chart estimate from the trip length and tier alone.
    pub fn estimate(days: u32, tier: &BudgetTier) -> Self {
        let per_day = match tier {
            BudgetTier::Budget => 50.0,
            BudgetTier::Luxury => 400.0,
            BudgetTier::Moderate | BudgetTier::Other(_) => 120.0,
        };
        let total = per_day * f64::from(days.max(1));
        Self {
            accommodation: (total * 0.40).round(),
            food: (total * 0.25).round(),
            activities: (total * 0.15).round(),
            transport: (total * 0.20).round(),
            miscellaneous: 0.0,
        }
    }

    pub fn sum(&self) -> f64 {
        self.accommodation + self.food + self.activities + self.transport + self.miscellaneous
    }
}

/// Structured itinerary returned by the language model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[response_schema(name = "ItineraryData")]
#[serde(rename_all = "camelCase")]
pub struct ItineraryData {
    /// Brief overview of the trip
    #[serde(default, deserialize_with = "lenient::text")]
    #[schemars(with = "String")]
    pub summary: String,
    /// Estimated cost of the whole trip in USD
    #[serde(default, deserialize_with = "lenient::amount")]
    #[schemars(with = "f64")]
    pub total_estimated_cost: f64,
    /// Cost split across accommodation, food, activities, transport and miscellaneous
    #[serde(default, deserialize_with = "lenient::object_or_default")]
    #[schemars(with = "BudgetBreakdown")]
    pub budget_breakdown: BudgetBreakdown,
    /// One entry per day of the trip
    #[serde(deserialize_with = "lenient::objects")]
    #[schemars(with = "Vec<DayPlan>")]
    pub days: Vec<DayPlan>,
}

impl ItineraryData {
    /// The degraded itinerary shown when no JSON could be recovered: raw text as summary, no days.
    pub fn fallback_from_raw(raw: &str) -> Self {
        Self {
            summary: raw.chars().take(FALLBACK_SUMMARY_CHARS).collect(),
            ..Self::default()
        }
    }

    pub fn activities(&self) -> impl Iterator<Item = &Activity> {
        self.days.iter().flat_map(|day| day.activities.iter())
    }

    pub fn activities_mut(&mut self) -> impl Iterator<Item = &mut Activity> {
        self.days.iter_mut().flat_map(|day| day.activities.iter_mut())
    }

    /// Number of activities that carry a coordinate pair.
    pub fn located_activity_count(&self) -> usize {
        self.activities()
            .filter(|activity| activity.coordinates.is_some())
            .count()
    }

    /// Plain-text export of the itinerary.
    pub fn render_text(&self, origin: &str, destination: &str) -> String {
        let mut lines = Vec::new();

        lines.push("Your Travel Itinerary".to_string());
        match origin.trim() {
            "" => lines.push(destination.to_string()),
            from => lines.push(format!("{} to {}", from, destination)),
        }
        lines.push(String::new());
        lines.push(self.summary.clone());
        lines.push(String::new());
        lines.push(format!("Total Estimated Cost: ${}", self.total_estimated_cost));

        for day in &self.days {
            lines.push(String::new());
            lines.push(format!("DAY {} - {}", day.day, day.date));
            lines.push("-".repeat(50));

            for activity in &day.activities {
                lines.push(format!("{} - {}", activity.time, activity.title));
                lines.push(format!("Location: {}", activity.location));
                lines.push(format!("Duration: {}", activity.duration));
                lines.push(format!("Cost: ${}", activity.cost));
                lines.push(activity.description.clone());
                lines.push(String::new());
            }

            lines.push("Meals:".to_string());
            for meal in &day.meals {
                lines.push(format!(
                    "{}: {} at {} (${})",
                    meal.meal_type, meal.suggestion, meal.location, meal.estimated_cost
                ));
            }
            lines.push(String::new());
            lines.push(format!("Accommodation: {}", day.accommodation));
            lines.push(format!("Day Total: ${}", day.estimated_cost));
        }

        lines.join("\n").trim().to_string()
    }
}
