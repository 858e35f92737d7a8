use serde_json::Value;
use tracing::debug;

use super::validation::{validate_against_schema, validate_minimal_shape};
use crate::{
    schemas::ResponseSchema,
    types::{deserialize_response, lenient::strip_nulls, ItineraryData},
    Result,
};

/// Validation strategies for parsed model payloads
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Validator {
    /// Shape check (`days` is an array) followed by lenient typed conversion;
    /// only the shape check can fail
    #[default]
    Minimal,
    /// Also validate against the full generated `ItineraryData` schema
    Strict,
}

impl Validator {
    /// Validate a parsed payload and convert it into `ItineraryData`.
    ///
    /// Missing fields take their defaults; nothing except defaults is filled in.
    pub fn validate(&self, payload: &Value) -> Result<ItineraryData> {
        validate_minimal_shape(payload)?;

        let cleaned = strip_nulls(payload.clone());
        if *self == Validator::Strict {
            validate_against_schema(ItineraryData::schema(), &cleaned)?;
        }

        let itinerary: ItineraryData = deserialize_response(&cleaned)?;
        debug!(
            target: "tripplanner::schema",
            mode = ?self,
            days = itinerary.days.len(),
            "Payload converted to ItineraryData"
        );
        Ok(itinerary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BudgetBreakdown;
    use serde_json::json;

    #[test]
    fn empty_days_is_a_valid_itinerary() {
        let itinerary = Validator::Minimal.validate(&json!({"days": []})).unwrap();
        assert!(itinerary.days.is_empty());
        assert_eq!(itinerary.summary, "");
    }

    #[test]
    fn non_array_days_fails() {
        let err = Validator::Minimal
            .validate(&json!({"days": "none"}))
            .unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILURE");
    }

    #[test]
    fn nulls_take_defaults() {
        let payload = json!({
            "summary": null,
            "days": [{"day": 1, "accommodation": null, "activities": [{"title": "Walk", "coordinates": null}]}]
        });
        let itinerary = Validator::Minimal.validate(&payload).unwrap();
        assert_eq!(itinerary.days[0].accommodation, "");
        assert!(itinerary.days[0].activities[0].coordinates.is_none());
    }

    #[test]
    fn minimal_accepts_what_strict_rejects() {
        let payload = json!({"totalEstimatedCost": "$1,200", "days": []});
        let itinerary = Validator::Minimal.validate(&payload).unwrap();
        assert_eq!(itinerary.total_estimated_cost, 1200.0);

        assert!(Validator::Strict.validate(&payload).is_err());
    }

    #[test]
    fn scalar_text_fields_are_stringified() {
        let payload = json!({
            "summary": "Paris",
            "days": [{"day": 1, "activities": [{"title": "Louvre", "location": "Paris", "duration": 2, "time": 9}]}]
        });

        let itinerary = Validator::Minimal.validate(&payload).unwrap();
        let activity = &itinerary.days[0].activities[0];
        assert_eq!(activity.duration, "2");
        assert_eq!(activity.time, "9");

        assert!(Validator::Strict.validate(&payload).is_err());
    }

    #[test]
    fn non_array_meals_become_empty() {
        let payload = json!({"days": [{"day": 1, "meals": {"lunch": "Cafe"}, "activities": ["Louvre", {"title": "Orsay"}]}]});

        let itinerary = Validator::Minimal.validate(&payload).unwrap();
        assert!(itinerary.days[0].meals.is_empty());
        assert_eq!(itinerary.days[0].activities.len(), 1);
        assert_eq!(itinerary.days[0].activities[0].title, "Orsay");
    }

    #[test]
    fn odd_breakdown_and_days_entries_are_tolerated() {
        let payload = json!({"budgetBreakdown": "about $500", "days": ["Day 1", {"day": 2}]});

        let itinerary = Validator::Minimal.validate(&payload).unwrap();
        assert_eq!(itinerary.budget_breakdown, BudgetBreakdown::default());
        assert_eq!(itinerary.days.len(), 1);
        assert_eq!(itinerary.days[0].day, 2);
    }

    #[test]
    fn does_not_invent_fields() {
        let payload = json!({"days": [{"activities": [{"title": "Museum"}]}]});
        let itinerary = Validator::Strict.validate(&payload).unwrap();
        let activity = &itinerary.days[0].activities[0];
        assert_eq!(itinerary.days[0].day, 0);
        assert_eq!(activity.location, "");
        assert_eq!(activity.cost, 0.0);
        assert_eq!(activity.time, "");
    }
}
