use serde_json::json;
use trip_planner_rs::{
    schema::{validate_against_schema, ResponseSchema},
    ItineraryData, ItineraryPipeline, PipelineState, Validator,
};

#[test]
fn test_schema_has_correct_structure() {
    let schema = ItineraryData::schema().schema_json();

    assert_eq!(schema["type"], "object");
    assert!(schema["properties"].is_object());

    let props = schema["properties"].as_object().unwrap();
    assert!(props.contains_key("summary"));
    assert!(props.contains_key("totalEstimatedCost"));
    assert!(props.contains_key("budgetBreakdown"));
    assert!(props.contains_key("days"));

    assert_eq!(schema["required"], json!(["days"]));
}

#[test]
fn test_schema_descriptions_come_from_docs() {
    let schema = ItineraryData::schema().schema_json();
    assert_eq!(
        schema["properties"]["summary"]["description"],
        "Brief overview of the trip"
    );
}

#[test]
fn test_strict_rejects_wrong_types() {
    let payload = json!({
        "days": [{"day": "first", "activities": "lots"}]
    });

    let err = validate_against_schema(ItineraryData::schema(), &payload).unwrap_err();
    assert_eq!(err.error_code(), "VALIDATION_FAILURE");

    assert!(Validator::Strict.validate(&payload).is_err());
}

#[test]
fn test_minimal_accepts_loose_numbers_strict_does_not() {
    let payload = json!({
        "summary": "Loose",
        "totalEstimatedCost": "$1,200",
        "days": [{"day": 1, "estimatedCost": "80"}]
    });

    let itinerary = Validator::Minimal.validate(&payload).unwrap();
    assert_eq!(itinerary.total_estimated_cost, 1200.0);
    assert_eq!(itinerary.days[0].estimated_cost, 80.0);

    assert!(Validator::Strict.validate(&payload).is_err());
}

#[test]
fn test_nulls_are_treated_as_missing() {
    let payload = json!({
        "summary": null,
        "days": [{"day": 1, "accommodation": null, "activities": [{"title": "Walk", "coordinates": null}]}]
    });

    let itinerary = Validator::Strict.validate(&payload).unwrap();
    assert_eq!(itinerary.summary, "");
    assert!(itinerary.days[0].activities[0].coordinates.is_none());
}

#[test]
fn test_strict_pipeline_degrades_to_view() {
    let raw = "{\"days\": [{\"day\": \"one\"}]}\nDay 1: Arrival\nHotel";
    let run = ItineraryPipeline::new()
        .with_validator(Validator::Strict)
        .process(raw);

    assert_eq!(run.terminal_state(), Some(PipelineState::PartialView));
    assert!(run
        .warnings
        .iter()
        .any(|warning| warning.starts_with("VALIDATION_FAILURE")));
}
