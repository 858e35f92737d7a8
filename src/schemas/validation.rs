use std::sync::LazyLock;

use jsonschema::{Draft, ErrorIterator, JSONSchema};
use serde_json::{json, Value};
use tracing::debug;

use crate::{error::PlannerError, schemas::SchemaHandle};

const MAX_SCHEMA_ERRORS: usize = 3;

static MINIMAL_SHAPE_JSON: LazyLock<Value> = LazyLock::new(|| {
    json!({
        "type": "object",
        "required": ["days"],
        "properties": {
            "days": { "type": "array" }
        }
    })
});

static MINIMAL_SHAPE: LazyLock<JSONSchema> = LazyLock::new(|| {
    JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(&MINIMAL_SHAPE_JSON)
        .expect("minimal itinerary schema compiles")
});

/// Check that a parsed payload is an object whose `days` member is an array.
pub fn validate_minimal_shape(payload: &Value) -> std::result::Result<(), PlannerError> {
    if let Err(errors) = MINIMAL_SHAPE.validate(payload) {
        return Err(PlannerError::Validation(format!(
            "payload is not an itinerary: {}",
            describe_errors(errors)
        )));
    }
    Ok(())
}

/// Validate a structured payload against a generated schema
pub fn validate_against_schema(
    schema: &SchemaHandle,
    payload: &Value,
) -> std::result::Result<(), PlannerError> {
    let validator = JSONSchema::options()
        .with_draft(Draft::Draft7)
        .compile(schema.schema_json())
        .map_err(|err| {
            PlannerError::Validation(format!(
                "Failed to prepare `{}` schema for validation: {}",
                schema.schema_name(),
                err
            ))
        })?;

    if let Err(errors) = validator.validate(payload) {
        return Err(PlannerError::Validation(format!(
            "Structured payload does not match `{}` schema: {}",
            schema.schema_name(),
            describe_errors(errors)
        )));
    }

    debug!(
        target: "tripplanner::schema",
        schema = schema.schema_name(),
        "Payload passed strict schema validation"
    );
    Ok(())
}

fn describe_errors(errors: ErrorIterator<'_>) -> String {
    let mut details = Vec::new();
    let mut truncated = false;

    for (idx, error) in errors.enumerate() {
        if idx < MAX_SCHEMA_ERRORS {
            let mut path = error.instance_path.to_string();
            if path.is_empty() {
                path = "<root>".to_string();
            }
            details.push(format!("{}: {}", path, error));
        } else {
            truncated = true;
            break;
        }
    }

    let mut detail_str = if details.is_empty() {
        "payload failed schema validation".to_string()
    } else {
        details.join("; ")
    };

    if truncated {
        detail_str.push_str("; additional errors truncated");
    }

    detail_str
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{schema::ResponseSchema, types::ItineraryData};

    #[test]
    fn days_must_be_an_array() {
        let err = validate_minimal_shape(&json!({"days": "none"})).unwrap_err();
        assert_eq!(err.error_code(), "VALIDATION_FAILURE");
        assert!(err.to_string().contains("/days"));

        assert!(validate_minimal_shape(&json!({"days": []})).is_ok());
    }

    #[test]
    fn non_objects_fail_at_root() {
        for payload in [json!([]), json!("text"), json!(null), json!({"summary": "x"})] {
            let err = validate_minimal_shape(&payload).unwrap_err();
            assert!(err.to_string().contains("<root>"), "{}", err);
        }
    }

    #[test]
    fn strict_schema_rejects_string_costs() {
        let schema = ItineraryData::schema();
        let strict_ok = json!({"summary": "ok", "totalEstimatedCost": 10, "days": []});
        assert!(validate_against_schema(schema, &strict_ok).is_ok());

        let loose = json!({"totalEstimatedCost": "$10", "days": []});
        let err = validate_against_schema(schema, &loose).unwrap_err();
        assert!(err.to_string().contains("/totalEstimatedCost"), "{}", err);
    }

    #[test]
    fn error_list_is_truncated() {
        let schema = ItineraryData::schema();
        let payload = json!({
            "summary": 1,
            "totalEstimatedCost": "a",
            "budgetBreakdown": "b",
            "days": [{"day": "one", "date": 5}]
        });
        let err = validate_against_schema(schema, &payload).unwrap_err();
        assert!(err.to_string().contains("additional errors truncated"));
    }
}
