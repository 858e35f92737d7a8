use serde_json::Value;

use crate::{
    error::{PlannerError, Result},
    schemas::ResponseSchema,
};

/// Convert a parsed model payload into `T`, naming the JSON path of the first mismatch.
pub fn deserialize_response<T>(payload: &Value) -> Result<T>
where
    T: ResponseSchema,
{
    serde_path_to_error::deserialize(payload).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        PlannerError::Validation(format!(
            "failed to deserialize `{}` at {}: {}",
            T::schema().schema_name(),
            location,
            err.inner()
        ))
    })
}
