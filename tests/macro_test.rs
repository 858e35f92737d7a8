use schemars::JsonSchema;
use serde::Deserialize;
use serde_json::json;
use trip_planner_rs::{response_schema, schema::ResponseSchema, types::deserialize_response};

/// A short packing list returned by the model
#[derive(Debug, Deserialize, JsonSchema)]
#[response_schema(name = "PackingList")]
#[serde(rename_all = "camelCase")]
struct PackingList {
    /// Items to bring
    items: Vec<String>,
    /// Whether the destination needs a plug adapter
    #[serde(default)]
    needs_adapter: bool,
}

#[derive(Debug, Deserialize, JsonSchema)]
#[response_schema]
#[allow(dead_code)]
struct WeatherNote {
    forecast: String,
}

#[test]
fn test_macro_generated_schema() {
    let handle = PackingList::schema();

    assert_eq!(handle.schema_name(), "PackingList");
    assert_eq!(handle.type_name(), "PackingList");

    let schema = handle.schema_json();
    assert_eq!(schema["title"], "PackingList");
    assert_eq!(schema["description"], "A short packing list returned by the model");
    assert_eq!(schema["properties"]["items"]["description"], "Items to bring");
    assert_eq!(
        schema["properties"]["needsAdapter"]["description"],
        "Whether the destination needs a plug adapter"
    );
}

#[test]
fn test_macro_schema_is_cached() {
    assert!(std::ptr::eq(PackingList::schema(), PackingList::schema()));
}

#[test]
fn test_macro_default_name() {
    assert_eq!(WeatherNote::schema().schema_name(), "WeatherNote");
    assert_eq!(WeatherNote::schema().property_names(), vec!["forecast"]);
}

#[test]
fn test_macro_type_deserializes_responses() {
    let list: PackingList = deserialize_response(&json!({"items": ["passport"]})).unwrap();
    assert_eq!(list.items, vec!["passport"]);
    assert!(!list.needs_adapter);

    let err = deserialize_response::<PackingList>(&json!({"items": [1]})).unwrap_err();
    assert!(err.to_string().contains("items[0]"));
}
