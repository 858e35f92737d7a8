//! Procedural macros for trip-planner-rs.
//!
//! `#[response_schema]` derives a cached JSON schema handle for a model
//! response type so the prompt builder and the strict validator share one
//! schema document.

mod response_schema;
mod schema_extraction;

use proc_macro::TokenStream;

/// Implements `trip_planner_rs::schema::ResponseSchema` for a named struct.
///
/// The struct must also derive `schemars::JsonSchema` and `serde::Deserialize`.
/// Optional arguments: `name = "..."`, `description = "..."`. Doc comments on
/// the struct and its fields fill in any missing schema descriptions.
#[proc_macro_attribute]
pub fn response_schema(attr: TokenStream, item: TokenStream) -> TokenStream {
    response_schema::response_schema(attr, item)
}
