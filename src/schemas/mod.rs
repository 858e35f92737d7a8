pub mod enrich;
pub mod schema;
pub mod validation;
pub mod validator;

pub use enrich::{enrich_coordinates, EnrichmentReport};
pub use schema::{apply_doc_comments, ResponseSchema, SchemaHandle};
pub use validation::{validate_against_schema, validate_minimal_shape};
pub use validator::Validator;
