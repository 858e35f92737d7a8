pub mod model_client;
pub mod prompt;

pub use model_client::{extract_response_text, ModelClient, DEFAULT_BASE_URL};
pub use prompt::{build_itinerary_prompt, build_prose_prompt};
