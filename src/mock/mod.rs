pub mod generator;

pub use generator::{generate, generate_at, MockGenerator, MockParams};
