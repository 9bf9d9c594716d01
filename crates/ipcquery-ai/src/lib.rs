//! Generation layer: the opaque `generate(prompt) -> text` capability and its Gemini backend.

mod gemini;
mod generator;

pub use gemini::{DEFAULT_BASE_URL, DEFAULT_MODEL, GeminiClient, GeminiConfig};
pub use generator::{GenerateError, Generator};
