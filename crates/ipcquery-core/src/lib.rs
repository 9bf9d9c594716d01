pub mod normalize;
pub mod prompt;
pub mod record;

pub use normalize::normalize;
pub use prompt::{IPC_PROMPT_TEMPLATE, build_prompt};
pub use record::{REQUIRED_FIELDS, RecordError, StructuredRecord};
