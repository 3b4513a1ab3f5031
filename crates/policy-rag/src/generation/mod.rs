//! Answer generation, prompts and citation handling

pub mod answerer;
pub mod citation;
pub mod prompt;

pub use answerer::Answerer;
pub use citation::{referenced_pages, truncate_excerpt};
pub use prompt::PromptBuilder;
