pub mod decompose;
pub mod summarize;
pub mod utils;

pub use decompose::{LlmQuestionGenerator, QuestionGenerator};
pub use summarize::{ResponseSynthesizer, EMPTY_RESPONSE};
