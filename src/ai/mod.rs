pub mod openai_client;
pub mod prompt;
pub mod response;

pub use openai_client::{CompletionClient, CompletionRequest, OpenAiClient};
pub use prompt::{Prompt, PromptBuilder, JSON_END_MARKER, JSON_START_MARKER};
pub use response::{ExtractError, Extraction, ResponseExtractor};
