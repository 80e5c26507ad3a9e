use quill_llm::CompletionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    #[error("AI configuration not set")]
    Configuration,

    #[error(transparent)]
    Remote(#[from] CompletionError),

    #[error("AI response does not contain an answer")]
    EmptyResponse,
}
