pub mod content;
pub mod expressions;
pub mod language;
pub mod lesson;
pub mod llm_client;
pub mod opinion;
pub mod prompts;

pub use expressions::{KeyExpression, SchemaError};
pub use language::LanguageTag;
pub use opinion::{OpinionError, OpinionProcessingService, OpinionSubmission, ResultEnvelope};
