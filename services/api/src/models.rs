//! API Models
//!
//! Request and response bodies for the HTTP API, annotated for OpenAPI
//! documentation with `utoipa`.

use lesson_core::{KeyExpression, ResultEnvelope};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema, Debug)]
pub struct ProcessOpinionPayload {
    /// The learner's opinion. Must contain non-whitespace text.
    #[serde(default)]
    #[schema(example = "I think school lunches should be healthier.")]
    pub text: Option<String>,
    /// `en` for English (feedback); any other language tag requests a translation.
    #[serde(default)]
    #[schema(example = "en")]
    pub language: Option<String>,
}

#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq, Eq)]
pub struct KeyExpressionBody {
    #[schema(example = "I think")]
    pub expression: String,
    #[schema(example = "私は思う")]
    pub translation: String,
    #[schema(example = "Introduces a personal opinion.")]
    pub usage: String,
}

impl From<&KeyExpression> for KeyExpressionBody {
    fn from(expression: &KeyExpression) -> Self {
        Self {
            expression: expression.expression().to_string(),
            translation: expression.translation().to_string(),
            usage: expression.usage().to_string(),
        }
    }
}

/// The processing result. Exactly one of `feedback` and `translation` is non-null.
#[derive(Serialize, Deserialize, ToSchema, Debug, Clone, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct OpinionResult {
    pub feedback: Option<String>,
    pub translation: Option<String>,
    pub key_expressions: Vec<KeyExpressionBody>,
}

impl From<ResultEnvelope> for OpinionResult {
    fn from(envelope: ResultEnvelope) -> Self {
        Self {
            feedback: envelope.feedback().map(str::to_string),
            translation: envelope.translation().map(str::to_string),
            key_expressions: envelope
                .key_expressions()
                .iter()
                .map(KeyExpressionBody::from)
                .collect(),
        }
    }
}

#[derive(Serialize, Deserialize, ToSchema, Debug)]
pub struct ErrorResponse {
    pub error: String,
}
