//! Opinion Processing Service
//!
//! Turns a learner's written opinion into either corrective feedback (English)
//! or an English translation (any other language), plus the key expressions
//! found in the English text. Each successful request makes exactly two
//! completion calls, issued one after the other.

use crate::{
    expressions::{KeyExpression, SchemaError, parse_key_expressions},
    language::{LanguageTag, UnsupportedLanguage},
    llm_client::{CompletionClient, CompletionError},
    prompts::{PromptPair, Prompts},
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{Span, debug, info, instrument};

// --- Submission ---

/// A learner's opinion, validated and ready to be processed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpinionSubmission {
    pub text: String,
    pub language: LanguageTag,
}

impl OpinionSubmission {
    /// Validates raw request fields. The text is checked before the language,
    /// so an empty opinion is always reported as such.
    pub fn new(text: impl Into<String>, language: &str) -> Result<Self, OpinionError> {
        let text = text.into();
        ensure_text(&text)?;
        let language = language.parse()?;
        Ok(Self { text, language })
    }

    /// Builds a submission for an already-chosen language. Only the text can
    /// be rejected.
    pub fn with_language(
        text: impl Into<String>,
        language: LanguageTag,
    ) -> Result<Self, OpinionError> {
        let text = text.into();
        ensure_text(&text)?;
        Ok(Self { text, language })
    }
}

fn ensure_text(text: &str) -> Result<(), OpinionError> {
    if text.trim().is_empty() {
        Err(OpinionError::EmptyText)
    } else {
        Ok(())
    }
}

// --- Result Envelope ---

/// The primary output of processing: exactly one of feedback or translation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Guidance {
    Feedback(String),
    Translation(String),
}

/// The aggregated outcome of one opinion-processing request.
///
/// On the wire this is `{ feedback, translation, keyExpressions }` with one of
/// the first two set to `null`. Decoding rejects envelopes that carry both or
/// neither.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "EnvelopeWire", try_from = "EnvelopeWire")]
pub struct ResultEnvelope {
    guidance: Guidance,
    key_expressions: Vec<KeyExpression>,
}

impl ResultEnvelope {
    pub fn new(guidance: Guidance, key_expressions: Vec<KeyExpression>) -> Self {
        Self {
            guidance,
            key_expressions,
        }
    }

    pub fn feedback(&self) -> Option<&str> {
        match &self.guidance {
            Guidance::Feedback(text) => Some(text),
            Guidance::Translation(_) => None,
        }
    }

    pub fn translation(&self) -> Option<&str> {
        match &self.guidance {
            Guidance::Translation(text) => Some(text),
            Guidance::Feedback(_) => None,
        }
    }

    pub fn key_expressions(&self) -> &[KeyExpression] {
        &self.key_expressions
    }
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct EnvelopeWire {
    feedback: Option<String>,
    translation: Option<String>,
    key_expressions: Vec<KeyExpression>,
}

#[derive(Debug, thiserror::Error)]
#[error("result envelope must carry exactly one non-empty feedback or translation")]
pub struct EnvelopeShapeError;

impl From<ResultEnvelope> for EnvelopeWire {
    fn from(envelope: ResultEnvelope) -> Self {
        let (feedback, translation) = match envelope.guidance {
            Guidance::Feedback(text) => (Some(text), None),
            Guidance::Translation(text) => (None, Some(text)),
        };
        Self {
            feedback,
            translation,
            key_expressions: envelope.key_expressions,
        }
    }
}

impl TryFrom<EnvelopeWire> for ResultEnvelope {
    type Error = EnvelopeShapeError;

    fn try_from(wire: EnvelopeWire) -> Result<Self, Self::Error> {
        let guidance = match (wire.feedback, wire.translation) {
            (Some(text), None) if !text.trim().is_empty() => Guidance::Feedback(text),
            (None, Some(text)) if !text.trim().is_empty() => Guidance::Translation(text),
            _ => return Err(EnvelopeShapeError),
        };
        Ok(Self::new(guidance, wire.key_expressions))
    }
}

// --- Errors ---

/// Why an opinion could not be processed.
///
/// `EmptyText` and `UnsupportedLanguage` are caller mistakes; the rest are
/// processing failures whose detail is meant for logs only.
#[derive(Debug, thiserror::Error)]
pub enum OpinionError {
    #[error("Text is required")]
    EmptyText,
    #[error(transparent)]
    UnsupportedLanguage(#[from] UnsupportedLanguage),
    #[error("{step} completion failed")]
    Completion {
        step: &'static str,
        #[source]
        source: CompletionError,
    },
    #[error("key expression output rejected")]
    Schema(#[from] SchemaError),
}

impl OpinionError {
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            OpinionError::EmptyText | OpinionError::UnsupportedLanguage(_)
        )
    }
}

// --- Service ---

/// Which pair of completions a submission needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// Feedback on the original text, then expressions from the original text.
    Feedback,
    /// Translation of the original text, then expressions from the translation.
    Translation,
}

impl Strategy {
    pub fn for_language(language: LanguageTag) -> Self {
        match language {
            LanguageTag::English => Strategy::Feedback,
            LanguageTag::Other => Strategy::Translation,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Strategy::Feedback => "feedback",
            Strategy::Translation => "translation",
        }
    }
}

/// Orchestrates completion calls for a single opinion. Holds no per-request
/// state, so one instance is shared across all requests.
pub struct OpinionProcessingService {
    client: Arc<dyn CompletionClient>,
    prompts: Prompts,
}

impl OpinionProcessingService {
    pub fn new(client: Arc<dyn CompletionClient>, prompts: Prompts) -> Self {
        Self { client, prompts }
    }

    /// Processes a validated submission.
    pub async fn process_submission(
        &self,
        submission: &OpinionSubmission,
    ) -> Result<ResultEnvelope, OpinionError> {
        self.process(&submission.text, submission.language).await
    }

    /// Processes an opinion with the strategy its language calls for.
    ///
    /// # Arguments
    ///
    /// * `text` - The learner's opinion, as written.
    /// * `language` - English gets feedback; anything else is translated first.
    ///
    /// # Returns
    ///
    /// A `ResultEnvelope` with either feedback or a translation, plus the key
    /// expressions from the English text. Fails with `EmptyText` before any
    /// network call if the text is blank; any later failure aborts the whole
    /// request.
    #[instrument(name = "process_opinion", skip_all, fields(strategy))]
    pub async fn process(
        &self,
        text: &str,
        language: LanguageTag,
    ) -> Result<ResultEnvelope, OpinionError> {
        ensure_text(text)?;

        let strategy = Strategy::for_language(language);
        Span::current().record("strategy", strategy.as_str());

        let envelope = match strategy {
            Strategy::Feedback => {
                let feedback = self.complete("feedback", &self.prompts.feedback, text).await?;
                let key_expressions = self.extract_expressions(text).await?;
                ResultEnvelope::new(Guidance::Feedback(feedback), key_expressions)
            }
            Strategy::Translation => {
                let translated = self
                    .complete("translation", &self.prompts.translation, text)
                    .await?;
                let key_expressions = self.extract_expressions(&translated).await?;
                ResultEnvelope::new(Guidance::Translation(translated), key_expressions)
            }
        };

        info!(
            key_expressions = envelope.key_expressions().len(),
            "Opinion processed"
        );
        Ok(envelope)
    }

    async fn extract_expressions(&self, text: &str) -> Result<Vec<KeyExpression>, OpinionError> {
        let raw = self
            .complete("expressions", &self.prompts.expressions, text)
            .await?;
        Ok(parse_key_expressions(&raw)?)
    }

    async fn complete(
        &self,
        step: &'static str,
        prompt: &PromptPair,
        text: &str,
    ) -> Result<String, OpinionError> {
        debug!(step, "Requesting completion");
        self.client
            .complete(&prompt.system, &prompt.user(text))
            .await
            .map_err(|source| OpinionError::Completion { step, source })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm_client::MockCompletionClient;
    use mockall::Sequence;

    const EN_TEXT: &str = "I think school lunches should be healthier.";
    const JA_TEXT: &str = "学校の昼食はもっと健康的であるべきだと思います。";
    const TRANSLATED: &str = "I think school lunches should be healthier.";
    const EXPRESSIONS_JSON: &str =
        r#"[{"expression": "I think", "translation": "私は思う", "usage": "Introduces an opinion."}]"#;

    fn service(client: MockCompletionClient) -> OpinionProcessingService {
        OpinionProcessingService::new(Arc::new(client), Prompts::default())
    }

    #[tokio::test]
    async fn test_english_opinion_gets_feedback_and_expressions() {
        let mut client = MockCompletionClient::new();
        let mut seq = Sequence::new();
        client
            .expect_complete()
            .withf(|system, user| system.contains("feedback") && user.ends_with(EN_TEXT))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok("Great structure. Try 'I believe that'.".to_string()));
        client
            .expect_complete()
            .withf(|system, user| system.contains("Extract key expressions") && user.ends_with(EN_TEXT))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(EXPRESSIONS_JSON.to_string()));

        let envelope = service(client).process(EN_TEXT, LanguageTag::English).await.unwrap();

        assert_eq!(envelope.feedback(), Some("Great structure. Try 'I believe that'."));
        assert_eq!(envelope.translation(), None);
        assert_eq!(envelope.key_expressions().len(), 1);
        assert_eq!(envelope.key_expressions()[0].expression(), "I think");
    }

    #[tokio::test]
    async fn test_other_language_extracts_from_translation() {
        let mut client = MockCompletionClient::new();
        let mut seq = Sequence::new();
        client
            .expect_complete()
            .withf(|system, user| system.contains("professional translator") && user.ends_with(JA_TEXT))
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(TRANSLATED.to_string()));
        client
            .expect_complete()
            .withf(|system, user| {
                system.contains("Extract key expressions")
                    && user.ends_with(TRANSLATED)
                    && !user.contains(JA_TEXT)
            })
            .times(1)
            .in_sequence(&mut seq)
            .returning(|_, _| Ok(EXPRESSIONS_JSON.to_string()));

        let envelope = service(client).process(JA_TEXT, LanguageTag::Other).await.unwrap();

        assert_eq!(envelope.translation(), Some(TRANSLATED));
        assert_eq!(envelope.feedback(), None);
        assert_eq!(envelope.key_expressions().len(), 1);
    }

    #[tokio::test]
    async fn test_blank_text_makes_no_calls() {
        for language in [LanguageTag::English, LanguageTag::Other] {
            for text in ["", "   ", "\n\t"] {
                let mut client = MockCompletionClient::new();
                client.expect_complete().never();

                let err = service(client).process(text, language).await.unwrap_err();

                assert!(matches!(err, OpinionError::EmptyText));
                assert!(err.is_validation());
            }
        }
    }

    #[tokio::test]
    async fn test_malformed_expressions_fail_the_request() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .withf(|system, _| system.contains("feedback"))
            .times(1)
            .returning(|_, _| Ok("Good job.".to_string()));
        client
            .expect_complete()
            .withf(|system, _| system.contains("Extract key expressions"))
            .times(1)
            .returning(|_, _| Ok("not json".to_string()));

        let err = service(client).process(EN_TEXT, LanguageTag::English).await.unwrap_err();

        assert!(matches!(err, OpinionError::Schema(_)));
        assert!(!err.is_validation());
    }

    #[tokio::test]
    async fn test_translation_failure_skips_extraction() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .withf(|system, _| system.contains("professional translator"))
            .times(1)
            .returning(|_, _| Err(CompletionError::EmptyResponse));
        client
            .expect_complete()
            .withf(|system, _| system.contains("Extract key expressions"))
            .never();

        let err = service(client).process(JA_TEXT, LanguageTag::Other).await.unwrap_err();

        match err {
            OpinionError::Completion { step, source } => {
                assert_eq!(step, "translation");
                assert!(matches!(source, CompletionError::EmptyResponse));
            }
            other => panic!("Expected completion error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_extraction_failure_after_feedback_returns_no_envelope() {
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .withf(|system, _| system.contains("feedback"))
            .times(1)
            .returning(|_, _| Ok("Good job.".to_string()));
        client
            .expect_complete()
            .withf(|system, _| system.contains("Extract key expressions"))
            .times(1)
            .returning(|_, _| Err(CompletionError::NoChoice));

        let result = service(client).process(EN_TEXT, LanguageTag::English).await;

        assert!(matches!(
            result,
            Err(OpinionError::Completion { step: "expressions", .. })
        ));
    }

    #[tokio::test]
    async fn test_override_without_placeholder_still_sends_text() {
        let overrides = std::collections::HashMap::from([(
            "expressions_user".to_string(),
            "Extract key expressions.".to_string(),
        )]);
        let prompts = Prompts::default().with_overrides(&overrides);
        let mut client = MockCompletionClient::new();
        client
            .expect_complete()
            .withf(|system, _| system.contains("providing feedback"))
            .times(1)
            .returning(|_, _| Ok("fb".to_string()));
        client
            .expect_complete()
            .withf(|system, user| {
                system.contains("Extract key expressions") && user.ends_with("I think lunches matter.")
            })
            .times(1)
            .returning(|_, _| Ok("[]".to_string()));
        let service = OpinionProcessingService::new(Arc::new(client), prompts);

        let envelope = service
            .process("I think lunches matter.", LanguageTag::English)
            .await
            .unwrap();

        assert_eq!(envelope.feedback(), Some("fb"));
        assert!(envelope.key_expressions().is_empty());
    }

    #[test]
    fn test_submission_checks_text_before_language() {
        let err = OpinionSubmission::new("  ", "??").unwrap_err();
        assert!(matches!(err, OpinionError::EmptyText));

        let err = OpinionSubmission::new("Hello", "??").unwrap_err();
        assert_eq!(err.to_string(), "Unsupported language: ??");
        assert!(err.is_validation());

        let submission = OpinionSubmission::new("こんにちは", "jp").unwrap();
        assert_eq!(submission.language, LanguageTag::Other);
    }

    #[test]
    fn test_envelope_wire_shape() {
        let envelope = ResultEnvelope::new(
            Guidance::Feedback("Nice.".to_string()),
            vec![KeyExpression::new("I think", "私は思う", "Opinion opener.").unwrap()],
        );

        let json = serde_json::to_value(&envelope).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "feedback": "Nice.",
                "translation": null,
                "keyExpressions": [
                    {"expression": "I think", "translation": "私は思う", "usage": "Opinion opener."}
                ]
            })
        );
        let decoded: ResultEnvelope = serde_json::from_value(json).unwrap();
        assert_eq!(decoded, envelope);
    }

    #[test]
    fn test_envelope_decode_rejects_both_or_neither() {
        let both = r#"{"feedback": "a", "translation": "b", "keyExpressions": []}"#;
        let neither = r#"{"feedback": null, "translation": null, "keyExpressions": []}"#;
        let blank = r#"{"feedback": null, "translation": " ", "keyExpressions": []}"#;

        assert!(serde_json::from_str::<ResultEnvelope>(both).is_err());
        assert!(serde_json::from_str::<ResultEnvelope>(neither).is_err());
        assert!(serde_json::from_str::<ResultEnvelope>(blank).is_err());
    }
}
