//! Lesson State Machine
//!
//! The learner's journey is a fixed, forward-only sequence of stages. Every
//! stage advances on a single action except `Opinion`, which only moves on to
//! `Feedback` after a successful submission, carrying the serialized result
//! as the transition payload.

use crate::{
    expressions::KeyExpression,
    language::LanguageTag,
    opinion::{OpinionSubmission, ResultEnvelope},
};
use async_trait::async_trait;
use tracing::{info, warn};

// --- Stages ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum LessonStage {
    Overview,
    Vocabulary,
    Article,
    Discussion,
    Opinion,
    Feedback,
    Summary,
}

impl LessonStage {
    pub const ALL: [LessonStage; 7] = [
        LessonStage::Overview,
        LessonStage::Vocabulary,
        LessonStage::Article,
        LessonStage::Discussion,
        LessonStage::Opinion,
        LessonStage::Feedback,
        LessonStage::Summary,
    ];

    /// The stage one position later, or `None` at the terminal stage.
    pub fn next(self) -> Option<LessonStage> {
        let index = Self::ALL.iter().position(|stage| *stage == self)?;
        Self::ALL.get(index + 1).copied()
    }

    pub fn is_terminal(self) -> bool {
        self == LessonStage::Summary
    }

    /// The navigation path segment for this stage.
    pub fn path(self) -> &'static str {
        match self {
            LessonStage::Overview => "/overview",
            LessonStage::Vocabulary => "/vocabulary",
            LessonStage::Article => "/article",
            LessonStage::Discussion => "/discussion",
            LessonStage::Opinion => "/opinion",
            LessonStage::Feedback => "/feedback",
            LessonStage::Summary => "/summary",
        }
    }

    /// Resolves a navigation path; the root path lands on the overview.
    pub fn from_path(path: &str) -> Option<LessonStage> {
        if path == "/" {
            return Some(LessonStage::Overview);
        }
        Self::ALL.into_iter().find(|stage| stage.path() == path)
    }
}

// --- Submission seam ---

/// Failure reported by an opinion submitter.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SubmitError {
    #[error("{message}")]
    Rejected { status: u16, message: String },
    #[error("Could not reach the lesson server: {0}")]
    Transport(String),
}

/// Sends an opinion for processing and returns the serialized result envelope.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OpinionSubmitter: Send + Sync {
    async fn submit(&self, submission: &OpinionSubmission) -> Result<String, SubmitError>;
}

// --- Feedback view ---

/// What the feedback stage renders. Every section is optional so that an
/// undecodable payload still yields a (blank) page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackView {
    pub feedback: Option<String>,
    pub translation: Option<String>,
    pub key_expressions: Option<Vec<KeyExpression>>,
}

impl FeedbackView {
    pub fn decode(payload: &str) -> Self {
        match serde_json::from_str::<ResultEnvelope>(payload) {
            Ok(envelope) => Self::from(envelope),
            Err(e) => {
                warn!(error = %e, "Could not decode feedback payload; rendering empty sections");
                Self::default()
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.feedback.is_none() && self.translation.is_none() && self.key_expressions.is_none()
    }
}

impl From<ResultEnvelope> for FeedbackView {
    fn from(envelope: ResultEnvelope) -> Self {
        Self {
            feedback: envelope.feedback().map(str::to_string),
            translation: envelope.translation().map(str::to_string),
            key_expressions: Some(envelope.key_expressions().to_vec()),
        }
    }
}

// --- Flow ---

#[derive(Debug, thiserror::Error)]
pub enum LessonError {
    #[error("The opinion stage only advances through a submission")]
    Gated,
    #[error("The lesson is already complete")]
    Finished,
    #[error("This action is only available on {expected:?}, current stage is {actual:?}")]
    WrongStage {
        expected: LessonStage,
        actual: LessonStage,
    },
    #[error("Please write your opinion before submitting")]
    EmptyOpinion,
    #[error("A submission is already in progress")]
    SubmissionPending,
    #[error("No submission is in progress")]
    NoPendingSubmission,
    #[error("There is no discussion topic #{}", .0 + 1)]
    UnknownTopic(usize),
    #[error(transparent)]
    Submission(#[from] SubmitError),
}

/// A single learner's pass through the lesson.
#[derive(Debug)]
pub struct LessonFlow {
    stage: LessonStage,
    topic_count: usize,
    selected_topic: usize,
    pending: bool,
    last_error: Option<String>,
    feedback: Option<FeedbackView>,
}

impl LessonFlow {
    /// Starts at the overview. `topic_count` is the number of discussion topics
    /// offered at the discussion stage.
    pub fn new(topic_count: usize) -> Self {
        Self {
            stage: LessonStage::Overview,
            topic_count,
            selected_topic: 0,
            pending: false,
            last_error: None,
            feedback: None,
        }
    }

    pub fn stage(&self) -> LessonStage {
        self.stage
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// The most recent submission failure, shown inline on the opinion stage.
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn selected_topic(&self) -> usize {
        self.selected_topic
    }

    /// The decoded result, present only while on the feedback stage.
    pub fn feedback(&self) -> Option<&FeedbackView> {
        self.feedback.as_ref()
    }

    fn require_stage(&self, expected: LessonStage) -> Result<(), LessonError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(LessonError::WrongStage {
                expected,
                actual: self.stage,
            })
        }
    }

    pub fn select_topic(&mut self, index: usize) -> Result<(), LessonError> {
        self.require_stage(LessonStage::Discussion)?;
        if index >= self.topic_count {
            return Err(LessonError::UnknownTopic(index));
        }
        self.selected_topic = index;
        Ok(())
    }

    /// Moves to the next stage. Not available on `Opinion` (see
    /// [`LessonFlow::submit_opinion`]) or once the lesson is finished.
    pub fn advance(&mut self) -> Result<LessonStage, LessonError> {
        if self.stage.is_terminal() {
            return Err(LessonError::Finished);
        }
        if self.stage == LessonStage::Opinion {
            return Err(LessonError::Gated);
        }
        let next = self.stage.next().ok_or(LessonError::Finished)?;
        if self.stage == LessonStage::Feedback {
            self.feedback = None;
        }
        info!(from = ?self.stage, to = ?next, "Advancing lesson");
        self.stage = next;
        Ok(next)
    }

    /// Validates the opinion and marks a submission as in flight.
    pub fn begin_submission(
        &mut self,
        text: &str,
        language: LanguageTag,
    ) -> Result<OpinionSubmission, LessonError> {
        self.require_stage(LessonStage::Opinion)?;
        if self.pending {
            return Err(LessonError::SubmissionPending);
        }
        // Blank text is the only way a submission with a chosen language fails.
        let submission = OpinionSubmission::with_language(text, language)
            .map_err(|_| LessonError::EmptyOpinion)?;
        self.pending = true;
        Ok(submission)
    }

    /// Resolves the in-flight submission. Success moves to `Feedback` with the
    /// payload decoded; failure stays on `Opinion` and keeps the error for
    /// display so the learner can retry.
    pub fn finish_submission(
        &mut self,
        outcome: Result<String, SubmitError>,
    ) -> Result<LessonStage, LessonError> {
        if !self.pending {
            return Err(LessonError::NoPendingSubmission);
        }
        self.pending = false;

        match outcome {
            Ok(payload) => {
                self.last_error = None;
                self.feedback = Some(FeedbackView::decode(&payload));
                info!(from = ?self.stage, to = ?LessonStage::Feedback, "Opinion accepted");
                self.stage = LessonStage::Feedback;
                Ok(self.stage)
            }
            Err(e) => {
                warn!(error = %e, "Opinion submission failed");
                self.last_error = Some(e.to_string());
                Err(LessonError::Submission(e))
            }
        }
    }

    /// Submits the opinion through `submitter` and resolves the transition.
    ///
    /// # Arguments
    ///
    /// * `submitter` - Sends the opinion for processing (the HTTP client in practice).
    /// * `text` - The learner's opinion; blank text is rejected without sending.
    /// * `language` - The language the learner chose for the opinion.
    ///
    /// # Returns
    ///
    /// `LessonStage::Feedback` on success. On failure the flow stays on
    /// `Opinion` with the error kept for display.
    pub async fn submit_opinion(
        &mut self,
        submitter: &dyn OpinionSubmitter,
        text: &str,
        language: LanguageTag,
    ) -> Result<LessonStage, LessonError> {
        let submission = self.begin_submission(text, language)?;
        let outcome = submitter.submit(&submission).await;
        self.finish_submission(outcome)
    }
}
