//! Prompt Templates
//!
//! The system and user instructions sent to the completion service. Defaults
//! are compiled in from `prompts/*.md`; a deployment can override any of them
//! with a file of the same name.

use std::collections::HashMap;
use tracing::warn;

const PLACEHOLDER: &str = "{text}";

/// A system instruction plus a user instruction template containing `{text}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptPair {
    pub system: String,
    pub user_template: String,
}

impl PromptPair {
    fn new(system: &str, user_template: &str) -> Self {
        Self {
            system: system.trim().to_string(),
            user_template: user_template.trim().to_string(),
        }
    }

    /// Renders the user instruction for the given text.
    pub fn user(&self, text: &str) -> String {
        self.user_template.replace(PLACEHOLDER, text)
    }
}

/// The three instruction pairs used by opinion processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompts {
    pub feedback: PromptPair,
    pub translation: PromptPair,
    pub expressions: PromptPair,
}

impl Default for Prompts {
    fn default() -> Self {
        Self {
            feedback: PromptPair::new(
                include_str!("../prompts/feedback_system.md"),
                include_str!("../prompts/feedback_user.md"),
            ),
            translation: PromptPair::new(
                include_str!("../prompts/translation_system.md"),
                include_str!("../prompts/translation_user.md"),
            ),
            expressions: PromptPair::new(
                include_str!("../prompts/expressions_system.md"),
                include_str!("../prompts/expressions_user.md"),
            ),
        }
    }
}

impl Prompts {
    /// Replaces the defaults with any templates found in `overrides`, keyed by
    /// file stem (e.g. `feedback_system`).
    ///
    /// Unknown keys are ignored. A user template must contain `{text}`; one
    /// that doesn't is ignored and the default is kept, since every call made
    /// with it would leave out the learner's text.
    pub fn with_overrides(mut self, overrides: &HashMap<String, String>) -> Self {
        for (key, content) in overrides {
            let content = content.trim().to_string();
            let (slot, is_user_template) = match key.as_str() {
                "feedback_system" => (&mut self.feedback.system, false),
                "feedback_user" => (&mut self.feedback.user_template, true),
                "translation_system" => (&mut self.translation.system, false),
                "translation_user" => (&mut self.translation.user_template, true),
                "expressions_system" => (&mut self.expressions.system, false),
                "expressions_user" => (&mut self.expressions.user_template, true),
                _ => {
                    warn!(prompt = %key, "Ignoring unknown prompt template");
                    continue;
                }
            };
            if is_user_template && !content.contains(PLACEHOLDER) {
                warn!(
                    prompt = %key,
                    placeholder = PLACEHOLDER,
                    "Ignoring user template without placeholder; keeping default"
                );
                continue;
            }
            *slot = content;
        }
        self
    }
}
