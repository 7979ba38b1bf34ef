//! Interactive driver: reads learner input line by line and walks the
//! lesson state machine from the overview to the summary.

use crate::screens;
use anyhow::Result;
use lesson_core::{
    LanguageTag,
    content::LessonContent,
    lesson::{LessonError, LessonFlow, LessonStage, OpinionSubmitter},
};
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};
use tracing::info;

/// How a lesson run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    /// Input closed before the summary was reached.
    Abandoned(LessonStage),
}

struct Prompter<'a, R, W> {
    lines: Lines<R>,
    out: &'a mut W,
}

impl<R: AsyncBufRead + Unpin, W: Write> Prompter<'_, R, W> {
    async fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        write!(self.out, "{prompt} ")?;
        self.out.flush()?;
        Ok(self.lines.next_line().await?.map(|line| line.trim().to_string()))
    }
}

fn parse_language(choice: &str) -> Option<LanguageTag> {
    match choice.to_lowercase().as_str() {
        "" | "e" | "en" | "english" => Some(LanguageTag::English),
        "j" | "ja" | "jp" | "japanese" | "日本語" => Some(LanguageTag::Other),
        _ => None,
    }
}

/// Runs one pass through the lesson.
pub async fn run_lesson<R, W>(
    content: &LessonContent,
    submitter: &dyn OpinionSubmitter,
    input: R,
    out: &mut W,
) -> Result<RunOutcome>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut flow = LessonFlow::new(content.discussion_topics.len());
    let mut prompter = Prompter {
        lines: input.lines(),
        out,
    };

    loop {
        screens::render(&mut *prompter.out, content, &flow)?;
        let stage = flow.stage();

        match stage {
            LessonStage::Summary => {
                info!("Lesson completed");
                return Ok(RunOutcome::Completed);
            }
            LessonStage::Vocabulary => {
                let Some(word) = prompter
                    .ask("Type a word to hear it, or press Enter to continue:")
                    .await?
                else {
                    return Ok(RunOutcome::Abandoned(stage));
                };
                if word.is_empty() {
                    flow.advance()?;
                } else if content.vocabulary.iter().any(|item| item.word == word) {
                    writeln!(prompter.out, "Playing audio for {word}")?;
                } else {
                    writeln!(prompter.out, "'{word}' is not in this lesson's vocabulary.")?;
                }
            }
            LessonStage::Discussion => {
                let prompt = format!(
                    "Choose a topic [1-{}] (Enter keeps the marked one):",
                    content.discussion_topics.len()
                );
                let Some(choice) = prompter.ask(&prompt).await? else {
                    return Ok(RunOutcome::Abandoned(stage));
                };
                if choice.is_empty() {
                    flow.advance()?;
                    continue;
                }
                match choice.parse::<usize>().ok().filter(|n| *n >= 1) {
                    Some(n) => match flow.select_topic(n - 1) {
                        Ok(()) => {
                            flow.advance()?;
                        }
                        Err(e) => writeln!(prompter.out, "{e}")?,
                    },
                    None => writeln!(
                        prompter.out,
                        "Please enter a number between 1 and {}.",
                        content.discussion_topics.len()
                    )?,
                }
            }
            LessonStage::Opinion => {
                let Some(choice) = prompter
                    .ask("Language? [e]nglish / [j]apanese (Enter for English):")
                    .await?
                else {
                    return Ok(RunOutcome::Abandoned(stage));
                };
                let Some(language) = parse_language(&choice) else {
                    writeln!(prompter.out, "Please answer 'e' or 'j'.")?;
                    continue;
                };
                let placeholder = match language {
                    LanguageTag::English => "Write your opinion in English:",
                    LanguageTag::Other => "日本語でご意見を入力してください:",
                };
                let Some(text) = prompter.ask(placeholder).await? else {
                    return Ok(RunOutcome::Abandoned(stage));
                };

                writeln!(prompter.out, "Submitting...")?;
                match flow.submit_opinion(submitter, &text, language).await {
                    Ok(_) => {}
                    // Server-side failures are shown by the opinion screen on the next pass.
                    Err(LessonError::Submission(_)) => {}
                    Err(e) => writeln!(prompter.out, "{e}")?,
                }
            }
            _ => {
                if prompter.ask("Press Enter to continue:").await?.is_none() {
                    return Ok(RunOutcome::Abandoned(stage));
                }
                flow.advance()?;
            }
        }
    }
}
