//! Plain-text rendering of each lesson stage.

use lesson_core::{
    content::LessonContent,
    lesson::{FeedbackView, LessonFlow, LessonStage},
};
use std::io::{self, Write};

fn heading(out: &mut impl Write, title: &str, stage: LessonStage) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "== {title} ({}) ==", stage.path())
}

/// Writes the screen for the flow's current stage.
pub fn render(out: &mut impl Write, content: &LessonContent, flow: &LessonFlow) -> io::Result<()> {
    let stage = flow.stage();
    match stage {
        LessonStage::Overview => {
            heading(out, "Lesson Overview", stage)?;
            writeln!(out, "CEFR Level: {}", content.cefr_level)?;
            writeln!(out, "Topic: {}", content.topic)?;
            writeln!(out, "{}", content.introduction)?;
        }
        LessonStage::Vocabulary => {
            heading(out, "Vocabulary & Pronunciation Practice", stage)?;
            for item in &content.vocabulary {
                writeln!(out, "* {}: {}", item.word, item.definition)?;
                writeln!(out, "  Example: {}", item.example)?;
            }
        }
        LessonStage::Article => {
            heading(out, "Article Reading", stage)?;
            for paragraph in &content.article {
                writeln!(out, "{paragraph}")?;
                writeln!(out)?;
            }
        }
        LessonStage::Discussion => {
            heading(out, "Discussion Topic Selection", stage)?;
            for (index, topic) in content.discussion_topics.iter().enumerate() {
                let marker = if index == flow.selected_topic() { '*' } else { ' ' };
                writeln!(out, "{marker} {}. {topic}", index + 1)?;
            }
        }
        LessonStage::Opinion => {
            heading(out, "Opinion Input", stage)?;
            if let Some(topic) = content.discussion_topics.get(flow.selected_topic()) {
                writeln!(out, "Topic: {topic}")?;
            }
            if let Some(error) = flow.last_error() {
                writeln!(out, "Error: {error} (you can submit again)")?;
            }
        }
        LessonStage::Feedback => {
            heading(out, "Feedback", stage)?;
            if let Some(view) = flow.feedback() {
                render_feedback(out, view)?;
            }
        }
        LessonStage::Summary => {
            heading(out, "Lesson Summary", stage)?;
            writeln!(out, "Key Vocabulary: {}", content.key_vocabulary())?;
            writeln!(out, "Please review these terms and practice their usage.")?;
            writeln!(out, "Thank you for participating in the lesson!")?;
        }
    }
    Ok(())
}

/// Writes only the sections present in the view.
pub fn render_feedback(out: &mut impl Write, view: &FeedbackView) -> io::Result<()> {
    if let Some(feedback) = &view.feedback {
        writeln!(out, "-- Feedback --")?;
        writeln!(out, "{feedback}")?;
    }
    if let Some(translation) = &view.translation {
        writeln!(out, "-- Translation --")?;
        writeln!(out, "{translation}")?;
    }
    if let Some(expressions) = &view.key_expressions {
        writeln!(out, "-- Key Expressions --")?;
        for expression in expressions {
            writeln!(
                out,
                "* {} ({}): {}",
                expression.expression(),
                expression.translation(),
                expression.usage()
            )?;
        }
    }
    Ok(())
}
