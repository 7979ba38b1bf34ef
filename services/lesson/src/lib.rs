//! Lesson Terminal Client
//!
//! The learner-facing side of the lesson: renders each stage, submits the
//! learner's opinion to the lesson API, and shows the returned feedback.

pub mod client;
pub mod runner;
pub mod screens;
