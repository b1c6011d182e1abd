//! Request handling for the advisor.
//!
//! This module provides the two steps behind the submit button:
//! - The relay, which assembles a prompt and forwards it to the LLM once
//! - Submission handling, which guards against empty questions and turns
//!   remote failures into a fallback message

pub mod relay;
pub mod submission;
