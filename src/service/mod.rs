//! Service integrations for external APIs and local resources.
//!
//! This module contains implementations for the services used by the car-advisor:
//! - The reference dataset (CSV)
//! - LLM services (e.g., Gemini, OpenAI)
//! - The web form (axum)
//!
//! The LLM module defines a generic trait and concrete implementations,
//! allowing for extensibility and easy testing.

pub mod dataset;
pub mod llm;
pub mod web;
