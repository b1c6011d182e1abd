//! Core components, types, and utilities for the car-advisor.
//!
//! This module contains fundamental building blocks used throughout the application:
//! - Configuration handling and environment variables.
//! - The advisor preamble and prompt assembly.
//! - Common types, the relay error taxonomy, and result handling.

pub mod config;
pub mod prompts;
pub mod types;
