//! Library root for `car-advisor`.
//!
//! Car-advisor is a single-page web form that relays car buying questions to a
//! hosted LLM and shows the answer:
//! - Assembles a prompt from a fixed preamble, an optional reference dataset, and the question
//! - Sends it to Gemini (or OpenAI) in one call
//! - Shows the returned text, or a fallback message when the call fails
//!
//! The architecture is built around a small LLM trait so that providers can be
//! swapped and mocked.

#[deny(missing_docs)]
pub mod base;
pub mod interaction;
pub mod prelude;
pub mod runtime;
pub mod service;

use base::{config::Config, types::Void};
use rustls::crypto;
use tracing::info;

/// Public async entry for the binary crate.
///
/// Sets up necessary services and starts the car-advisor runtime:
/// - Initializes the crypto provider
/// - Creates the runtime context with the dataset and LLM client
/// - Serves the web form
pub async fn start(config: Config) -> Void {
    info!("Starting car-advisor ...");

    // Start the crypto provider.
    let _ = crypto::ring::default_provider().install_default();

    // Initialize the runtime.
    let runtime = runtime::Runtime::new(config)?;

    // Start the runtime.
    runtime.start().await?;

    Ok(())
}
