//! Forward one question to the LLM.

use crate::{base::prompts::assemble_prompt, prelude::*, service::llm::LlmClient};

/// Assemble the prompt and make exactly one remote call.
///
/// The caller guarantees `question` is non-empty.  The endpoint's text is
/// returned unmodified.  Any adapter error, or an empty answer, becomes
/// [`RelayError::RemoteCallFailed`]; nothing is retried.
#[instrument(skip_all, fields(provider = llm.name()))]
pub async fn submit(llm: &LlmClient, preamble: &str, dataset: Option<&str>, question: &str) -> Result<String, RelayError> {
    let prompt = assemble_prompt(preamble, dataset, question);

    info!("Relaying question ({} prompt characters, dataset included: {}).", prompt.len(), dataset.is_some());

    let text = llm.generate(&prompt).await.map_err(|err| RelayError::RemoteCallFailed(format!("{err:#}")))?;

    if text.trim().is_empty() {
        warn!("LLM returned an empty answer.");
        return Err(RelayError::RemoteCallFailed("empty response".to_string()));
    }

    Ok(text)
}
