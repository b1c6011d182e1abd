//! Handle one press of the submit button.

use crate::{base::prompts::FALLBACK_MESSAGE, interaction::relay, prelude::*};

/// Non-fatal banner shown alongside the fallback message.
pub const REMOTE_FAILURE_NOTICE: &str = "An error occurred while contacting the AI. Please try again later.";

/// Warning shown when the question box is empty.
pub const MISSING_QUESTION_WARNING: &str = "Please write your question in the text box.";

/// Guard the relay and recover from remote failures.
///
/// An empty (or whitespace-only) question never reaches the relay.  Remote
/// failures are logged and turned into [`Submission::Fallback`]; no error
/// leaves this function.
#[instrument(skip_all)]
pub async fn handle_submission(runtime: &Runtime, question: &str) -> Submission {
    if question.trim().is_empty() {
        warn!("Empty question submitted.");
        return Submission::MissingQuestion;
    }

    match relay::submit(&runtime.llm, &runtime.config.system_preamble, runtime.serialized_dataset(), question).await {
        Ok(text) => Submission::Advisory(text),
        Err(err) => {
            error!("Error while relaying: {}", err);

            Submission::Fallback {
                message: FALLBACK_MESSAGE.to_string(),
                notice: REMOTE_FAILURE_NOTICE.to_string(),
            }
        }
    }
}
