//! Prompt text and prompt assembly for the advisor.

/// System preamble.
pub const SYSTEM_PREAMBLE: &str = r#####"
You are an automotive expert. Your goal is to advise a customer who is buying a car.
You should be helpful and objective, and provide clear information. You can compare
different models, make recommendations based on the customer's needs (such as size,
fuel consumption, price, etc.) and build comparison lists or tables.
Your information should be as accurate and up to date as your knowledge allows.
If some information is not available, say so politely.
"#####;

/// Label that introduces the user's question in the prompt.
pub const USER_QUESTION_LABEL: &str = "User question:";

/// Label that introduces the serialized dataset in the prompt.
pub const DATASET_LABEL: &str = "Reference dataset:";

/// Shown in place of an advisory when the remote call fails.
pub const FALLBACK_MESSAGE: &str = "I'm sorry, I couldn't process your request right now.";

/// Assemble the full prompt sent to the endpoint.
///
/// The order is fixed: preamble, then the optional dataset section, then the
/// question, separated by blank lines.  The result depends only on the inputs.
pub fn assemble_prompt(preamble: &str, dataset: Option<&str>, question: &str) -> String {
    let mut sections = vec![preamble.trim().to_string()];

    if let Some(dataset) = dataset {
        sections.push(format!("{DATASET_LABEL}\n{dataset}"));
    }

    sections.push(format!("{USER_QUESTION_LABEL} {question}"));

    sections.join("\n\n")
}
