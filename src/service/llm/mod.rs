pub mod gemini;
pub mod openai;

use std::{ops::Deref, sync::Arc};

use async_trait::async_trait;

use crate::base::{
    config::{Config, LlmProvider},
    types::Res,
};

// Traits.

/// Generic LLM client trait that clients must implement.
///
/// The advisor treats the endpoint as an opaque text-in / text-out service: one
/// prompt string goes out, one text comes back.  Provider-specific errors are
/// returned as-is and collapsed into a single remote-call failure by the relay.
#[async_trait]
pub trait GenericLlmClient: Send + Sync + 'static {
    /// Short provider name, used for logging.
    fn name(&self) -> &str;

    /// Generate text for a single, fully assembled prompt.
    async fn generate(&self, prompt: &str) -> Res<String>;
}

// Structs.

/// LLM client for the application.
///
/// This is trivially cloneable and can be passed around without the need for `Arc` or `Mutex`.
#[derive(Clone)]
pub struct LlmClient {
    inner: Arc<dyn GenericLlmClient>,
}

impl Deref for LlmClient {
    type Target = dyn GenericLlmClient;

    fn deref(&self) -> &Self::Target {
        &*self.inner
    }
}

impl LlmClient {
    pub fn new(inner: Arc<dyn GenericLlmClient>) -> Self {
        Self { inner }
    }

    /// Build the client for the configured provider.
    pub fn from_config(config: &Config) -> Res<Self> {
        match config.llm_provider {
            LlmProvider::Gemini => Self::gemini(config),
            LlmProvider::OpenAi => Ok(Self::openai(config)),
        }
    }
}
