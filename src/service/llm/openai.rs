//! OpenAI adapter over chat completions.
//!
//! The prompt is sent as one user message; no history, no tools.

use std::sync::Arc;

use async_openai::{
    Client,
    config::OpenAIConfig,
    types::{ChatCompletionRequestMessage, ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
};
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use crate::base::{config::Config, types::Res};

use super::{GenericLlmClient, LlmClient};

// Extra methods on `LlmClient` applied by the openai implementation.

impl LlmClient {
    pub fn openai(config: &Config) -> Self {
        let client = OpenAiLlmClient::new(config);
        Self { inner: Arc::new(client) }
    }
}

// Specific implementations.

/// OpenAI LLM client implementation.
#[derive(Clone)]
pub struct OpenAiLlmClient {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
}

impl OpenAiLlmClient {
    /// Create a new OpenAI LLM client.
    #[instrument(name = "OpenAiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Self {
        let mut cfg = OpenAIConfig::new().with_api_key(config.openai_api_key.clone().unwrap_or_default());

        if let Some(base) = &config.openai_base_url {
            cfg = cfg.with_api_base(base.trim_end_matches('/'));
        }

        Self {
            client: Client::with_config(cfg),
            model: config.model.clone(),
            temperature: config.temperature,
        }
    }
}

#[async_trait]
impl GenericLlmClient for OpenAiLlmClient {
    fn name(&self) -> &str {
        "openai"
    }

    #[instrument(name = "OpenAiLlmClient::generate", skip_all)]
    async fn generate(&self, prompt: &str) -> Res<String> {
        debug!("Sending {} prompt characters to OpenAI.", prompt.len());

        let messages: Vec<ChatCompletionRequestMessage> = vec![ChatCompletionRequestUserMessageArgs::default().content(prompt).build()?.into()];

        let mut request = CreateChatCompletionRequestArgs::default();
        request.model(&self.model).messages(messages);

        if let Some(temperature) = self.temperature {
            request.temperature(temperature);
        }

        let response = self.client.chat().create(request.build()?).await?;

        info!("OpenAI returned {} choices.", response.choices.len());

        let content = response.choices.into_iter().next().and_then(|choice| choice.message.content).unwrap_or_default();

        Ok(content)
    }
}

// Tests.
