//! Google Gemini adapter over the `generateContent` REST endpoint.

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::base::{config::Config, types::Res};

use super::{GenericLlmClient, LlmClient};

// Extra methods on `LlmClient` applied by the gemini implementation.

impl LlmClient {
    pub fn gemini(config: &Config) -> Res<Self> {
        let client = GeminiLlmClient::new(config)?;
        Ok(Self { inner: Arc::new(client) })
    }
}

// Wire types.

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    generation_config: Option<GenerationConfig>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    role: &'static str,
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Serialize)]
struct GenerationConfig {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

// Specific implementations.

/// Gemini LLM client implementation.
#[derive(Clone)]
pub struct GeminiLlmClient {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
    temperature: Option<f32>,
}

impl GeminiLlmClient {
    /// Create a new Gemini LLM client.
    #[instrument(name = "GeminiLlmClient::new", skip_all)]
    pub fn new(config: &Config) -> Res<Self> {
        let api_key = config.api_key().ok_or_else(|| anyhow::anyhow!("Gemini client requires `google_api_key`."))?.to_string();
        let endpoint = format!("{}/models/{}:generateContent", config.gemini_base_url.trim_end_matches('/'), config.model);

        Ok(Self {
            http: reqwest::Client::new(),
            endpoint,
            api_key,
            temperature: config.temperature,
        })
    }
}

#[async_trait]
impl GenericLlmClient for GeminiLlmClient {
    fn name(&self) -> &str {
        "gemini"
    }

    #[instrument(name = "GeminiLlmClient::generate", skip_all)]
    async fn generate(&self, prompt: &str) -> Res<String> {
        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: self.temperature.map(|temperature| GenerationConfig { temperature }),
        };

        debug!("Sending {} prompt characters to Gemini.", prompt.len());

        let response = self.http.post(&self.endpoint).header("x-goog-api-key", &self.api_key).json(&body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Gemini API returned {status}: {detail}"));
        }

        let response: GenerateContentResponse = response.json().await?;

        parse_gemini_response(response)
    }
}

/// Concatenate the text parts of the first candidate.
fn parse_gemini_response(response: GenerateContentResponse) -> Res<String> {
    let Some(candidate) = response.candidates.into_iter().next() else {
        let reason = response.prompt_feedback.and_then(|f| f.block_reason).unwrap_or_else(|| "no candidates".to_string());
        return Err(anyhow::anyhow!("Gemini returned no answer: {reason}"));
    };

    let text = candidate
        .content
        .map(|content| content.parts.into_iter().filter_map(|part| part.text).collect::<String>())
        .unwrap_or_default();

    info!("Gemini finished with reason {:?}.", candidate.finish_reason);

    Ok(text)
}

// Tests.

#[cfg(test)]
mod tests {
    use serde_json::json;
    use wiremock::{
        Mock, MockServer, ResponseTemplate,
        matchers::{body_json, header, method, path},
    };

    use super::*;
    use crate::base::config::ConfigInner;

    fn create_test_config(base_url: &str, temperature: Option<f32>) -> Config {
        Config::new(ConfigInner {
            google_api_key: Some("test_key".to_string()),
            gemini_base_url: base_url.to_string(),
            temperature,
            ..Default::default()
        })
        .unwrap()
    }

    #[tokio::test]
    async fn test_generate_sends_single_text_part() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/models/gemini-1.5-pro:generateContent"))
            .and(header("x-goog-api-key", "test_key"))
            .and(body_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "Which sedan?" }] }]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{
                    "content": { "role": "model", "parts": [{ "text": "Sedan A, " }, { "text": "probably." }] },
                    "finishReason": "STOP"
                }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = LlmClient::gemini(&create_test_config(&server.uri(), None)).unwrap();
        let text = client.generate("Which sedan?").await.unwrap();

        assert_eq!(text, "Sedan A, probably.");
    }

    #[tokio::test]
    async fn test_generate_sends_temperature_when_configured() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(body_json(json!({
                "contents": [{ "role": "user", "parts": [{ "text": "hi" }] }],
                "generationConfig": { "temperature": 0.5 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "candidates": [{ "content": { "parts": [{ "text": "hello" }] } }]
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = LlmClient::gemini(&create_test_config(&server.uri(), Some(0.5))).unwrap();

        assert_eq!(client.generate("hi").await.unwrap(), "hello");
    }

    #[tokio::test]
    async fn test_error_status_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(429).set_body_string("quota exhausted"))
            .mount(&server)
            .await;

        let client = LlmClient::gemini(&create_test_config(&server.uri(), None)).unwrap();
        let err = client.generate("hi").await.unwrap_err();

        assert!(err.to_string().contains("429"));
        assert!(err.to_string().contains("quota exhausted"));
    }

    #[tokio::test]
    async fn test_blocked_prompt_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "promptFeedback": { "blockReason": "SAFETY" }
            })))
            .mount(&server)
            .await;

        let client = LlmClient::gemini(&create_test_config(&server.uri(), None)).unwrap();
        let err = client.generate("hi").await.unwrap_err();

        assert!(err.to_string().contains("SAFETY"));
    }

    #[tokio::test]
    async fn test_malformed_body_is_an_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = LlmClient::gemini(&create_test_config(&server.uri(), None)).unwrap();

        assert!(client.generate("hi").await.is_err());
    }
}
