#![cfg(test)]

use std::{io::Write, sync::Arc};

use async_trait::async_trait;
use axum::{
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use car_advisor::{
    base::{
        config::{Config, ConfigInner},
        types::{RelayError, Res, Submission},
    },
    interaction::submission::handle_submission,
    runtime::Runtime,
    service::{
        llm::{GenericLlmClient, LlmClient},
        web,
    },
};
use mockall::mock;
use serde_json::json;
use tower::ServiceExt;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_string_contains, method, path},
};

// Mocks.

// Mock LLM client for testing.

mock! {
    pub Llm {}

    #[async_trait]
    impl GenericLlmClient for Llm {
        fn name(&self) -> &str;
        async fn generate(&self, prompt: &str) -> Res<String>;
    }
}

const CARS: &str = "brand,model,segment\nToyota,Corolla,compact\nHonda,Civic,compact\nFord,Ranger,pickup\n";

/// Helper function to write the dataset to a temporary file.
fn write_dataset() -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    write!(file, "{CARS}").unwrap();
    file
}

/// Helper function to build a config against a local Gemini stand-in.
fn config_for(base_url: &str, dataset: Option<&std::path::Path>) -> Config {
    Config::new(ConfigInner {
        google_api_key: Some("test_key".to_string()),
        gemini_base_url: base_url.to_string(),
        dataset_path: dataset.map(|p| p.to_path_buf()),
        ..Default::default()
    })
    .unwrap()
}

async fn body_text(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn test_dataset_variant_end_to_end() {
    let server = MockServer::start().await;
    let dataset = write_dataset();

    // The whole serialized dataset must reach the endpoint.
    Mock::given(method("POST"))
        .and(path("/models/gemini-1.5-pro:generateContent"))
        .and(body_string_contains("Ford,Ranger,pickup"))
        .and(body_string_contains("User question: Which compact should I buy?"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "candidates": [{ "content": { "parts": [{ "text": "The Civic, for its resale value." }] } }]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let runtime = Runtime::new(config_for(&server.uri(), Some(dataset.path()))).unwrap();
    assert_eq!(runtime.dataset.as_ref().map(|d| d.len()), Some(3));

    let response = web::router(runtime)
        .unwrap()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ask")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("question=Which+compact+should+I+buy%3F"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);

    let html = body_text(response).await;
    assert!(html.contains("<h2>Your Advisory</h2>"));
    assert!(html.contains("The Civic, for its resale value."));
    assert!(html.contains("Filter by brand"));
}

#[tokio::test]
async fn test_remote_failure_is_recovered() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503).set_body_string("overloaded"))
        .expect(1)
        .mount(&server)
        .await;

    let runtime = Runtime::new(config_for(&server.uri(), None)).unwrap();

    let outcome = handle_submission(&runtime, "Is a hybrid worth it?").await;

    assert!(matches!(outcome, Submission::Fallback { ref message, .. } if message == "I'm sorry, I couldn't process your request right now."));
}

#[tokio::test]
async fn test_missing_dataset_halts_startup() {
    let server = MockServer::start().await;

    // Nothing may be sent when startup fails.
    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("cars.csv");

    let err = Runtime::new(config_for(&server.uri(), Some(&missing))).err().expect("startup should fail");

    assert!(matches!(err.downcast_ref::<RelayError>(), Some(RelayError::DatasetUnavailable { .. })));
}

#[tokio::test]
async fn test_missing_credential_halts_before_any_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST")).respond_with(ResponseTemplate::new(200)).expect(0).mount(&server).await;

    // Nothing but the endpoint in the file, and no credential anywhere in the environment.
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "gemini_base_url = \"{}\"", server.uri()).unwrap();

    let result = temp_env::with_vars(
        [
            ("GOOGLE_API_KEY", None::<&str>),
            ("OPENAI_API_KEY", None),
            ("CAR_ADVISOR_GOOGLE_API_KEY", None),
            ("CAR_ADVISOR_OPENAI_API_KEY", None),
            ("CAR_ADVISOR_LLM_PROVIDER", None),
        ],
        || Config::load(Some(file.path())),
    );

    let err = result.err().expect("config should be rejected");
    let relay = err.downcast_ref::<RelayError>().unwrap();

    assert_eq!(relay, &RelayError::ConfigurationMissing("google_api_key".to_string()));
    assert!(relay.is_fatal());
}

#[tokio::test]
async fn test_mocked_runtime_without_dataset() {
    let mut mock = MockLlm::new();
    mock.expect_name().return_const("mock".to_string());
    mock.expect_generate()
        .withf(|prompt: &str| !prompt.contains("Reference dataset:") && prompt.ends_with("User question: Best city car?"))
        .times(1)
        .returning(|_| Ok("A small hatchback.".to_string()));

    let runtime = Runtime {
        config: config_for("http://unused", None),
        llm: LlmClient::new(Arc::new(mock)),
        dataset: None,
    };

    assert_eq!(handle_submission(&runtime, "Best city car?").await, Submission::Advisory("A small hatchback.".to_string()));
}
