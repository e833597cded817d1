//! OpenAI-compatible client tests against a mock HTTP server.

use fsm_llm::{ChatMessage, CompletionRequest, LlmError, ModelClient, OpenAiClient};
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn request() -> CompletionRequest {
    CompletionRequest {
        messages: vec![
            ChatMessage::system("You are a light switcher."),
            ChatMessage::user("turn it on"),
        ],
        json_response: true,
        ..Default::default()
    }
}

#[tokio::test]
async fn complete_returns_the_first_choice_content() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .and(header("Authorization", "Bearer test-key"))
        .and(body_partial_json(serde_json::json!({
            "response_format": { "type": "json_object" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "choices": [
                { "message": { "content": "{\"response\":\"done\",\"transition\":null}" },
                  "finish_reason": "stop" }
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = OpenAiClient::new("test-key").with_base_url(server.uri());
    let reply = client.complete(request()).await.unwrap();
    assert_eq!(reply, "{\"response\":\"done\",\"transition\":null}");
}

#[tokio::test]
async fn complete_maps_server_errors_to_api_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = OpenAiClient::new("test-key").with_base_url(server.uri());
    let err = client.complete(request()).await.unwrap_err();
    assert!(matches!(err, LlmError::Api(msg) if msg.contains("500")));
}

#[tokio::test]
async fn complete_maps_unauthorized_to_auth_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(401).set_body_string("bad key"))
        .mount(&server)
        .await;

    let client = OpenAiClient::new("wrong-key").with_base_url(server.uri());
    let err = client.complete(request()).await.unwrap_err();
    assert!(matches!(err, LlmError::Auth(_)));
}

#[tokio::test]
async fn complete_rejects_a_malformed_completion_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "unexpected": true })),
        )
        .mount(&server)
        .await;

    let client = OpenAiClient::new("test-key").with_base_url(server.uri());
    let err = client.complete(request()).await.unwrap_err();
    assert!(matches!(err, LlmError::Json(_)));
}

#[tokio::test]
async fn complete_rejects_an_empty_choice_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "choices": [] })),
        )
        .mount(&server)
        .await;

    let client = OpenAiClient::new("test-key").with_base_url(server.uri());
    let err = client.complete(request()).await.unwrap_err();
    assert!(matches!(err, LlmError::Api(msg) if msg.contains("no choices")));
}
