//! Integration tests for the inference clients using WireMock
//!
//! These tests mock the Ollama and llama.cpp HTTP APIs to verify client
//! behavior without a running model server.

use ai_core::{
    InferenceConfig, InferenceEngine, InferenceError, InferenceMessage, InferenceRequest,
    LlamaCppInferenceEngine, OllamaInferenceEngine,
};
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{body_partial_json, header, method, path},
};

// =============================================================================
// Test Helpers
// =============================================================================

fn config_for_mock(base_url: &str) -> InferenceConfig {
    InferenceConfig {
        base_url: base_url.to_string(),
        default_model: "test-model".to_string(),
        api_key: None,
        temperature: 0.7,
        max_tokens: 100,
        top_p: 0.9,
        timeout_ms: 5000,
        warm_up: false,
    }
}

fn coaching_request() -> InferenceRequest {
    InferenceRequest::from_messages(vec![
        InferenceMessage::system("You are a friendly French pronunciation coach."),
        InferenceMessage::user("The user said: 'merci'"),
    ])
}

// =============================================================================
// Ollama
// =============================================================================

mod ollama {
    use super::*;

    fn chat_success_response() -> serde_json::Value {
        serde_json::json!({
            "model": "test-model",
            "message": {
                "role": "assistant",
                "content": "  Good attempt! Open your mouth slightly more.  "
            },
            "done": true,
            "prompt_eval_count": 10,
            "eval_count": 15
        })
    }

    #[tokio::test]
    async fn generate_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .and(body_partial_json(serde_json::json!({
                "model": "test-model",
                "stream": false,
                "options": { "num_predict": 100 }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(chat_success_response()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let engine = OllamaInferenceEngine::new(config_for_mock(&mock_server.uri())).unwrap();
        let response = engine.generate(coaching_request()).await.unwrap();

        assert_eq!(response.content, "Good attempt! Open your mouth slightly more.");
        assert_eq!(response.model, "test-model");
        assert_eq!(response.usage.map(|u| u.total_tokens), Some(25));
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    }

    #[tokio::test]
    async fn missing_model_is_reported() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(
                ResponseTemplate::new(404)
                    .set_body_json(serde_json::json!({"error": "model not found"})),
            )
            .mount(&mock_server)
            .await;

        let engine = OllamaInferenceEngine::new(config_for_mock(&mock_server.uri())).unwrap();
        let result = engine.generate(coaching_request()).await;

        assert!(matches!(result, Err(InferenceError::ModelNotAvailable(m)) if m == "test-model"));
    }

    #[tokio::test]
    async fn server_error_is_reported() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(500).set_body_string("oops"))
            .mount(&mock_server)
            .await;

        let engine = OllamaInferenceEngine::new(config_for_mock(&mock_server.uri())).unwrap();
        let result = engine.generate(coaching_request()).await;

        assert!(matches!(result, Err(InferenceError::ServerError(_))));
    }

    #[tokio::test]
    async fn invalid_json_is_reported() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/api/chat"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&mock_server)
            .await;

        let engine = OllamaInferenceEngine::new(config_for_mock(&mock_server.uri())).unwrap();
        let result = engine.generate(coaching_request()).await;

        assert!(matches!(result, Err(InferenceError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn health_and_models() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/api/tags"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "models": [{"name": "llama3.2:3b-instruct"}, {"name": "mistral"}]
            })))
            .mount(&mock_server)
            .await;

        let engine = OllamaInferenceEngine::new(config_for_mock(&mock_server.uri())).unwrap();

        assert!(engine.health_check().await.unwrap());
        assert_eq!(
            engine.list_models().await.unwrap(),
            vec!["llama3.2:3b-instruct".to_string(), "mistral".to_string()]
        );
    }

    #[tokio::test]
    async fn unreachable_server_is_unhealthy() {
        let engine = OllamaInferenceEngine::new(config_for_mock("http://127.0.0.1:1")).unwrap();
        assert!(!engine.health_check().await.unwrap());
    }
}

// =============================================================================
// llama.cpp
// =============================================================================

mod llama_cpp {
    use super::*;

    fn completion_response() -> serde_json::Value {
        serde_json::json!({
            "id": "chatcmpl-1",
            "object": "chat.completion",
            "model": "lucie",
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": "Nice try! The 'on' is nasal." },
                "finish_reason": "stop"
            }],
            "usage": { "prompt_tokens": 40, "completion_tokens": 8, "total_tokens": 48 }
        })
    }

    #[tokio::test]
    async fn generate_success() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(header("authorization", "Bearer secret"))
            .and(body_partial_json(serde_json::json!({
                "model": "test-model",
                "max_tokens": 100,
                "messages": [
                    {"role": "system", "content": "You are a friendly French pronunciation coach."},
                    {"role": "user", "content": "The user said: 'merci'"}
                ]
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion_response()))
            .expect(1)
            .mount(&mock_server)
            .await;

        let config = InferenceConfig {
            api_key: Some("secret".to_string()),
            ..config_for_mock(&mock_server.uri())
        };
        let engine = LlamaCppInferenceEngine::new(config).unwrap();
        let response = engine.generate(coaching_request()).await.unwrap();

        assert_eq!(response.content, "Nice try! The 'on' is nasal.");
        assert_eq!(response.model, "lucie");
        assert_eq!(response.usage.map(|u| u.total_tokens), Some(48));
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
    }

    #[tokio::test]
    async fn empty_choices_is_invalid() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "choices": []
            })))
            .mount(&mock_server)
            .await;

        let engine = LlamaCppInferenceEngine::new(config_for_mock(&mock_server.uri())).unwrap();
        let result = engine.generate(coaching_request()).await;

        assert!(matches!(result, Err(InferenceError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn loading_model_is_not_available() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(503))
            .mount(&mock_server)
            .await;

        let engine = LlamaCppInferenceEngine::new(config_for_mock(&mock_server.uri())).unwrap();
        let result = engine.generate(coaching_request()).await;

        assert!(matches!(result, Err(InferenceError::ModelNotAvailable(_))));
    }

    #[tokio::test]
    async fn health_and_models() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/health"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"status": "ok"})))
            .mount(&mock_server)
            .await;
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "object": "list",
                "data": [{"id": "lucie", "object": "model"}]
            })))
            .mount(&mock_server)
            .await;

        let engine = LlamaCppInferenceEngine::new(config_for_mock(&mock_server.uri())).unwrap();

        assert!(engine.health_check().await.unwrap());
        assert_eq!(engine.list_models().await.unwrap(), vec!["lucie".to_string()]);
    }
}
