use docqa::{AnswerGenerator, GenerateError, GeneratorConfig, SamplingParams};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, Request, ResponseTemplate};

const DEPLOYMENT_PATH: &str = "/openai/deployments/gpt-4o-mini/chat/completions";

fn completion(text: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "object": "chat.completion",
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": text },
            "finish_reason": "stop"
        }]
    })
}

#[tokio::test]
async fn sends_one_request_with_fixed_sampling_and_returns_text() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(DEPLOYMENT_PATH))
        .and(query_param("api-version", "2024-06-01"))
        .and(header("api-key", "test-key"))
        .and(body_partial_json(json!({
            "model": "gpt-4o-mini",
            "temperature": 0.7,
            "top_p": 0.6,
            "max_tokens": 256,
            "frequency_penalty": 0.7
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("The lease runs for 12 months.")))
        .expect(1)
        .mount(&server)
        .await;

    let generator = AnswerGenerator::new(GeneratorConfig::new(server.uri(), "test-key"));
    let answer = generator
        .generate("How long is the lease?", "This lease is valid for twelve months.")
        .await
        .unwrap();

    assert_eq!(answer, "The lease runs for 12 months.");

    let requests: Vec<Request> = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);

    let body: serde_json::Value = serde_json::from_slice(&requests[0].body).unwrap();
    let messages = body["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 1);
    assert_eq!(messages[0]["role"], "user");
    let content = messages[0]["content"].as_str().unwrap();
    assert!(content.contains("This lease is valid for twelve months."));
    assert!(content.contains("Question: How long is the lease?"));
}

#[tokio::test]
async fn missing_key_makes_no_network_call() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("unused")))
        .expect(0)
        .mount(&server)
        .await;

    let config = GeneratorConfig {
        endpoint: Some(server.uri()),
        api_key: None,
        ..GeneratorConfig::default()
    };
    let err = AnswerGenerator::new(config)
        .generate("Anything?", "context")
        .await
        .unwrap_err();

    assert!(matches!(err, GenerateError::MissingCredentials));
}

#[tokio::test]
async fn api_error_is_surfaced_with_status_and_message() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path(DEPLOYMENT_PATH))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "error": { "code": "401", "message": "Access denied due to invalid subscription key." }
        })))
        .mount(&server)
        .await;

    let err = AnswerGenerator::new(GeneratorConfig::new(server.uri(), "wrong"))
        .generate("q?", "ctx")
        .await
        .unwrap_err();

    match err {
        GenerateError::Api { status, message } => {
            assert_eq!(status, 401);
            assert!(message.contains("invalid subscription key"));
        }
        other => panic!("expected Api error, got {other:?}"),
    }
}

#[tokio::test]
async fn non_json_error_body_is_kept_verbatim() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(502).set_body_string("Bad Gateway"))
        .mount(&server)
        .await;

    let err = AnswerGenerator::new(GeneratorConfig::new(server.uri(), "k"))
        .generate("q?", "ctx")
        .await
        .unwrap_err();

    assert!(matches!(err, GenerateError::Api { status: 502, ref message } if message == "Bad Gateway"));
}

#[tokio::test]
async fn empty_choices_is_a_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "choices": [] })))
        .mount(&server)
        .await;

    let err = AnswerGenerator::new(GeneratorConfig::new(server.uri(), "k"))
        .generate("q?", "ctx")
        .await
        .unwrap_err();

    assert!(matches!(err, GenerateError::EmptyCompletion));
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_error() {
    // Nothing listens on the discard port.
    let generator = AnswerGenerator::new(GeneratorConfig::new("http://127.0.0.1:9", "k"));
    let err = generator.generate("q?", "ctx").await.unwrap_err();
    assert!(matches!(err, GenerateError::Transport(_)));
}

#[tokio::test]
async fn overridden_sampling_and_deployment_are_sent() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/openai/deployments/gpt-4o/chat/completions"))
        .and(query_param("api-version", "2024-10-21"))
        .and(body_partial_json(json!({
            "model": "gpt-4o",
            "temperature": 0.0,
            "max_tokens": 64
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(completion("ok")))
        .expect(1)
        .mount(&server)
        .await;

    let config = GeneratorConfig::new(server.uri(), "k")
        .with_model("gpt-4o")
        .with_api_version("2024-10-21")
        .with_sampling(SamplingParams {
            temperature: 0.0,
            max_tokens: 64,
            ..SamplingParams::default()
        });

    let answer = AnswerGenerator::new(config).generate("q?", "").await.unwrap();
    assert_eq!(answer, "ok");
}
