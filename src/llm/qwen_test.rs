use super::*;

#[test]
fn extracts_output_text() {
    let json = r#"{"output": {"text": "gantt\n    title Plan", "finish_reason": "stop"}, "request_id": "abc"}"#;
    assert_eq!(extract_text(json).unwrap(), "gantt\n    title Plan");
}

#[test]
fn top_level_code_and_message_become_provider_api() {
    let json = r#"{"code": "InvalidApiKey", "message": "Invalid API-key provided.", "request_id": "abc"}"#;
    match extract_text(json).unwrap_err() {
        LlmError::ProviderApi { status: None, message } => {
            assert_eq!(message, "InvalidApiKey: Invalid API-key provided.");
        }
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn message_without_code_passes_through() {
    let json = r#"{"message": "throttled"}"#;
    match extract_text(json).unwrap_err() {
        LlmError::ProviderApi { message, .. } => assert_eq!(message, "throttled"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn missing_output_and_message_is_empty_response() {
    assert!(matches!(extract_text(r#"{"request_id": "abc"}"#).unwrap_err(), LlmError::EmptyResponse));
}

#[test]
fn request_body_nests_input_and_parameters() {
    let body = ApiRequest {
        model: "qwen-plus",
        input: Input { messages: vec![WireMessage { role: "user", content: "hi" }] },
        parameters: Parameters { max_tokens: MAX_TOKENS, temperature: TEMPERATURE },
    };
    let value = serde_json::to_value(&body).unwrap();
    assert_eq!(value["input"]["messages"][0]["content"], "hi");
    assert_eq!(value["parameters"]["max_tokens"], 2000);
}
