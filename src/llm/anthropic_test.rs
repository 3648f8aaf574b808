use super::*;

#[test]
fn extracts_first_content_block_text() {
    let json = r#"{
        "content": [{"type": "text", "text": "sequenceDiagram\n    A->>B: hi"}],
        "model": "claude-sonnet-4-5",
        "stop_reason": "end_turn"
    }"#;
    assert_eq!(extract_text(json).unwrap(), "sequenceDiagram\n    A->>B: hi");
}

#[test]
fn explicit_error_becomes_provider_api() {
    let json = r#"{"type": "error", "error": {"type": "authentication_error", "message": "invalid x-api-key"}}"#;
    match extract_text(json).unwrap_err() {
        LlmError::ProviderApi { status: None, message } => assert_eq!(message, "invalid x-api-key"),
        other => panic!("unexpected: {other:?}"),
    }
}

#[test]
fn empty_content_is_empty_response() {
    assert!(matches!(extract_text(r#"{"content": []}"#).unwrap_err(), LlmError::EmptyResponse));
}

#[test]
fn malformed_json_is_parse_error() {
    assert!(matches!(extract_text("not json").unwrap_err(), LlmError::Parse(_)));
}
