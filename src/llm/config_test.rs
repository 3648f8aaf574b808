use super::*;
use crate::storage::MemoryStore;

fn valid() -> ProviderConfig {
    ProviderConfig {
        provider: ProviderKind::Anthropic,
        api_key: "sk-ant-test".into(),
        model: "claude-sonnet-4-5".into(),
        custom_endpoint: None,
    }
}

#[test]
fn valid_config_passes() {
    assert!(valid().validate().is_ok());
}

#[test]
fn missing_api_key_is_rejected() {
    let mut config = valid();
    config.api_key = "  ".into();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, LlmError::ConfigMissing { field: "API key" }));
}

#[test]
fn missing_model_is_rejected() {
    let mut config = valid();
    config.model = String::new();
    let err = config.validate().unwrap_err();
    assert!(matches!(err, LlmError::ConfigMissing { field: "model id" }));
}

#[test]
fn custom_provider_requires_endpoint() {
    let mut config = valid();
    config.provider = ProviderKind::Custom;
    config.custom_endpoint = None;
    assert!(matches!(
        config.validate().unwrap_err(),
        LlmError::ConfigMissing { field: "custom endpoint" }
    ));

    config.custom_endpoint = Some("https://llm.internal/v1/chat/completions".into());
    assert!(config.validate().is_ok());
}

#[test]
fn load_defaults_when_nothing_persisted() {
    let store = MemoryStore::new();
    let config = ProviderConfig::load(&store);
    assert_eq!(config.provider, ProviderKind::OpenAi);
    assert!(config.api_key.is_empty());
}

#[test]
fn save_then_load_round_trips() {
    let store = MemoryStore::new();
    let config = valid();
    config.save(&store);
    assert_eq!(ProviderConfig::load(&store), config);
}

#[test]
fn load_ignores_corrupt_blob() {
    let store = MemoryStore::new();
    store.set(CONFIG_KEY, "{not json");
    assert_eq!(ProviderConfig::load(&store), ProviderConfig::default());
}

#[test]
fn provider_kind_serde_uses_lowercase_ids() {
    let json = serde_json::to_string(&ProviderKind::OpenAi).unwrap();
    assert_eq!(json, "\"openai\"");
    let kind: ProviderKind = serde_json::from_str("\"qwen\"").unwrap();
    assert_eq!(kind, ProviderKind::Qwen);
}
