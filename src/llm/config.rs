//! Provider configuration — the persisted AI settings record.
//!
//! One active config at a time, persisted as a flat JSON blob under the
//! `ai-config` key. The provider set is closed and enumerable; adding a
//! provider means adding a variant and its dispatch arm, caught by
//! exhaustiveness checking.

use serde::{Deserialize, Serialize};

use super::types::LlmError;
use crate::storage::KvStore;

pub const CONFIG_KEY: &str = "ai-config";

pub const OPENAI_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
pub const ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const QWEN_ENDPOINT: &str = "https://dashscope.aliyuncs.com/api/v1/services/aigc/text-generation/generation";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    OpenAi,
    Anthropic,
    Gemini,
    Qwen,
    /// OpenAI-compatible API at a user-supplied endpoint.
    Custom,
}

impl ProviderKind {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Gemini => "gemini",
            Self::Qwen => "qwen",
            Self::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: ProviderKind,
    #[serde(default)]
    pub api_key: String,
    #[serde(default)]
    pub model: String,
    /// Only honored when `provider` is [`ProviderKind::Custom`].
    #[serde(default)]
    pub custom_endpoint: Option<String>,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self { provider: ProviderKind::OpenAi, api_key: String::new(), model: String::new(), custom_endpoint: None }
    }
}

impl ProviderConfig {
    /// Check the fields a request cannot go out without.
    ///
    /// # Errors
    ///
    /// Returns [`LlmError::ConfigMissing`] naming the first absent field.
    pub fn validate(&self) -> Result<(), LlmError> {
        if self.api_key.trim().is_empty() {
            return Err(LlmError::ConfigMissing { field: "API key" });
        }
        if self.model.trim().is_empty() {
            return Err(LlmError::ConfigMissing { field: "model id" });
        }
        if self.provider == ProviderKind::Custom
            && self.custom_endpoint.as_deref().is_none_or(|e| e.trim().is_empty())
        {
            return Err(LlmError::ConfigMissing { field: "custom endpoint" });
        }
        Ok(())
    }

    /// Load the persisted config, falling back to defaults on a missing or
    /// unreadable blob (best-effort storage contract).
    #[must_use]
    pub fn load(store: &dyn KvStore) -> Self {
        store
            .get(CONFIG_KEY)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }

    /// Persist the config. Failures are swallowed by the store.
    pub fn save(&self, store: &dyn KvStore) {
        if let Ok(raw) = serde_json::to_string(self) {
            store.set(CONFIG_KEY, &raw);
        }
    }
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
