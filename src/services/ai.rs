//! AI operations — prompt generation, chat, and applying generated code.
//!
//! DESIGN
//! ======
//! Both entry points funnel through the configured [`GenerateText`] backend
//! and feed successful diagram code into a typing session rather than
//! swapping the document instantly. Provider failures inside chat become
//! assistant messages (the conversation absorbs them); a missing config is
//! the one error callers must fix first, so it propagates.

use tracing::warn;

use crate::error::ErrorCode;
use crate::events::{self, NoticeLevel, UiEvent};
use crate::llm::config::ProviderConfig;
use crate::llm::postprocess::{clean_generated_text, extract_diagram_code};
use crate::llm::types::LlmError;
use crate::state::{AppState, ChatMessage, Role};
use crate::typing::run_typing_session;

const DEFAULT_UPDATE_REPLY: &str = "I've updated the diagram based on your request.";

// =============================================================================
// PROMPTS
// =============================================================================

fn build_generation_prompt(request: &str) -> String {
    format!(
        "You are a Mermaid diagram expert. Create Mermaid diagram code for the following request.\n\n\
         Request: {request}\n\n\
         Respond with only the Mermaid code inside a ```mermaid code fence. No explanations."
    )
}

fn build_chat_prompt(document: &str, message: &str) -> String {
    let mut prompt = String::from("You are a Mermaid diagram assistant inside a diagram editor.\n\n");
    if !document.trim().is_empty() {
        prompt.push_str("The user's current diagram code is:\n\n```mermaid\n");
        prompt.push_str(document);
        prompt.push_str("\n```\n\n");
    }
    prompt.push_str("User message: ");
    prompt.push_str(message);
    prompt.push_str(
        "\n\nIf the user asks for a new diagram or a change, reply with the full updated Mermaid \
         code inside a ```mermaid code fence, plus a short explanation. Otherwise answer \
         conversationally.",
    );
    prompt
}

// =============================================================================
// OPERATIONS
// =============================================================================

/// Generate a diagram from a free-form request, type it into the editor, and
/// return the cleaned diagram source.
///
/// # Errors
///
/// Returns [`LlmError`] for config, transport, and provider failures, and
/// [`LlmError::EmptyResponse`] when the reply yields no usable code.
pub async fn submit_prompt(state: &AppState, request: String) -> Result<String, LlmError> {
    if request.trim().is_empty() {
        return Err(LlmError::ConfigMissing { field: "prompt" });
    }
    let config = ProviderConfig::load(state.store.as_ref());
    config.validate()?;

    let reply = state.llm.generate(&config, &build_generation_prompt(&request)).await?;
    let code = extract_diagram_code(&reply).unwrap_or_else(|| clean_generated_text(&reply));
    if code.trim().is_empty() {
        return Err(LlmError::EmptyResponse);
    }

    tokio::spawn(run_typing_session(state.clone(), code.clone()));
    Ok(code)
}

/// Send a chat message. If the reply carries diagram code, the conversational
/// remainder becomes the assistant message, the code is returned alongside
/// it, and a typing session replays it into the editor; the snapshot attaches
/// to that message when typing completes.
///
/// # Errors
///
/// Returns [`LlmError::ConfigMissing`] when the message is blank or no
/// usable provider config is saved. Every other failure is absorbed as an
/// assistant reply.
pub async fn send_chat_message(
    state: &AppState,
    content: String,
) -> Result<(ChatMessage, Option<String>), LlmError> {
    if content.trim().is_empty() {
        return Err(LlmError::ConfigMissing { field: "message" });
    }
    let config = ProviderConfig::load(state.store.as_ref());
    config.validate()?;

    let document = {
        let mut session = state.session.write().await;
        session.chat.push(ChatMessage::new(Role::User, content.clone()));
        session.document.clone()
    };

    let prompt = build_chat_prompt(&document, &content);
    let (assistant, code) = match state.llm.generate(&config, &prompt).await {
        Ok(reply) => match extract_diagram_code(&reply) {
            Some(code) => {
                let prose = strip_fenced_block(&reply);
                let text = if prose.is_empty() { DEFAULT_UPDATE_REPLY.to_owned() } else { prose };
                (ChatMessage::new(Role::Assistant, text), Some(code))
            }
            None => (ChatMessage::new(Role::Assistant, reply.trim().to_owned()), None),
        },
        Err(err) => {
            warn!(code = err.error_code(), error = %err, "ai: chat generation failed");
            events::publish(&state.events, UiEvent::Notice {
                level: NoticeLevel::Error,
                message: err.to_string(),
            });
            let text = match err {
                // Already phrased as a full diagnostic.
                LlmError::EmptyResponse => err.to_string(),
                _ => format!("Sorry, I ran into a problem: {err}"),
            };
            (ChatMessage::new(Role::Assistant, text), None)
        }
    };

    state.session.write().await.chat.push(assistant.clone());
    if let Some(code) = code.clone() {
        tokio::spawn(run_typing_session(state.clone(), code));
    }
    Ok((assistant, code))
}

/// Commit generated code to the document directly (no typing replay),
/// recording it in history and refreshing the preview.
pub async fn apply_generated_code(state: &AppState, code: String) {
    crate::services::history::record(state.store.as_ref(), &code);
    crate::services::editor::set_document(state, code, None).await;
}

/// Drop the first fenced block from a reply, keeping the surrounding prose.
fn strip_fenced_block(reply: &str) -> String {
    let Some(start) = reply.find("```") else {
        return reply.trim().to_owned();
    };
    let after = &reply[start + 3..];
    let Some(rel_end) = after.find("```") else {
        return reply[..start].trim().to_owned();
    };
    let end = start + 3 + rel_end + 3;

    let head = reply[..start].trim();
    let tail = reply[end..].trim();
    match (head.is_empty(), tail.is_empty()) {
        (true, true) => String::new(),
        (false, true) => head.to_owned(),
        (true, false) => tail.to_owned(),
        (false, false) => format!("{head}\n\n{tail}"),
    }
}

#[cfg(test)]
#[path = "ai_test.rs"]
mod tests;
