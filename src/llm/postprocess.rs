//! Normalization of raw model replies into usable diagram source.
//!
//! Models wrap code in Markdown fences, re-echo prose around it, and pad
//! with blank lines. `extract_diagram_code` pulls the diagram out of a
//! chat-style reply; `clean_generated_text` scrubs a reply that is
//! expected to be code already.

/// Prefixes that identify a Mermaid diagram by its first token.
const DIAGRAM_KEYWORDS: &[&str] = &[
    "flowchart",
    "graph",
    "sequenceDiagram",
    "classDiagram",
    "erDiagram",
    "journey",
    "pie",
    "gantt",
    "gitgraph",
    "mindmap",
    "timeline",
    "quadrantChart",
    "xychart-beta",
];

/// Strip Markdown fence lines, collapse runs of blank lines to one, and
/// trim the result.
#[must_use]
pub fn clean_generated_text(text: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    let mut prev_blank = false;
    for line in text.lines() {
        let trimmed = line.trim();
        if trimmed.starts_with("```") {
            continue;
        }
        let blank = trimmed.is_empty();
        if blank && prev_blank {
            continue;
        }
        kept.push(line);
        prev_blank = blank;
    }
    kept.join("\n").trim().to_string()
}

/// Pull Mermaid source out of a chat reply.
///
/// Preference order: a ```` ```mermaid ```` fence, then any fence whose
/// body opens with a diagram keyword, then the bare reply if it opens
/// with one. Returns `None` when the reply carries no recognizable
/// diagram.
#[must_use]
pub fn extract_diagram_code(text: &str) -> Option<String> {
    if let Some(body) = fence_body(text, "```mermaid") {
        return Some(clean_generated_text(body));
    }
    if let Some(body) = fence_body(text, "```")
        && starts_with_diagram_keyword(body)
    {
        return Some(clean_generated_text(body));
    }
    let trimmed = text.trim();
    if starts_with_diagram_keyword(trimmed) {
        return Some(clean_generated_text(trimmed));
    }
    None
}

fn starts_with_diagram_keyword(text: &str) -> bool {
    let head = text.trim_start();
    DIAGRAM_KEYWORDS.iter().any(|k| head.starts_with(k))
}

/// Body of the first fence opened by `opener`, trimmed. The opener line
/// is consumed through its newline; the body ends at the next ```` ``` ````.
fn fence_body<'a>(text: &'a str, opener: &str) -> Option<&'a str> {
    let start = text.find(opener)?;
    let rest = &text[start + opener.len()..];
    let body_start = rest.find('\n')? + 1;
    let body = &rest[body_start..];
    let end = body.find("```")?;
    Some(body[..end].trim())
}

#[cfg(test)]
#[path = "postprocess_test.rs"]
mod tests;
