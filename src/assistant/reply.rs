//! Best-effort parsing of an external assistant's textual reply, and the
//! section summary handed to such a backend as conversation context.
//!
//! The expected reply shape is `{message, actions, suggestions}`. Parsing
//! degrades gracefully: direct JSON parse, else the first `{` … last `}`
//! span, else the raw text becomes a plain message with no actions. Never
//! panics, never errors to the caller.

use serde::{Deserialize, Serialize};

use crate::assistant::runner::ActionRequest;
use crate::site::Section;

/// Reply shown when the backend's message is empty but actions parsed.
const DEFAULT_ACTION_MESSAGE: &str = "Action effectuée !";
/// Reply shown when nothing could be parsed and the raw text is empty.
const DEFAULT_FAILURE_MESSAGE: &str = "Je n'ai pas compris, peux-tu reformuler ?";

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Structured reply of an assistant backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AssistantReply {
    pub message: String,
    pub actions: Vec<ActionRequest>,
    pub suggestions: Vec<String>,
}

/// Parse outcome. On failure `data` still carries a displayable message with
/// empty actions — the caller shows the message and changes nothing.
#[derive(Debug, Clone)]
pub struct ParsedReply {
    pub success: bool,
    pub data: AssistantReply,
}

// ---------------------------------------------------------------------------
// Parsing
// ---------------------------------------------------------------------------

/// Extract a structured `{message, actions, suggestions}` reply from an
/// arbitrary string.
pub fn parse_assistant_reply(raw: &str) -> ParsedReply {
    if let Some(reply) = try_parse(raw) {
        return ParsedReply {
            success: true,
            data: reply,
        };
    }

    // The reply may wrap the JSON in prose or a code fence: retry on the
    // outermost brace span.
    if let (Some(start), Some(end)) = (raw.find('{'), raw.rfind('}')) {
        if start < end {
            if let Some(reply) = try_parse(&raw[start..=end]) {
                return ParsedReply {
                    success: true,
                    data: reply,
                };
            }
        }
    }

    let message = if raw.trim().is_empty() {
        DEFAULT_FAILURE_MESSAGE.to_string()
    } else {
        raw.to_string()
    };
    ParsedReply {
        success: false,
        data: AssistantReply {
            message,
            actions: Vec::new(),
            suggestions: Vec::new(),
        },
    }
}

fn try_parse(text: &str) -> Option<AssistantReply> {
    let mut reply: AssistantReply = serde_json::from_str(text).ok()?;
    if reply.message.is_empty() {
        reply.message = DEFAULT_ACTION_MESSAGE.to_string();
    }
    Some(reply)
}

// ---------------------------------------------------------------------------
// Section context summary
// ---------------------------------------------------------------------------

/// Plain-text summary of a section's current state, as handed to an
/// external assistant backend alongside the user's message.
pub fn section_context(section: &Section) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Section actuelle: {} (id: {})\n",
        section.kind.as_str(),
        section.id
    ));
    out.push_str(&format!("Layout: {}\n", section.layout.variant));
    out.push_str(&format!("Espacement: {}\n", section.layout.spacing.as_str()));

    let content = serde_json::to_string_pretty(&section.content).unwrap_or_default();
    out.push_str(&format!("Contenu:\n{}\n", content));
    let colors = serde_json::to_string_pretty(&section.colors).unwrap_or_default();
    out.push_str(&format!("Couleurs:\n{}\n", colors));

    if !section.items.is_empty() {
        let labels: Vec<&str> = section.items.iter().map(|i| i.display_label()).collect();
        out.push_str(&format!(
            "Items ({}): {}\n",
            section.items.len(),
            labels.join(", ")
        ));
    }
    out.trim_end().to_string()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::site::Site;

    #[test]
    fn test_parse_direct_json() {
        let parsed = parse_assistant_reply(
            r#"{"message": "Fait !", "actions": [{"action": "updateLayout", "variant": "grid-2"}], "suggestions": ["Les couleurs"]}"#,
        );
        assert!(parsed.success);
        assert_eq!(parsed.data.message, "Fait !");
        assert_eq!(parsed.data.actions.len(), 1);
        assert_eq!(parsed.data.actions[0].action, "updateLayout");
        assert_eq!(parsed.data.suggestions, vec!["Les couleurs"]);
    }

    #[test]
    fn test_parse_json_embedded_in_prose() {
        let parsed = parse_assistant_reply(
            "Voici la réponse :\n{\"message\": \"OK\", \"actions\": []}\nVoilà.",
        );
        assert!(parsed.success);
        assert_eq!(parsed.data.message, "OK");
    }

    #[test]
    fn test_parse_missing_fields_get_defaults() {
        let parsed = parse_assistant_reply(r#"{"actions": []}"#);
        assert!(parsed.success);
        assert_eq!(parsed.data.message, DEFAULT_ACTION_MESSAGE);
        assert!(parsed.data.suggestions.is_empty());
    }

    #[test]
    fn test_parse_plain_text_degrades() {
        let parsed = parse_assistant_reply("Désolé, je ne peux pas.");
        assert!(!parsed.success);
        assert_eq!(parsed.data.message, "Désolé, je ne peux pas.");
        assert!(parsed.data.actions.is_empty());
    }

    #[test]
    fn test_parse_empty_text_gets_generic_message() {
        let parsed = parse_assistant_reply("   ");
        assert!(!parsed.success);
        assert_eq!(parsed.data.message, DEFAULT_FAILURE_MESSAGE);
    }

    #[test]
    fn test_parse_broken_braces_degrades() {
        let parsed = parse_assistant_reply("{not json at all");
        assert!(!parsed.success);
        assert!(parsed.data.actions.is_empty());
    }

    #[test]
    fn test_section_context_summary() {
        let site = Site::default_site();
        let summary = section_context(&site.sections["pricing"]);
        assert!(summary.contains("Section actuelle: pricing"));
        assert!(summary.contains("Layout: cards"));
        assert!(summary.contains("Items (3): Starter, Pro, Business"));
    }
}
