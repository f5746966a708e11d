//! Validation of client-supplied conversation history.
//!
//! History arrives as untyped JSON. Anything that is not an array yields
//! an empty history; individual entries that are malformed are dropped
//! without failing the request.

use serde_json::Value;

use crate::sanitize::sanitize_input;

/// Who produced a turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Accepted wire names. The public chat widget sends `bot` for
    /// assistant turns; `assistant` is accepted for API callers.
    fn from_wire(raw: &str) -> Option<Self> {
        match raw {
            "user" => Some(Role::User),
            "bot" | "assistant" => Some(Role::Assistant),
            _ => None,
        }
    }
}

/// A single validated conversation turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

/// Filter a raw `history` value down to well-formed turns.
///
/// An entry survives only when it is an object with a recognized `role`
/// and a string `content` of at most `max_chars` characters; content is
/// sanitized on the way through and turns that sanitize to empty are
/// dropped. Relative order of the survivors is preserved.
pub fn validate_history(raw: &Value, max_chars: usize) -> Vec<ChatTurn> {
    let Some(entries) = raw.as_array() else {
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| {
            let role = Role::from_wire(entry.get("role")?.as_str()?)?;
            let content = entry.get("content")?.as_str()?;
            if content.chars().count() > max_chars {
                return None;
            }
            let content = sanitize_input(content);
            if content.is_empty() {
                return None;
            }
            Some(ChatTurn { role, content })
        })
        .collect()
}
