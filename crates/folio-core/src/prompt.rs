//! Deterministic prompt composition.

use crate::history::{ChatTurn, Role};
use crate::persona::PERSONA_NAME;

/// Compose the full prompt sent to the generation gateway.
///
/// Layout: persona block, a separator, the conversation so far rendered
/// as alternating `User:` / persona lines, the current user line, and a
/// trailing cue so the model answers as the persona. Pure string
/// concatenation. When the history holds more than `max_turns` turns,
/// only the most recent ones are rendered.
pub fn compose(base_prompt: &str, history: &[ChatTurn], message: &str, max_turns: usize) -> String {
    let start = history.len().saturating_sub(max_turns);

    let mut prompt = String::with_capacity(base_prompt.len() + message.len() + 128);
    prompt.push_str(base_prompt);
    prompt.push_str("\n\n---\n\nCurrent conversation:\n");
    for turn in &history[start..] {
        let speaker = match turn.role {
            Role::User => "User",
            Role::Assistant => PERSONA_NAME,
        };
        prompt.push_str(speaker);
        prompt.push_str(": ");
        prompt.push_str(&turn.content);
        prompt.push('\n');
    }
    prompt.push_str("User: ");
    prompt.push_str(message);
    prompt.push('\n');
    prompt.push_str(PERSONA_NAME);
    prompt.push(':');
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: Role, content: &str) -> ChatTurn {
        ChatTurn {
            role,
            content: content.to_string(),
        }
    }

    #[test]
    fn empty_history_layout() {
        let prompt = compose("PERSONA", &[], "hi there", 40);
        assert_eq!(
            prompt,
            "PERSONA\n\n---\n\nCurrent conversation:\nUser: hi there\nRowan:"
        );
    }

    #[test]
    fn history_renders_in_order_with_labels() {
        let history = vec![
            turn(Role::User, "what do you do"),
            turn(Role::Assistant, "data science, mostly"),
            turn(Role::User, "nice"),
        ];
        let prompt = compose("P", &history, "tell me more", 40);

        let user_1 = prompt.find("User: what do you do").unwrap();
        let bot_1 = prompt.find("Rowan: data science, mostly").unwrap();
        let user_2 = prompt.find("User: nice").unwrap();
        let current = prompt.find("User: tell me more").unwrap();
        assert!(user_1 < bot_1 && bot_1 < user_2 && user_2 < current);
        assert!(prompt.ends_with("Rowan:"));
    }

    #[test]
    fn composition_is_deterministic() {
        let history = vec![turn(Role::User, "a"), turn(Role::Assistant, "b")];
        let one = compose("base", &history, "msg", 40);
        let two = compose("base", &history, "msg", 40);
        assert_eq!(one, two);
    }

    #[test]
    fn only_most_recent_turns_survive_the_cap() {
        let history: Vec<ChatTurn> = (1..=5)
            .map(|i| turn(Role::User, &format!("turn-{i}")))
            .collect();
        let prompt = compose("P", &history, "now", 2);

        assert!(!prompt.contains("turn-1"));
        assert!(!prompt.contains("turn-2"));
        assert!(!prompt.contains("turn-3"));
        let fourth = prompt.find("turn-4").unwrap();
        let fifth = prompt.find("turn-5").unwrap();
        assert!(fourth < fifth);
    }

    #[test]
    fn zero_cap_drops_all_history() {
        let history = vec![turn(Role::User, "old stuff")];
        let prompt = compose("P", &history, "new", 0);
        assert!(!prompt.contains("old stuff"));
        assert!(prompt.contains("User: new"));
    }
}
