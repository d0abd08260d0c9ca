use crate::models::{ChatRole, ChatTurn};
use crate::services::llm::{LlmClient, LlmError, LlmMessage};

/// Earlier turns forwarded to the model with each question
pub const MAX_HISTORY_TURNS: usize = 20;

const CAREER_SYSTEM: &str = "You are a career advisor for people looking for remote work, \
many of them outside North America and Europe. Give practical, specific advice about remote \
job searching, resumes, interviews, salary negotiation and working across time zones. \
Keep answers under 250 words.";

/// Build the message list for a chat call from prior turns and the new question
///
/// Only the most recent turns are kept, and the list never starts with an assistant turn.
/// Consecutive turns from the same role are joined into one message so roles alternate.
pub fn build_conversation(history: &[ChatTurn], message: &str) -> Vec<LlmMessage> {
    let recent = &history[history.len().saturating_sub(MAX_HISTORY_TURNS)..];
    let first_user = recent
        .iter()
        .position(|t| t.role == ChatRole::User)
        .unwrap_or(recent.len());

    let turns = recent[first_user..]
        .iter()
        .filter(|t| !t.content.trim().is_empty())
        .map(|t| (t.role, t.content.as_str()))
        .chain(std::iter::once((ChatRole::User, message)));

    let mut messages: Vec<LlmMessage> = Vec::new();
    for (role, content) in turns {
        match messages.last_mut() {
            Some(last) if last.role == role.as_str() => {
                last.content.push_str("\n\n");
                last.content.push_str(content);
            }
            _ => messages.push(match role {
                ChatRole::User => LlmMessage::user(content),
                ChatRole::Assistant => LlmMessage::assistant(content),
            }),
        }
    }

    messages
}

/// Ask the career advisor a question
pub async fn career_reply(llm: &LlmClient, history: &[ChatTurn], message: &str) -> Result<String, LlmError> {
    let messages = build_conversation(history, message);
    tracing::debug!("Career chat with {} messages", messages.len());
    llm.complete(CAREER_SYSTEM, &messages).await
}

#[cfg(test)]
mod tests {
    use super::*;

    fn turn(role: ChatRole, content: &str) -> ChatTurn {
        ChatTurn {
            role,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_conversation_appends_question() {
        let history = vec![
            turn(ChatRole::User, "How do I find remote work?"),
            turn(ChatRole::Assistant, "Start with async-first companies."),
        ];

        let messages = build_conversation(&history, "Which ones?");
        let roles: Vec<&str> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec!["user", "assistant", "user"]);
        assert_eq!(messages[2].content, "Which ones?");
    }

    #[test]
    fn test_conversation_caps_history() {
        let history: Vec<ChatTurn> = (0..30)
            .map(|i| {
                let role = if i % 2 == 0 { ChatRole::User } else { ChatRole::Assistant };
                turn(role, &format!("turn {}", i))
            })
            .collect();

        let messages = build_conversation(&history, "latest");
        assert_eq!(messages.len(), MAX_HISTORY_TURNS + 1);
        assert_eq!(messages[0].role, "user");
        assert_eq!(messages[0].content, "turn 10");
    }

    #[test]
    fn test_conversation_drops_leading_assistant_turns() {
        let history = vec![turn(ChatRole::Assistant, "Hi! How can I help?")];
        let messages = build_conversation(&history, "Resume tips?");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
    }

    #[test]
    fn test_conversation_merges_same_role_turns() {
        let history = vec![
            turn(ChatRole::User, "I write Go."),
            turn(ChatRole::Assistant, "  "),
            turn(ChatRole::User, "And some Rust."),
        ];

        let messages = build_conversation(&history, "Where should I apply?");
        assert_eq!(messages.len(), 1);
        assert_eq!(messages[0].role, "user");
        assert_eq!(
            messages[0].content,
            "I write Go.\n\nAnd some Rust.\n\nWhere should I apply?"
        );
    }

    #[test]
    fn test_conversation_alternates_roles() {
        let history = vec![
            turn(ChatRole::User, "Hi"),
            turn(ChatRole::Assistant, "Hello."),
            turn(ChatRole::Assistant, "What are you looking for?"),
            turn(ChatRole::User, "Design roles"),
        ];

        let messages = build_conversation(&history, "In Latin America");
        let roles: Vec<&str> = messages.iter().map(|m| m.role).collect();
        assert_eq!(roles, vec!["user", "assistant", "user"]);
        assert_eq!(messages[1].content, "Hello.\n\nWhat are you looking for?");
        assert!(roles.windows(2).all(|pair| pair[0] != pair[1]));
    }
}
