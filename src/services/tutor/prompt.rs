//! 提示词拼装

use super::client::ApiMessage;
use crate::models::assignments::entities::Assignment;
use crate::models::tutor::requests::{ChatMessage, ChatRole};

pub const TUTOR_SYSTEM_PROMPT: &str = "You are a friendly tutor for K-12 students. \
Use simple, age-appropriate language and keep answers short. \
Guide the student toward the answer with hints and questions instead of giving the answer directly. \
Never help with anything unsafe or unrelated to learning.";

/// 单条消息的最大长度
pub const MAX_MESSAGE_CHARS: usize = 4_000;

pub fn validate_history(messages: &[ChatMessage]) -> Result<(), &'static str> {
    let Some(last) = messages.last() else {
        return Err("messages cannot be empty");
    };
    if last.role != ChatRole::User {
        return Err("the last message must come from the user");
    }
    if messages.iter().any(|m| m.content.trim().is_empty()) {
        return Err("message content cannot be empty");
    }
    if messages
        .iter()
        .any(|m| m.content.chars().count() > MAX_MESSAGE_CHARS)
    {
        return Err("message is too long");
    }
    Ok(())
}

/// system 提示词 + 作业上下文 + 最近 `max_history` 条对话
pub fn build_chat_messages(
    history: &[ChatMessage],
    assignment: Option<&Assignment>,
    max_history: usize,
) -> Vec<ApiMessage> {
    let mut messages = vec![ApiMessage::system(TUTOR_SYSTEM_PROMPT)];

    if let Some(assignment) = assignment {
        let mut context = format!(
            "The student is working on the assignment \"{}\".",
            assignment.title
        );
        if let Some(description) = assignment.description.as_deref().filter(|d| !d.is_empty()) {
            context.push_str(&format!(" Assignment description: {description}"));
        }
        messages.push(ApiMessage::system(context));
    }

    let keep = max_history.max(1);
    let start = history.len().saturating_sub(keep);
    messages.extend(history[start..].iter().map(|m| ApiMessage {
        role: m.role.as_str(),
        content: m.content.clone(),
    }));
    messages
}

pub fn build_translate_messages(text: &str, target_language: &str) -> Vec<ApiMessage> {
    vec![
        ApiMessage::system(format!(
            "Translate the user's text into the language with code \"{target_language}\". \
Reply with the translation only, keeping the meaning and tone."
        )),
        ApiMessage::user(text),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn msg(role: ChatRole, content: &str) -> ChatMessage {
        ChatMessage {
            role,
            content: content.to_string(),
        }
    }

    #[test]
    fn test_history_is_trimmed_to_latest() {
        let history: Vec<ChatMessage> = (0..6)
            .map(|i| {
                let role = if i % 2 == 0 { ChatRole::User } else { ChatRole::Assistant };
                msg(role, &format!("m{i}"))
            })
            .collect();
        let messages = build_chat_messages(&history, None, 3);
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, "system");
        let contents: Vec<&str> = messages[1..].iter().map(|m| m.content.as_str()).collect();
        assert_eq!(contents, vec!["m3", "m4", "m5"]);
    }

    #[test]
    fn test_assignment_context_is_included() {
        let now = chrono::Utc::now();
        let assignment = Assignment {
            id: 3,
            class_id: 1,
            created_by: 1,
            title: "Volcanoes".to_string(),
            description: Some("Explain how magma forms".to_string()),
            max_score: 10.0,
            due_at: None,
            xp_reward: 20,
            coin_reward: 5,
            created_at: now,
            updated_at: now,
        };
        let messages = build_chat_messages(&[msg(ChatRole::User, "help")], Some(&assignment), 10);
        assert_eq!(messages.len(), 3);
        assert_eq!(messages[1].role, "system");
        assert!(messages[1].content.contains("Volcanoes"));
        assert!(messages[1].content.contains("magma"));
        assert_eq!(messages[2], ApiMessage::user("help"));
    }

    #[test]
    fn test_validate_history() {
        assert!(validate_history(&[]).is_err());
        assert!(validate_history(&[msg(ChatRole::Assistant, "hello")]).is_err());
        assert!(validate_history(&[msg(ChatRole::User, "   ")]).is_err());
        assert!(validate_history(&[msg(ChatRole::User, &"x".repeat(MAX_MESSAGE_CHARS + 1))]).is_err());
        assert!(
            validate_history(&[
                msg(ChatRole::User, "what is 7x8?"),
                msg(ChatRole::Assistant, "what is 7x7?"),
                msg(ChatRole::User, "49"),
            ])
            .is_ok()
        );
    }

    #[test]
    fn test_translate_prompt_names_target() {
        let messages = build_translate_messages("Hola", "en");
        assert!(messages[0].content.contains("\"en\""));
        assert_eq!(messages[1], ApiMessage::user("Hola"));
    }
}
