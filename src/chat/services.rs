use std::collections::BTreeMap;

use super::repo_types::{ChatMessage, ChatRole};
use crate::error::ApiError;
use crate::llm::{LlmMessage, CHAT_SYSTEM_PROMPT};

/// Most recent messages of a thread sent back to the model as context.
pub const HISTORY_LIMIT: usize = 20;

const MAX_THREAD_ID_LEN: usize = 128;

/// Groups time-ordered messages by thread, keeping each thread's order.
pub fn group_threads(messages: Vec<ChatMessage>) -> BTreeMap<String, Vec<ChatMessage>> {
    let mut threads: BTreeMap<String, Vec<ChatMessage>> = BTreeMap::new();
    for m in messages {
        threads.entry(m.thread_id.clone()).or_default().push(m);
    }
    threads
}

/// Normalizes a client-supplied thread id, or `None` when absent or blank.
pub fn normalize_thread_id(raw: Option<&str>) -> Result<Option<String>, ApiError> {
    match raw.map(str::trim).filter(|t| !t.is_empty()) {
        None => Ok(None),
        Some(t) if t.len() > MAX_THREAD_ID_LEN => {
            Err(ApiError::BadRequest("Thread ID is too long".into()))
        }
        Some(t) => Ok(Some(t.to_string())),
    }
}

/// System prompt, the tail of the thread, then the new user message.
pub fn build_prompt(history: &[ChatMessage], message: &str) -> Vec<LlmMessage> {
    let start = history.len().saturating_sub(HISTORY_LIMIT);
    let mut out = Vec::with_capacity(history.len() - start + 2);
    out.push(LlmMessage::system(CHAT_SYSTEM_PROMPT));
    for m in &history[start..] {
        if m.role == ChatRole::Bot.as_str() {
            out.push(LlmMessage::assistant(m.message.clone()));
        } else {
            out.push(LlmMessage::user(m.message.clone()));
        }
    }
    out.push(LlmMessage::user(message));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmRole;
    use time::{macros::datetime, Duration};
    use uuid::Uuid;

    fn msg(id: i64, thread: &str, role: ChatRole, text: &str) -> ChatMessage {
        ChatMessage {
            id,
            user_id: Uuid::nil(),
            thread_id: thread.into(),
            role: role.as_str().into(),
            message: text.into(),
            created_at: datetime!(2024-03-01 08:00 UTC) + Duration::seconds(id),
        }
    }

    #[test]
    fn groups_by_thread_preserving_order() {
        let threads = group_threads(vec![
            msg(1, "a", ChatRole::User, "hi"),
            msg(2, "b", ChatRole::User, "hello"),
            msg(3, "a", ChatRole::Bot, "hi there"),
            msg(4, "b", ChatRole::Bot, "hey"),
            msg(5, "a", ChatRole::User, "lunch?"),
        ]);
        assert_eq!(threads.len(), 2);
        let a: Vec<i64> = threads["a"].iter().map(|m| m.id).collect();
        assert_eq!(a, vec![1, 3, 5]);
        assert_eq!(threads["b"][1].message, "hey");
    }

    #[test]
    fn blank_thread_id_means_new_thread() {
        assert_eq!(normalize_thread_id(None).unwrap(), None);
        assert_eq!(normalize_thread_id(Some("   ")).unwrap(), None);
        assert_eq!(normalize_thread_id(Some(" t1 ")).unwrap(), Some("t1".into()));
        assert!(normalize_thread_id(Some(&"x".repeat(200))).is_err());
    }

    #[test]
    fn prompt_maps_roles_and_appends_message() {
        let history = vec![
            msg(1, "a", ChatRole::User, "what should I eat?"),
            msg(2, "a", ChatRole::Bot, "more protein"),
        ];
        let prompt = build_prompt(&history, "like what?");
        let roles: Vec<LlmRole> = prompt.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![LlmRole::System, LlmRole::User, LlmRole::Assistant, LlmRole::User]
        );
        assert_eq!(prompt.last().unwrap().text, "like what?");
    }

    #[test]
    fn prompt_keeps_only_recent_history() {
        let history: Vec<ChatMessage> = (0..50)
            .map(|i| msg(i, "a", ChatRole::User, &format!("m{i}")))
            .collect();
        let prompt = build_prompt(&history, "now");
        assert_eq!(prompt.len(), HISTORY_LIMIT + 2);
        assert_eq!(prompt[1].text, "m30");
    }
}
