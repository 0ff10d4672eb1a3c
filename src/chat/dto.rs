use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::repo_types::ChatMessage;

#[derive(Debug, Deserialize)]
pub struct SendChatRequest {
    #[serde(default)]
    pub message: String,
    #[serde(default, rename = "threadId", alias = "thread_id")]
    pub thread_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SendChatResponse {
    pub result: String,
    #[serde(rename = "threadId")]
    pub thread_id: String,
}

#[derive(Debug, Default, Deserialize)]
pub struct ChatQuery {
    #[serde(default, rename = "threadId", alias = "thread_id")]
    pub thread_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ChatHistoryResponse {
    Thread { thread: Vec<ChatMessage> },
    Threads { threads: BTreeMap<String, Vec<ChatMessage>> },
}
