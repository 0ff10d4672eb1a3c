use axum::{
    extract::{rejection::JsonRejection, rejection::QueryRejection, Query, State},
    routing::get,
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::{ChatHistoryResponse, ChatQuery, SendChatRequest, SendChatResponse};
use super::repo;
use super::services::{build_prompt, group_threads, normalize_thread_id};
use crate::{auth::AuthUser, error::ApiError, state::AppState};

pub fn routes() -> Router<AppState> {
    Router::new().route("/chat", get(get_chat).post(send_chat))
}

#[instrument(skip(state, payload))]
pub async fn send_chat(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    payload: Result<Json<SendChatRequest>, JsonRejection>,
) -> Result<Json<SendChatResponse>, ApiError> {
    let Json(body) = payload?;
    let message = body.message.trim();
    if message.is_empty() {
        return Err(ApiError::BadRequest("Message is required".into()));
    }
    let thread_id = normalize_thread_id(body.thread_id.as_deref())?
        .unwrap_or_else(|| Uuid::new_v4().to_string());

    let history = repo::list_thread(&state.db, user_id, &thread_id)
        .await
        .map_err(ApiError::internal("Error processing chat"))?;

    let reply = state
        .llm
        .complete(&build_prompt(&history, message))
        .await
        .map_err(ApiError::internal("Error processing chat"))?;

    repo::append_exchange(&state.db, user_id, &thread_id, message, &reply)
        .await
        .map_err(ApiError::internal("Error processing chat"))?;

    info!(%user_id, %thread_id, "chat reply stored");
    Ok(Json(SendChatResponse {
        result: reply,
        thread_id,
    }))
}

#[instrument(skip(state, query))]
pub async fn get_chat(
    State(state): State<AppState>,
    AuthUser(user_id): AuthUser,
    query: Result<Query<ChatQuery>, QueryRejection>,
) -> Result<Json<ChatHistoryResponse>, ApiError> {
    let Query(q) = query?;
    let resp = match normalize_thread_id(q.thread_id.as_deref())? {
        Some(thread_id) => ChatHistoryResponse::Thread {
            thread: repo::list_thread(&state.db, user_id, &thread_id)
                .await
                .map_err(ApiError::internal("Failed to fetch chat history"))?,
        },
        None => ChatHistoryResponse::Threads {
            threads: group_threads(
                repo::list_all(&state.db, user_id)
                    .await
                    .map_err(ApiError::internal("Failed to fetch chat history"))?,
            ),
        },
    };
    Ok(Json(resp))
}
