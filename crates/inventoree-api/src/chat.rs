//! Handlers for `/chat/*`.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/chat/messages` | Body: `{"senderId","receiverId","message"}`; 201 |
//! | `GET`  | `/chat/users/{user}/conversations` | Most recent first |
//! | `GET`  | `/chat/users/{user}/unread` | Optional `?conversation=<id>` |
//! | `GET`  | `/chat/conversations/{id}/messages` | Oldest first |
//! | `POST` | `/chat/conversations/{id}/read` | Body: `{"userId"}` |
//!
//! There is no session: the acting user is named in the request.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use inventoree_core::{
  KeyValueStore, Saved,
  model::{ChatConversation, ChatMessage},
};
use serde::{Deserialize, Serialize};

use crate::{AppState, error::ApiError};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SendBody {
  pub sender_id:   String,
  pub receiver_id: String,
  pub message:     String,
}

/// `POST /chat/messages`
pub async fn send<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Json(body): Json<SendBody>,
) -> Result<impl IntoResponse, ApiError> {
  if body.message.trim().is_empty() {
    return Err(ApiError::BadRequest("message is empty".into()));
  }
  let saved = state
    .chat
    .send_message(&body.sender_id, &body.receiver_id, &body.message)
    .await;
  Ok((StatusCode::CREATED, Json(saved)))
}

/// `GET /chat/users/{user}/conversations`
pub async fn conversations<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Path(user): Path<String>,
) -> Json<Vec<ChatConversation>> {
  Json(state.chat.user_conversations(&user).await)
}

#[derive(Debug, Deserialize)]
pub struct UnreadParams {
  pub conversation: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UnreadCount {
  pub unread: usize,
}

/// `GET /chat/users/{user}/unread[?conversation=<id>]`
pub async fn unread<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Path(user): Path<String>,
  Query(params): Query<UnreadParams>,
) -> Json<UnreadCount> {
  let unread = state
    .chat
    .unread_count(&user, params.conversation.as_deref())
    .await;
  Json(UnreadCount { unread })
}

/// `GET /chat/conversations/{id}/messages`
pub async fn messages<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
) -> Json<Vec<ChatMessage>> {
  Json(state.chat.conversation_messages(&id).await)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReadBody {
  pub user_id: String,
}

/// `POST /chat/conversations/{id}/read`
///
/// Answers the number of messages marked read.
pub async fn mark_read<B: KeyValueStore + 'static>(
  State(state): State<AppState<B>>,
  Path(id): Path<String>,
  Json(body): Json<ReadBody>,
) -> Json<Saved<usize>> {
  Json(state.chat.mark_read(&body.user_id, &id).await)
}
