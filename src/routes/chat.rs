//! # 채팅 라우트 핸들러
//!
//! - `GET  /api/v1/chat/{channel}/messages` → `{ "channel": ..., "messages": [...] }`
//! - `POST /api/v1/chat/{channel}/messages` + `{ "text": "..." }` → 저장된 메시지
//!
//! `channel`은 `general`이거나 친구의 사용자 이름입니다.
//! 실시간 전달은 없고, 상대는 다음 조회 때 메시지를 봅니다.

use crate::{
    db::{self, users as db_users},
    error::AppError,
    middleware::{auth::AuthUser, json::AppJson},
    models::{MessageResponse, SendMessageRequest, User},
    routes::AppState,
    services::chat::{normalize_text, Channel},
};
use axum::{
    extract::{Path, State},
    Json,
};
use chrono::Utc;
use serde_json::{json, Value};

/// 요청자와 채널 키를 확인합니다. 1:1 채널은 친구일 때만 열립니다.
async fn resolve_channel(
    state: &AppState,
    auth_user: &AuthUser,
    channel: &str,
) -> Result<(User, String), AppError> {
    let me = db_users::find_by_id(&state.pool, &auth_user.user_id)
        .await?
        .ok_or(AppError::Unauthorized("User not found".to_string()))?;

    let channel = Channel::parse(channel);
    if let Channel::Direct(ref other) = channel {
        if !db::is_friend(&state.pool, &me.id, other).await? {
            return Err(AppError::Forbidden(format!(
                "Add {} as a friend to start chatting",
                other
            )));
        }
    }

    let key = channel.key(&me.username);
    Ok((me, key))
}

pub async fn list_messages(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(channel): Path<String>,
) -> Result<Json<Value>, AppError> {
    let (me, key) = resolve_channel(&state, &auth_user, &channel).await?;

    let messages: Vec<MessageResponse> = db::list_messages(&state.pool, &key)
        .await?
        .into_iter()
        .map(|message| MessageResponse::for_viewer(message, &me.username))
        .collect();

    Ok(Json(json!({ "channel": key, "messages": messages })))
}

pub async fn send_message(
    State(state): State<AppState>,
    auth_user: AuthUser,
    Path(channel): Path<String>,
    AppJson(req): AppJson<SendMessageRequest>,
) -> Result<Json<MessageResponse>, AppError> {
    let text = normalize_text(&req.text)?;
    let (me, key) = resolve_channel(&state, &auth_user, &channel).await?;

    let message = db::append_message(&state.pool, &key, &me.username, &text, Utc::now()).await?;
    tracing::debug!(channel = %key, sender = %me.username, "message appended");

    Ok(Json(MessageResponse::for_viewer(message, &me.username)))
}
