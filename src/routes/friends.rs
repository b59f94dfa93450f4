//! # 친구 라우트 핸들러
//!
//! - `GET  /api/v1/friends` → `{ "friends": ["bob", ...] }`
//! - `POST /api/v1/friends` + `{ "username": "bob" }` → 갱신된 친구 목록
//!
//! 상대의 동의 없이 바로 추가되며, 이미 친구면 그대로 둡니다.

use crate::{
    db::{self, users as db_users},
    error::AppError,
    middleware::{auth::AuthUser, json::AppJson},
    models::AddFriendRequest,
    routes::AppState,
};
use axum::{extract::State, Json};
use serde_json::{json, Value};

pub async fn list_friends(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let friends = db::list_friends(&state.pool, &auth_user.user_id).await?;
    Ok(Json(json!({ "friends": friends })))
}

pub async fn add_friend(
    State(state): State<AppState>,
    auth_user: AuthUser,
    AppJson(req): AppJson<AddFriendRequest>,
) -> Result<Json<Value>, AppError> {
    let friend = db_users::find_by_username(&state.pool, req.username.trim())
        .await?
        .ok_or(AppError::NotFound)?;

    if friend.id == auth_user.user_id {
        return Err(AppError::BadRequest("You cannot add yourself as a friend".to_string()));
    }

    let added = db::add_friend(&state.pool, &auth_user.user_id, &friend.id).await?;
    if added {
        tracing::info!(user_id = %auth_user.user_id, friend = %friend.username, "friend added");
    }

    let friends = db::list_friends(&state.pool, &auth_user.user_id).await?;
    Ok(Json(json!({ "added": added, "friends": friends })))
}
