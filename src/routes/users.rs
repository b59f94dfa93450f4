use crate::{db::users as db_users, error::AppError, middleware::auth::AuthUser, routes::AppState};
use axum::{extract::State, Json};
use serde_json::{json, Value};

/// `GET /users`: 친구로 추가할 수 있는 다른 사용자 목록
pub async fn list_users(
    State(state): State<AppState>,
    auth_user: AuthUser,
) -> Result<Json<Value>, AppError> {
    let users = db_users::list_other_users(&state.pool, &auth_user.user_id).await?;
    Ok(Json(json!({ "users": users })))
}
