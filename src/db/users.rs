//! # 계정 저장소 쿼리
//!
//! `users`와 `user_sessions` 테이블을 다룹니다.
//! 세션 행에는 리프레시 토큰 원문이 아니라 SHA-256 해시만 저장합니다.

use crate::error::{AccountError, AppError};
use crate::models::user::{User, UserSession, UserSummary};
use sqlx::SqlitePool;

pub async fn create_user(
    pool: &SqlitePool,
    id: &str,
    username: &str,
    email: &str,
    password_hash: &str,
) -> Result<User, AppError> {
    let result = sqlx::query(
        r#"
        INSERT INTO users (id, username, email, password_hash)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(username)
    .bind(email)
    .bind(password_hash)
    .execute(pool)
    .await;

    // 중복 검사와 INSERT 사이에 같은 이름이 들어온 경우도 UNIQUE 제약으로 잡아냄
    if let Err(sqlx::Error::Database(ref db_err)) = result {
        if db_err.is_unique_violation() {
            return Err(AccountError::DuplicateUsername.into());
        }
    }
    result?;

    find_by_id(pool, id)
        .await?
        .ok_or(AppError::Internal("Failed to retrieve created user".to_string()))
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, created_at
        FROM users
        WHERE username = ?
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub async fn find_by_id(pool: &SqlitePool, id: &str) -> Result<Option<User>, AppError> {
    let user = sqlx::query_as::<_, User>(
        r#"
        SELECT id, username, email, password_hash, created_at
        FROM users
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

/// 자기 자신을 뺀 모든 사용자 (가입 순)
pub async fn list_other_users(pool: &SqlitePool, user_id: &str) -> Result<Vec<UserSummary>, AppError> {
    let users = sqlx::query_as::<_, UserSummary>(
        r#"
        SELECT id, username
        FROM users
        WHERE id != ?
        ORDER BY created_at, username
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(users)
}

pub async fn create_session(
    pool: &SqlitePool,
    id: &str,
    user_id: &str,
    token_hash: &str,
    expires_at: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        INSERT INTO user_sessions (id, user_id, token_hash, expires_at)
        VALUES (?, ?, ?, ?)
        "#,
    )
    .bind(id)
    .bind(user_id)
    .bind(token_hash)
    .bind(expires_at)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn find_session_by_token_hash(
    pool: &SqlitePool,
    token_hash: &str,
) -> Result<Option<UserSession>, AppError> {
    let session = sqlx::query_as::<_, UserSession>(
        r#"
        SELECT id, user_id, expires_at
        FROM user_sessions
        WHERE token_hash = ?
        "#,
    )
    .bind(token_hash)
    .fetch_optional(pool)
    .await?;

    Ok(session)
}

/// 리프레시 토큰을 교체합니다. 세션 ID는 그대로라 타이머도 유지됩니다.
pub async fn rotate_session_token(
    pool: &SqlitePool,
    id: &str,
    token_hash: &str,
    expires_at: &str,
) -> Result<(), AppError> {
    sqlx::query(
        r#"
        UPDATE user_sessions
        SET token_hash = ?, expires_at = ?
        WHERE id = ?
        "#,
    )
    .bind(token_hash)
    .bind(expires_at)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

pub async fn delete_session(pool: &SqlitePool, id: &str) -> Result<(), AppError> {
    sqlx::query("DELETE FROM user_sessions WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(())
}
