//! # 친구 관계 쿼리
//!
//! 친구 관계는 단방향입니다. alice가 bob을 추가해도 bob의 목록에는 alice가 없습니다.
//! 삭제나 차단은 없습니다.

use crate::error::AppError;
use sqlx::SqlitePool;

/// 친구를 추가합니다. 이미 친구면 아무 일도 하지 않고 `false`를 반환합니다.
pub async fn add_friend(pool: &SqlitePool, user_id: &str, friend_id: &str) -> Result<bool, AppError> {
    // INSERT OR IGNORE: (user_id, friend_id) 기본키가 겹치면 조용히 건너뜀
    let result = sqlx::query(
        r#"
        INSERT OR IGNORE INTO friendships (user_id, friend_id)
        VALUES (?, ?)
        "#,
    )
    .bind(user_id)
    .bind(friend_id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// 친구 사용자 이름 목록 (추가한 순서)
pub async fn list_friends(pool: &SqlitePool, user_id: &str) -> Result<Vec<String>, AppError> {
    let names = sqlx::query_scalar::<_, String>(
        r#"
        SELECT u.username
        FROM friendships f
        JOIN users u ON u.id = f.friend_id
        WHERE f.user_id = ?
        ORDER BY f.created_at, u.username
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await?;

    Ok(names)
}

pub async fn is_friend(pool: &SqlitePool, user_id: &str, friend_username: &str) -> Result<bool, AppError> {
    let found = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT COUNT(*)
        FROM friendships f
        JOIN users u ON u.id = f.friend_id
        WHERE f.user_id = ? AND u.username = ?
        "#,
    )
    .bind(user_id)
    .bind(friend_username)
    .fetch_one(pool)
    .await?;

    Ok(found > 0)
}
