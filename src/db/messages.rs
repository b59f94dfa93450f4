//! # 메시지 로그 쿼리
//!
//! 채널별로 메시지를 덧붙이고(append), 추가된 순서대로(오래된 것부터) 읽습니다.
//! 전달 확인, 페이지 나누기는 없습니다.

use crate::error::AppError;
use crate::models::message::Message;
use chrono::{DateTime, Local, Utc};
use sqlx::SqlitePool;

pub async fn append_message(
    pool: &SqlitePool,
    channel: &str,
    sender: &str,
    text: &str,
    sent_at: DateTime<Utc>,
) -> Result<Message, AppError> {
    let time = sent_at.with_timezone(&Local).format("%H:%M").to_string();
    let sent_at_iso = sent_at.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string();
    let timestamp = sent_at.timestamp_millis() as f64 / 1000.0;

    let message = sqlx::query_as::<_, Message>(
        r#"
        INSERT INTO messages (channel, sender, text, time, sent_at, timestamp)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING seq, channel, sender, text, time, sent_at, timestamp
        "#,
    )
    .bind(channel)
    .bind(sender)
    .bind(text)
    .bind(&time)
    .bind(&sent_at_iso)
    .bind(timestamp)
    .fetch_one(pool)
    .await?;

    Ok(message)
}

/// 채널의 메시지를 오래된 것부터 돌려줍니다.
pub async fn list_messages(pool: &SqlitePool, channel: &str) -> Result<Vec<Message>, AppError> {
    let messages = sqlx::query_as::<_, Message>(
        r#"
        SELECT seq, channel, sender, text, time, sent_at, timestamp
        FROM messages
        WHERE channel = ?
        ORDER BY seq ASC
        "#,
    )
    .bind(channel)
    .fetch_all(pool)
    .await?;

    Ok(messages)
}
