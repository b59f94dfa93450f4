//! # 채팅 메시지 모델
//!
//! - `Message`: DB의 `messages` 테이블 한 행
//! - `MessageResponse`: 읽는 사람 기준으로 `is_own`을 붙인 응답
//! - `SendMessageRequest`: 메시지 전송 요청 본문

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Message {
    /// 채널 안에서의 추가 순서
    pub seq: i64,
    pub channel: String,
    pub sender: String,
    pub text: String,
    /// 보낸 시각의 `HH:MM` (서버 현지 시간)
    pub time: String,
    /// 보낸 시각 (ISO 8601 UTC)
    pub sent_at: String,
    /// 유닉스 시각 (초, 소수점 포함)
    pub timestamp: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub sender: String,
    pub text: String,
    pub time: String,
    pub sent_at: String,
    pub timestamp: f64,
    /// 조회한 사용자가 보낸 메시지인지
    pub is_own: bool,
}

impl MessageResponse {
    pub fn for_viewer(message: Message, viewer: &str) -> Self {
        Self {
            is_own: message.sender == viewer,
            sender: message.sender,
            text: message.text,
            time: message.time,
            sent_at: message.sent_at,
            timestamp: message.timestamp,
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SendMessageRequest {
    pub text: String,
}
