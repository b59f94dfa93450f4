//! # 채팅 채널 규칙
//!
//! 채널은 두 종류입니다.
//! - `general`: 모든 사용자가 읽고 쓰는 공용 채널
//! - 친구와의 1:1 채널: 두 사용자 이름을 정렬해 `dm:<a>:<b>`로 저장
//!
//! 정렬하기 때문에 alice가 bob에게 보낸 메시지와 bob이 alice에게 보낸 메시지가
//! 같은 채널에 쌓입니다.

use crate::error::AppError;

/// 공용 채널 이름. 사용자 이름으로 쓸 수 없습니다.
pub const GENERAL_CHANNEL: &str = "general";

/// 메시지 본문 최대 길이 (문자 수)
pub const MAX_MESSAGE_CHARS: usize = 2000;

/// URL로 들어온 채널 이름
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Channel {
    General,
    /// 상대방 사용자 이름
    Direct(String),
}

impl Channel {
    pub fn parse(name: &str) -> Self {
        if name.eq_ignore_ascii_case(GENERAL_CHANNEL) {
            Channel::General
        } else {
            Channel::Direct(name.to_string())
        }
    }

    /// 메시지 저장소에서 쓰는 채널 키
    pub fn key(&self, me: &str) -> String {
        match self {
            Channel::General => GENERAL_CHANNEL.to_string(),
            Channel::Direct(other) => direct_key(me, other),
        }
    }
}

/// 두 사용자 사이의 1:1 채널 키 (순서 무관)
pub fn direct_key(a: &str, b: &str) -> String {
    let (first, second) = if a <= b { (a, b) } else { (b, a) };
    format!("dm:{}:{}", first, second)
}

/// 메시지 본문을 다듬고 검사합니다.
pub fn normalize_text(text: &str) -> Result<String, AppError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AppError::BadRequest("Message cannot be empty".to_string()));
    }
    if trimmed.chars().count() > MAX_MESSAGE_CHARS {
        return Err(AppError::BadRequest(format!(
            "Message must be at most {} characters",
            MAX_MESSAGE_CHARS
        )));
    }
    Ok(trimmed.to_string())
}
