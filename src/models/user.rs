//! # 사용자(User) 모델
//!
//! 계정, 로그인 세션, 인증 요청/응답 구조체를 정의합니다.

use serde::{Deserialize, Serialize}; // JSON 직렬화/역직렬화 derive 매크로

// sqlx::FromRow: SELECT 결과의 컬럼 이름을 필드 이름에 맞춰 자동으로 채워줍니다.
// query_as::<_, User>(...)가 이 derive 덕분에 동작합니다.

/// 사용자 엔티티: DB의 `users` 테이블 한 행에 대응합니다.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    /// 응답 JSON에는 절대 포함되지 않음
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub created_at: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct UserResponse {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: String,
}

// From 트레이트: `user.into()`나 `UserResponse::from(user)`로 변환할 수 있게 합니다.
impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            username: user.username,
            email: user.email,
            created_at: user.created_at,
        }
    }
}

/// 친구 추가 목록에 보여줄 다른 사용자 요약
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct UserSummary {
    pub id: String,
    pub username: String,
}

/// 로그인 세션: DB의 `user_sessions` 테이블 한 행
///
/// 세션마다 서버 메모리에 타이머가 하나씩 붙어 있습니다.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct UserSession {
    pub id: String,
    pub user_id: String,
    pub expires_at: String,
}

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    /// 있으면 `password`와 같아야 합니다.
    pub confirm_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub user: UserResponse,
    pub session_id: String,
    pub access_token: String,
    pub refresh_token: String,
}
